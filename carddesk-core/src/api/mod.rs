//! API-facing facade (route templates shared by the client and tests).

pub mod routes;

pub use routes::{backend, utils};
