pub mod backend;

#[cfg(any(test, feature = "test-utils"))]
pub use backend::MockBackendApi;
pub use backend::{BackendApi, HttpBackend};
