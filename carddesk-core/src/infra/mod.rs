//! Backend access: the REST client and the service seam built on it.

pub mod api_client;
pub mod services;

pub use api_client::ApiClient;
#[cfg(any(test, feature = "test-utils"))]
pub use services::MockBackendApi;
pub use services::{BackendApi, HttpBackend};
