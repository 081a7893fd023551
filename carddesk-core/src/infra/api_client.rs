use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::api::routes::backend;
use crate::error::{ApiError, ApiResult};

/// Thin JSON client for the dispatch backend.
///
/// Paths passed to the request helpers are route constants from
/// [`crate::api::routes::backend`] and already carry the `/api` prefix.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = normalize_base_url(base_url);
        url::Url::parse(&base_url).map_err(|source| {
            ApiError::InvalidBaseUrl {
                url: base_url.clone(),
                source,
            }
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        info!(base_url = %base_url, ?timeout, "backend client ready");
        Ok(Self { client, base_url })
    }

    /// Absolute URL for a route path. Absolute inputs pass through.
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send `request` and turn any non-2xx answer into [`ApiError::Status`].
    async fn execute_request(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ApiResult<Response> {
        let response =
            request.send().await.map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(url, %status, "backend request succeeded");
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!(url, %status, "backend request failed");
        Err(ApiError::Status {
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        url: &str,
    ) -> ApiResult<T> {
        response.json().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.build_url(path);
        let response = self.execute_request(self.client.get(&url), &url).await?;
        Self::decode(response, &url).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let response = self.execute_request(request, &url).await?;
        Self::decode(response, &url).await
    }

    /// DELETE a resource; the response body is ignored.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.build_url(path);
        self.execute_request(self.client.delete(&url), &url).await?;
        Ok(())
    }

    /// GET a binary payload such as a spreadsheet export.
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let url = self.build_url(path);
        let request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/octet-stream");
        let response = self.execute_request(request, &url).await?;
        let bytes = response.bytes().await.map_err(|source| ApiError::Decode {
            url: url.clone(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

/// Accepts the forms operators actually type: a missing scheme gets
/// `http://`, and a trailing slash or `/api` suffix is dropped because every
/// route already starts with `/api`.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let trimmed = trimmed
        .strip_suffix(backend::ROOT)
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    let normalized =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
    if normalized != raw {
        debug!(from = raw, to = %normalized, "normalized backend URL");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_scheme_and_trailing_parts() {
        assert_eq!(
            normalize_base_url("localhost:8001"),
            "http://localhost:8001"
        );
        assert_eq!(
            normalize_base_url("https://desk.example.com/api/"),
            "https://desk.example.com"
        );
        assert_eq!(
            normalize_base_url(" http://10.0.0.5:8001/ "),
            "http://10.0.0.5:8001"
        );
    }

    #[test]
    fn build_url_joins_route_paths() {
        let client =
            ApiClient::new("localhost:8001/api", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.build_url(backend::messengers::COLLECTION),
            "http://localhost:8001/api/messengers"
        );
        assert_eq!(client.build_url("http://other/x"), "http://other/x");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = ApiClient::new("http://exa mple.com", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }
}
