//! HTTP client for network-based API calls
//!
//! Stateless transport: the bearer token is passed per call by
//! [`AppContext`](crate::AppContext), which owns the session.

use http::StatusCode;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{ApiResponse, AppError, ErrorCode};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making network requests to the HR server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and unwrap the `ApiResponse` envelope
    ///
    /// `query` is form-encoded onto the URL; absent `Option` fields are left out.
    pub async fn send<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "Sending request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        decode_envelope(status, &bytes)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        self.send::<T, (), ()>(Method::GET, path, token, None, None).await
    }

    /// GET with a serialized query string
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &Q,
    ) -> ClientResult<T> {
        self.send::<T, Q, ()>(Method::GET, path, token, Some(query), None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<T> {
        self.send::<T, (), B>(Method::POST, path, token, None, Some(body)).await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        self.send::<T, (), ()>(Method::POST, path, token, None, None).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> ClientResult<T> {
        self.send::<T, (), B>(Method::PUT, path, token, None, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ClientResult<T> {
        self.send::<T, (), ()>(Method::DELETE, path, token, None, None).await
    }
}

/// Best guess at a code when the body is not an envelope (proxy pages, timeouts)
fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::UNAUTHORIZED => ErrorCode::NotAuthenticated,
        StatusCode::FORBIDDEN => ErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ErrorCode::TimeoutError,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => ErrorCode::NetworkError,
        _ => ErrorCode::Unknown,
    }
}

/// Turn a response body into the payload or a typed error
pub(crate) fn decode_envelope<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> ClientResult<T> {
    let envelope = match serde_json::from_slice::<ApiResponse<T>>(bytes) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => {
            return Err(ClientError::InvalidResponse(format!("Malformed envelope: {e}")));
        }
        Err(_) => {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                text
            };
            return Err(ClientError::from_api(
                status,
                AppError::with_message(code_for_status(status), message),
            ));
        }
    };

    if !status.is_success() || !envelope.is_success() {
        return Err(ClientError::from_api(status, envelope.into_error()));
    }

    match envelope.data {
        Some(data) => Ok(data),
        // Unit-like payloads serialize as `null`
        None => serde_json::from_value(Value::Null)
            .map_err(|_| ClientError::InvalidResponse("Missing response data".into())),
    }
}
