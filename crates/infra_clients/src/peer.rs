//! Shared HTTP plumbing for the peer adapters

use std::time::Duration;

use core_kernel::PortError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// What a request is about, used to build `NotFound` errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject<'a> {
    pub entity: &'a str,
    pub id: i64,
}

impl<'a> Subject<'a> {
    pub fn new(entity: &'a str, id: i64) -> Self {
        Self { entity, id }
    }
}

/// Error body every service renders on failure
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ErrorEnvelope {
    error_message: Option<String>,
    error_code: Option<String>,
}

/// A JSON/HTTP connection to one peer service
#[derive(Debug, Clone)]
pub struct HttpPeer {
    service: String,
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl HttpPeer {
    /// Creates a peer connection
    ///
    /// # Arguments
    ///
    /// * `service` - Peer name used in errors and logs
    /// * `base_url` - Scheme, host and port, e.g. `http://product:8081`
    /// * `timeout` - Upper bound on a whole request, body included
    pub fn new(
        service: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PortError> {
        let service = service.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Internal {
                message: format!("failed to build HTTP client for {}", service),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GETs `path` and decodes the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        subject: Subject<'_>,
    ) -> Result<T, PortError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error("GET", path, e))?;
        let response = self.check(response, subject).await?;
        self.decode(response).await
    }

    /// POSTs `body` as JSON and decodes the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B, subject: Subject<'_>) -> Result<T, PortError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error("POST", path, e))?;
        let response = self.check(response, subject).await?;
        self.decode(response).await
    }

    /// POSTs with no body, caring only about the status
    pub async fn post_empty(&self, path: &str, subject: Subject<'_>) -> Result<(), PortError> {
        let response = self
            .client
            .post(self.url(path))
            .send()
            .await
            .map_err(|e| self.transport_error("POST", path, e))?;
        self.check(response, subject).await.map(|_| ())
    }

    async fn check(&self, response: Response, subject: Subject<'_>) -> Result<Response, PortError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = map_status(&self.service, status, &body, subject);
        tracing::debug!(
            service = %self.service,
            status = status.as_u16(),
            error = %error,
            "peer rejected request"
        );
        Err(error)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, PortError> {
        response.json::<T>().await.map_err(|e| PortError::Transformation {
            message: format!("{} returned an unreadable body: {}", self.service, e),
        })
    }

    fn transport_error(&self, method: &str, path: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            return PortError::Timeout {
                operation: format!("{} {}{}", method, self.service, path),
                duration_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            };
        }

        let message = if error.is_connect() {
            format!("cannot reach {} at {}", self.service, self.base_url)
        } else {
            format!("{} {} to {} failed", method, path, self.service)
        };
        PortError::Connection {
            message,
            source: Some(Box::new(error)),
        }
    }
}

/// Maps a non-success status and its body onto a `PortError`
pub fn map_status(service: &str, status: StatusCode, body: &str, subject: Subject<'_>) -> PortError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let message = match (envelope.error_code, envelope.error_message) {
        (Some(code), Some(message)) if !message.is_empty() => format!("{}: {}", code, message),
        (_, Some(message)) if !message.is_empty() => message,
        _ => format!("{} responded {}", service, status),
    };

    match status {
        StatusCode::NOT_FOUND => PortError::not_found(subject.entity, subject.id),
        StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::validation(message)
        }
        StatusCode::UNAUTHORIZED => PortError::Unauthorized { message },
        StatusCode::CONFLICT => PortError::conflict(message),
        s if s.is_server_error() => PortError::unavailable(service),
        _ => PortError::internal(message),
    }
}
