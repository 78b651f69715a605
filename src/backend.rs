/*!
 * Client for the remote translation backend.
 *
 * The backend is a hosted translation model reached over HTTP. It accepts a
 * subtitle document plus settings as a multipart upload, works silently, and
 * answers with either the translated document text or a structured error
 * payload. There is no incremental progress channel.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use std::time::Duration;

use crate::app_config::{Config, Settings};
use crate::errors::TransferError;

/// Interface to a translation backend.
///
/// One implementation talks HTTP to the real service; tests substitute mocks
/// with scripted outcomes.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Submit a subtitle document for translation and wait for the result.
    ///
    /// Exactly one attempt; there is no retry. Resolves with the translated
    /// document text, or a classified [`TransferError`].
    async fn translate(&self, content: &str, settings: &Settings)
        -> Result<String, TransferError>;

    /// Check that the service is reachable
    async fn test_connection(&self) -> Result<(), TransferError>;
}

/// HTTP client for the hosted translation service
#[derive(Debug)]
pub struct HttpBackend {
    /// Base URL of the translation service
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

impl HttpBackend {
    /// Create a backend client from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.endpoint, Duration::from_secs(config.timeout_secs))
    }

    /// Create a backend client for the given endpoint URL.
    ///
    /// The timeout is generous on purpose: large files legitimately take
    /// minutes to translate, and the only request this client makes is the
    /// one carrying the whole file.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();

        // Accept both bare hosts and full URLs
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a reqwest transport error to a classified transfer error
    fn classify_transport_error(&self, error: reqwest::Error) -> TransferError {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            TransferError::Connection {
                endpoint: self.base_url.clone(),
                reason: error.to_string(),
            }
        } else {
            TransferError::Unexpected(error.to_string())
        }
    }

    /// Extract the error message from a backend error payload.
    ///
    /// The service reports failures as JSON with either an `error` field or a
    /// `detail` field depending on which layer rejected the request.
    fn extract_error_message(body: &str, status: StatusCode) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = value
                .get("error")
                .and_then(|v| v.as_str())
                .or_else(|| value.get("detail").and_then(|v| v.as_str()))
            {
                return message.to_string();
            }
        }
        format!(
            "Server error ({}): {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown")
        )
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    async fn translate(
        &self,
        content: &str,
        settings: &Settings,
    ) -> Result<String, TransferError> {
        let url = format!("{}/translate", self.base_url);
        debug!("Sending translation request to {}", url);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::text(content.to_string())
                    .file_name("subtitles.srt")
                    .mime_str("application/x-subrip")
                    .map_err(|e| TransferError::Unexpected(e.to_string()))?,
            )
            .text("batch_size", settings.batch_size.to_string())
            .text("fast_mode", settings.fast_mode.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            error!("Translation service error ({}): {}", status, body);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TransferError::Auth(Self::extract_error_message(&body, status))
                }
                StatusCode::NOT_FOUND => TransferError::NotFound(url),
                _ => TransferError::Server(Self::extract_error_message(&body, status)),
            });
        }

        // The service can answer 200 with an explicit error payload when the
        // translation itself failed (e.g. the model ran out of memory)
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            if value.get("status").and_then(|v| v.as_str()) == Some("error") {
                let message = value
                    .get("error")
                    .and_then(|v| v.as_str())
                    .unwrap_or("translation failed")
                    .to_string();
                error!("Translation service reported failure: {}", message);
                return Err(TransferError::Server(message));
            }
        }

        Ok(body)
    }

    async fn test_connection(&self) -> Result<(), TransferError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TransferError::Server(format!(
                "Service responded with status {}",
                response.status()
            )))
        }
    }
}
