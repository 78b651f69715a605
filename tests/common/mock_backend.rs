/*!
 * Mock backend implementation for testing
 *
 * Provides a scripted implementation of the TranslationBackend trait so the
 * transfer orchestrator can be exercised without any network calls. The mock
 * records every request it receives and resolves a predetermined outcome
 * after an optional delay.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use subrelay::app_config::Settings;
use subrelay::backend::TranslationBackend;
use subrelay::errors::TransferError;

/// Tracks backend calls to ensure no actual external requests are made
#[derive(Debug, Default)]
pub struct BackendCallTracker {
    /// Count of mock translate calls made
    pub call_count: usize,
    /// Settings received with the last request
    pub last_settings: Option<Settings>,
    /// Content length of the last request
    pub last_content_len: usize,
}

/// Outcome the mock resolves once its delay elapses
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Resolve successfully with this translated text
    Success(String),
    /// Fail with a server error carrying this payload message
    ServerError(String),
    /// Fail as unreachable
    ConnectionError,
    /// Fail with rejected credentials
    AuthError,
}

/// Mock implementation of the translation backend
#[derive(Debug)]
pub struct MockBackend {
    tracker: Arc<Mutex<BackendCallTracker>>,
    delay: Duration,
    outcome: MockOutcome,
}

impl MockBackend {
    /// Create a mock that resolves `outcome` after `delay`
    pub fn new(delay: Duration, outcome: MockOutcome) -> Self {
        MockBackend {
            tracker: Arc::new(Mutex::new(BackendCallTracker::default())),
            delay,
            outcome,
        }
    }

    /// Get the backend call tracker
    pub fn tracker(&self) -> Arc<Mutex<BackendCallTracker>> {
        self.tracker.clone()
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(
        &self,
        content: &str,
        settings: &Settings,
    ) -> Result<String, TransferError> {
        {
            let mut tracker = self.tracker.lock().unwrap();
            tracker.call_count += 1;
            tracker.last_settings = Some(settings.clone());
            tracker.last_content_len = content.len();
        }

        tokio::time::sleep(self.delay).await;

        match &self.outcome {
            MockOutcome::Success(translated) => Ok(translated.clone()),
            MockOutcome::ServerError(message) => Err(TransferError::Server(message.clone())),
            MockOutcome::ConnectionError => Err(TransferError::Connection {
                endpoint: "http://localhost:7860".to_string(),
                reason: "connection refused".to_string(),
            }),
            MockOutcome::AuthError => {
                Err(TransferError::Auth("invalid credentials".to_string()))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), TransferError> {
        match &self.outcome {
            MockOutcome::ConnectionError => Err(TransferError::Connection {
                endpoint: "http://localhost:7860".to_string(),
                reason: "connection refused".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
