//! Remote submission to the collection endpoint.
//!
//! Submission is best-effort replication: the request is sent once, and a
//! request that does not fail at the transport level counts as saved. The
//! response status and body are never read. Local storage stays the source
//! of truth whatever happens here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use refclass_core::SubmitPayload;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No submit endpoint configured")]
    NotConfigured,
    #[error("Request failed: {message}")]
    Transport { message: String },
}

/// Transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

impl Notification {
    pub fn saved() -> Self {
        Self {
            message: "✅ Saved successfully".to_string(),
            is_error: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            message: "❌ Failed to save".to_string(),
            is_error: true,
        }
    }
}

/// Sends submission payloads to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: Client,
    endpoint: Option<String>,
}

impl Submitter {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// POST the payload as JSON. No retry, no response inspection.
    pub async fn submit(&self, payload: &SubmitPayload) -> Result<(), SubmitError> {
        let endpoint = self.endpoint.as_deref().ok_or(SubmitError::NotConfigured)?;
        self.client
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Transport {
                message: e.to_string(),
            })?;
        tracing::info!(
            "Submitted {} entries for {} to {}",
            payload.entries.len(),
            payload.uuid,
            endpoint
        );
        Ok(())
    }

    /// Submit and turn the outcome into a user notification.
    pub async fn submit_and_notify(&self, payload: &SubmitPayload) -> Notification {
        match self.submit(payload).await {
            Ok(()) => Notification::saved(),
            Err(e) => {
                tracing::error!("Error saving: {}", e);
                Notification::failed()
            }
        }
    }
}

impl Default for Submitter {
    fn default() -> Self {
        Self::new(None)
    }
}
