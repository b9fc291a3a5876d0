use thiserror::Error;

use crate::core::models::UploadStage;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input file: {0}")]
    Input(String),

    #[error("Network error in {stage}: {message}")]
    Transport { stage: UploadStage, message: String },

    #[error("Slack API error in {stage}: {message}")]
    Provider { stage: UploadStage, message: String },
}

impl UploadError {
    pub fn transport(stage: UploadStage, message: impl Into<String>) -> Self {
        UploadError::Transport {
            stage,
            message: message.into(),
        }
    }

    pub fn provider(stage: UploadStage, message: impl Into<String>) -> Self {
        UploadError::Provider {
            stage,
            message: message.into(),
        }
    }

    /// The protocol step the error was raised in, if any.
    #[must_use]
    pub fn stage(&self) -> Option<UploadStage> {
        match self {
            UploadError::Transport { stage, .. } | UploadError::Provider { stage, .. } => {
                Some(*stage)
            }
            UploadError::Configuration(_) | UploadError::Input(_) => None,
        }
    }
}

/// Attaches the failing step to a reqwest error.
pub(crate) trait TransportContext<T> {
    fn at_stage(self, stage: UploadStage) -> Result<T, UploadError>;
}

impl<T> TransportContext<T> for Result<T, reqwest::Error> {
    fn at_stage(self, stage: UploadStage) -> Result<T, UploadError> {
        self.map_err(|e| {
            let message = if e.is_timeout() {
                format!("request timed out: {}", e)
            } else if let Some(status) = e.status() {
                match e.url() {
                    Some(url) => format!("HTTP {} from {}", status, url),
                    None => format!("HTTP {}", status),
                }
            } else {
                e.to_string()
            };
            UploadError::transport(stage, message)
        })
    }
}
