use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use slack_morphism::{SlackChannelId, SlackFileId, SlackTs};

use crate::errors::UploadError;

pub const DEFAULT_COMMENT: &str = "Quota Report";

/// The four protocol steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    RequestUploadUrl,
    TransferBytes,
    CompleteUpload,
    Announce,
}

impl UploadStage {
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            UploadStage::RequestUploadUrl => 1,
            UploadStage::TransferBytes => 2,
            UploadStage::CompleteUpload => 3,
            UploadStage::Announce => 4,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            UploadStage::RequestUploadUrl => "request upload URL",
            UploadStage::TransferBytes => "upload file binary",
            UploadStage::CompleteUpload => "complete upload",
            UploadStage::Announce => "post file link",
        }
    }
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.description())
    }
}

/// What the caller asked for: which file, where to announce it, and how.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub comment: String,
    pub channel: SlackChannelId,
    pub thread_ts: Option<SlackTs>,
    pub broadcast: bool,
}

impl UploadRequest {
    pub fn new(file_path: impl Into<PathBuf>, channel: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            comment: DEFAULT_COMMENT.to_string(),
            channel: SlackChannelId(channel.into()),
            thread_ts: None,
            broadcast: false,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_thread_ts(mut self, thread_ts: impl Into<String>) -> Self {
        self.thread_ts = Some(SlackTs(thread_ts.into()));
        self
    }

    #[must_use]
    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }
}

/// A file on disk that has passed the pre-flight checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl LocalFile {
    /// Checks that `path` is an existing, non-empty regular file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Input`] if the file is missing, is not a regular
    /// file, has zero length, or has no usable file name.
    pub async fn inspect(path: &Path) -> Result<Self, UploadError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| UploadError::Input(format!("File not found at {}: {}", path.display(), e)))?;

        if !metadata.is_file() {
            return Err(UploadError::Input(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(UploadError::Input(format!(
                "File {} is empty (0 bytes). Check generation script.",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                UploadError::Input(format!("Cannot derive a file name from {}", path.display()))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }
}

/// Response body of `files.getUploadURLExternal`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadUrlResponse {
    pub ok: bool,
    pub upload_url: Option<String>,
    pub file_id: Option<SlackFileId>,
    pub error: Option<String>,
}

impl UploadUrlResponse {
    /// # Errors
    ///
    /// Returns [`UploadError::Provider`] when Slack refused the request or
    /// omitted the destination.
    pub fn into_slot(self) -> Result<UploadSlot, UploadError> {
        let stage = UploadStage::RequestUploadUrl;
        if !self.ok {
            return Err(UploadError::provider(
                stage,
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        match (self.upload_url, self.file_id) {
            (Some(upload_url), Some(file_id)) => Ok(UploadSlot {
                upload_url,
                file_id,
            }),
            _ => Err(UploadError::provider(
                stage,
                "response is missing upload_url or file_id",
            )),
        }
    }
}

/// Destination for a pending transfer. Only valid for the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    pub upload_url: String,
    pub file_id: SlackFileId,
}

/// Response body of `files.completeUploadExternal`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResult {
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLink {
    pub permalink: String,
}

/// A `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessage {
    pub channel: SlackChannelId,
    pub text: String,
    pub thread_ts: Option<SlackTs>,
    pub reply_broadcast: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    pub error: Option<String>,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The file was shared and a link to it was posted.
    Announced {
        file_id: SlackFileId,
        permalink: String,
    },
    /// The file was shared but no permalink was available, so nothing was posted.
    AnnouncementSkipped { file_id: SlackFileId },
}

impl UploadOutcome {
    #[must_use]
    pub fn file_id(&self) -> &SlackFileId {
        match self {
            UploadOutcome::Announced { file_id, .. }
            | UploadOutcome::AnnouncementSkipped { file_id } => file_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_includes_step_number() {
        assert_eq!(
            UploadStage::CompleteUpload.to_string(),
            "step 3 (complete upload)"
        );
    }

    #[test]
    fn failed_upload_url_response_keeps_slack_error() {
        let resp = UploadUrlResponse {
            ok: false,
            upload_url: None,
            file_id: None,
            error: Some("invalid_auth".to_string()),
        };

        match resp.into_slot() {
            Err(UploadError::Provider { stage, message }) => {
                assert_eq!(stage, UploadStage::RequestUploadUrl);
                assert_eq!(message, "invalid_auth");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn ok_upload_url_response_without_file_id_is_rejected() {
        let resp = UploadUrlResponse {
            ok: true,
            upload_url: Some("https://files.example/upload".to_string()),
            file_id: None,
            error: None,
        };

        assert!(matches!(
            resp.into_slot(),
            Err(UploadError::Provider { .. })
        ));
    }

    #[test]
    fn request_builder_defaults() {
        let req = UploadRequest::new("/tmp/report.pdf", "C123");
        assert_eq!(req.comment, DEFAULT_COMMENT);
        assert_eq!(req.channel.0, "C123");
        assert!(req.thread_ts.is_none());
        assert!(!req.broadcast);
    }
}
