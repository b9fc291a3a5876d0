//! Slack API client module
//!
//! Encapsulates the Slack Web API calls used by the external file upload flow.
//! Every call is made exactly once; failures are surfaced to the caller as
//! [`UploadError`] tagged with the step they happened in.

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use slack_morphism::{SlackApiToken, SlackChannelId, SlackFileId};
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

use crate::core::config::AppConfig;
use crate::core::models::{
    CompletionResult, FileLink, LocalFile, PostMessage, PostMessageResponse, UploadStage,
    UploadUrlResponse,
};
use crate::errors::{TransportContext, UploadError};
use crate::slack::payloads::{build_complete_upload_payload, build_post_message_payload};

const GET_UPLOAD_URL_METHOD: &str = "files.getUploadURLExternal";
const COMPLETE_UPLOAD_METHOD: &str = "files.completeUploadExternal";
const FILES_INFO_METHOD: &str = "files.info";
const POST_MESSAGE_METHOD: &str = "chat.postMessage";

/// The Slack calls the uploader depends on.
///
/// Implementations report transport problems (connection failures, timeouts,
/// non-2xx statuses, undecodable bodies) as [`UploadError::Transport`] and hand
/// Slack's own `ok`/`error` fields back to the caller untouched.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `files.getUploadURLExternal`
    async fn get_upload_url(
        &self,
        file_name: &str,
        length: u64,
    ) -> Result<UploadUrlResponse, UploadError>;

    /// POST the raw file bytes to the URL handed out by [`SlackApi::get_upload_url`].
    async fn upload_file(&self, upload_url: &str, file: &LocalFile) -> Result<(), UploadError>;

    /// `files.completeUploadExternal`
    async fn complete_upload(
        &self,
        file_id: &SlackFileId,
        title: &str,
        channel: &SlackChannelId,
    ) -> Result<CompletionResult, UploadError>;

    /// `files.info`, reduced to the file's permalink if Slack returned one.
    async fn file_permalink(&self, file_id: &SlackFileId) -> Result<Option<FileLink>, UploadError>;

    /// `chat.postMessage`
    async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse, UploadError>;
}

/// Slack Web API client backed by reqwest.
pub struct SlackClient {
    http: Client,
    token: SlackApiToken,
    base_url: Url,
    metadata_timeout: Duration,
    transfer_timeout: Duration,
}

impl SlackClient {
    /// # Errors
    ///
    /// Returns [`UploadError::Configuration`] if the HTTP client cannot be built
    /// (for example when the TLS backend fails to initialise).
    pub fn new(config: &AppConfig) -> Result<Self, UploadError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UploadError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token: config.slack_token.clone(),
            base_url: config.api_base_url.clone(),
            metadata_timeout: config.metadata_timeout,
            transfer_timeout: config.transfer_timeout,
        })
    }

    fn endpoint(&self, method: &str) -> Result<Url, UploadError> {
        self.base_url.join(method).map_err(|e| {
            UploadError::Configuration(format!("Invalid Slack API URL for {}: {}", method, e))
        })
    }
}

/// Reject non-2xx statuses, then decode the JSON body.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    stage: UploadStage,
) -> Result<T, UploadError> {
    response
        .error_for_status()
        .at_stage(stage)?
        .json::<T>()
        .await
        .at_stage(stage)
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn get_upload_url(
        &self,
        file_name: &str,
        length: u64,
    ) -> Result<UploadUrlResponse, UploadError> {
        let stage = UploadStage::RequestUploadUrl;
        let params = [
            ("filename", file_name.to_string()),
            ("length", length.to_string()),
        ];

        let resp = self
            .http
            .post(self.endpoint(GET_UPLOAD_URL_METHOD)?)
            .bearer_auth(&self.token.token_value.0)
            .timeout(self.metadata_timeout)
            .form(&params)
            .send()
            .await
            .at_stage(stage)?;

        read_json(resp, stage).await
    }

    async fn upload_file(&self, upload_url: &str, file: &LocalFile) -> Result<(), UploadError> {
        let stage = UploadStage::TransferBytes;

        // The handle moves into the body stream and is closed when the request finishes or fails.
        let handle = tokio::fs::File::open(&file.path).await.map_err(|e| {
            UploadError::Input(format!("Failed to open {}: {}", file.path.display(), e))
        })?;
        let body = Body::wrap_stream(ReaderStream::new(handle));

        let resp = self
            .http
            .post(upload_url)
            .header(CONTENT_LENGTH, file.size)
            .timeout(self.transfer_timeout)
            .body(body)
            .send()
            .await
            .at_stage(stage)?;

        let status = resp.status();
        resp.error_for_status().at_stage(stage)?;
        debug!("Upload endpoint answered {}", status);

        Ok(())
    }

    async fn complete_upload(
        &self,
        file_id: &SlackFileId,
        title: &str,
        channel: &SlackChannelId,
    ) -> Result<CompletionResult, UploadError> {
        let stage = UploadStage::CompleteUpload;
        let payload = build_complete_upload_payload(file_id, title, channel);

        let resp = self
            .http
            .post(self.endpoint(COMPLETE_UPLOAD_METHOD)?)
            .bearer_auth(&self.token.token_value.0)
            .timeout(self.metadata_timeout)
            .json(&payload)
            .send()
            .await
            .at_stage(stage)?;

        read_json(resp, stage).await
    }

    async fn file_permalink(&self, file_id: &SlackFileId) -> Result<Option<FileLink>, UploadError> {
        let stage = UploadStage::Announce;

        let resp = self
            .http
            .get(self.endpoint(FILES_INFO_METHOD)?)
            .bearer_auth(&self.token.token_value.0)
            .timeout(self.metadata_timeout)
            .query(&[("file", file_id.0.as_str())])
            .send()
            .await
            .at_stage(stage)?;

        let info: Value = read_json(resp, stage).await?;

        let permalink = info
            .get("file")
            .and_then(|f| f.get("permalink"))
            .and_then(Value::as_str)
            .filter(|link| !link.is_empty())
            .map(|link| FileLink {
                permalink: link.to_string(),
            });

        if permalink.is_none() {
            let ok = info.get("ok").and_then(|v| v.as_bool()).unwrap_or(false);
            let error = info.get("error").and_then(|v| v.as_str()).unwrap_or("none");
            debug!("files.info returned no permalink (ok: {}, error: {})", ok, error);
        }

        Ok(permalink)
    }

    async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse, UploadError> {
        let stage = UploadStage::Announce;
        let payload = build_post_message_payload(message);

        let resp = self
            .http
            .post(self.endpoint(POST_MESSAGE_METHOD)?)
            .bearer_auth(&self.token.token_value.0)
            .timeout(self.metadata_timeout)
            .json(&payload)
            .send()
            .await
            .at_stage(stage)?;

        read_json(resp, stage).await
    }
}
