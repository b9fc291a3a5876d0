//! The external file upload flow.
//!
//! Four dependent calls, run strictly in order:
//!
//! 1. `files.getUploadURLExternal` reserves an upload slot for the file.
//! 2. The raw bytes are POSTed to the slot's URL.
//! 3. `files.completeUploadExternal` finalises the file and shares it to the channel.
//! 4. The file's permalink is looked up and posted as a message, optionally in a thread.
//!
//! Any failure in steps 1-3 ends the run. Nothing is retried and a slot
//! abandoned after step 1 is not cleaned up. A missing permalink in step 4
//! only produces a warning, because by then the file is already shared.

use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::core::models::{
    LocalFile, PostMessage, UploadOutcome, UploadRequest, UploadSlot, UploadStage,
};
use crate::errors::UploadError;
use crate::slack::client::SlackApi;
use crate::slack::message_formatter::format_announcement;

pub struct Uploader<A> {
    api: A,
}

impl<A: SlackApi> Uploader<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run the full upload flow for `request`.
    ///
    /// The file is checked before any network call is made.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Input`] if the file is missing, empty or unreadable.
    /// - [`UploadError::Transport`] for a network failure or non-2xx status at any step.
    /// - [`UploadError::Provider`] if Slack reports `ok: false` in step 1 or step 3.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadOutcome, UploadError> {
        let span = info_span!(
            "upload",
            run_id = %Uuid::new_v4(),
            channel = %request.channel.0,
        );

        async {
            let file = LocalFile::inspect(&request.file_path).await?;
            info!("Uploading {} ({} bytes)", file.name, file.size);

            let slot = self.request_slot(&file).await?;
            self.transfer(&slot, &file).await?;
            self.complete(&slot, &file, request).await?;
            self.announce(slot, request).await
        }
        .instrument(span)
        .await
    }

    async fn request_slot(&self, file: &LocalFile) -> Result<UploadSlot, UploadError> {
        info!("Step 1: Requesting upload URL...");
        let slot = self
            .api
            .get_upload_url(&file.name, file.size)
            .await?
            .into_slot()?;
        info!("Upload URL obtained. File ID: {}", slot.file_id.0);
        Ok(slot)
    }

    async fn transfer(&self, slot: &UploadSlot, file: &LocalFile) -> Result<(), UploadError> {
        info!("Step 2: Uploading file binary...");
        self.api.upload_file(&slot.upload_url, file).await?;
        info!("File binary uploaded.");
        Ok(())
    }

    async fn complete(
        &self,
        slot: &UploadSlot,
        file: &LocalFile,
        request: &UploadRequest,
    ) -> Result<(), UploadError> {
        info!("Step 3: Completing file upload...");
        let result = self
            .api
            .complete_upload(&slot.file_id, &file.name, &request.channel)
            .await?;

        if !result.ok {
            return Err(UploadError::provider(
                UploadStage::CompleteUpload,
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        info!("File processing started.");
        Ok(())
    }

    async fn announce(
        &self,
        slot: UploadSlot,
        request: &UploadRequest,
    ) -> Result<UploadOutcome, UploadError> {
        info!("Step 4: Posting file link to channel/thread...");
        let file_id = slot.file_id;

        let Some(link) = self.api.file_permalink(&file_id).await? else {
            warn!("Could not retrieve file permalink; the file was uploaded but no link was posted.");
            return Ok(UploadOutcome::AnnouncementSkipped { file_id });
        };

        if request.broadcast && request.thread_ts.is_none() {
            warn!("--broadcast only applies to threaded replies; ignoring it without --thread_ts");
        }

        let message = PostMessage {
            channel: request.channel.clone(),
            text: format_announcement(&request.comment, &link.permalink),
            thread_ts: request.thread_ts.clone(),
            reply_broadcast: request.broadcast && request.thread_ts.is_some(),
        };

        let response = self.api.post_message(&message).await?;
        if response.ok {
            info!(
                "Success! Link posted to {} (Thread: {}, Broadcast: {})",
                request.channel.0,
                request
                    .thread_ts
                    .as_ref()
                    .map_or("None", |ts| ts.0.as_str()),
                message.reply_broadcast
            );
        } else {
            warn!(
                "chat.postMessage reported an error: {}",
                response.error.as_deref().unwrap_or("Unknown error")
            );
        }

        Ok(UploadOutcome::Announced {
            file_id,
            permalink: link.permalink,
        })
    }
}
