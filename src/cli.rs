use clap::Parser;
use std::path::PathBuf;

use crate::LogFormat;
use crate::core::models::{DEFAULT_COMMENT, UploadRequest};

/// Upload a file to Slack and post a visible link to it.
///
/// The bot token is read from the `SLACK_TOKEN` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "slack-uploader")]
#[command(about = "Uploads a file to Slack and posts a link to it in a channel or thread")]
pub struct Args {
    /// Path to the file to upload.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Initial comment.
    #[arg(short = 'm', long, default_value = DEFAULT_COMMENT)]
    pub comment: String,

    /// Slack channel ID.
    #[arg(short, long)]
    pub channel: String,

    /// Thread timestamp to reply under.
    #[arg(long = "thread_ts", alias = "thread-ts")]
    pub thread_ts: Option<String>,

    /// Broadcast the threaded reply to the channel.
    #[arg(long)]
    pub broadcast: bool,

    /// Emit logs as JSON lines.
    #[arg(long, env = "SLACK_UPLOADER_JSON_LOGS")]
    pub json_logs: bool,
}

impl Args {
    #[must_use]
    pub fn to_request(&self) -> UploadRequest {
        let mut request = UploadRequest::new(self.file.clone(), self.channel.clone())
            .with_comment(self.comment.clone())
            .with_broadcast(self.broadcast);

        if let Some(ts) = self.thread_ts.as_deref().filter(|ts| !ts.is_empty()) {
            request = request.with_thread_ts(ts);
        }

        request
    }

    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}
