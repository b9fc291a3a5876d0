//! slack-uploader - Upload a local file to Slack and post a visible link to it.
//!
//! The upload uses Slack's external upload flow:
//! 1. `files.getUploadURLExternal` hands out an upload URL and file id
//! 2. The file bytes are POSTed to that URL
//! 3. `files.completeUploadExternal` shares the file to the target channel
//! 4. The file's permalink is posted with `chat.postMessage`, optionally in a thread
//!
//! # Example
//!
//! ```no_run
//! use slack_uploader::core::config::AppConfig;
//! use slack_uploader::core::models::UploadRequest;
//! use slack_uploader::{SlackClient, Uploader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     slack_uploader::setup_logging(slack_uploader::LogFormat::Pretty);
//!
//!     let config = AppConfig::from_env()?;
//!     let uploader = Uploader::new(SlackClient::new(&config)?);
//!
//!     let request = UploadRequest::new("quota.pdf", "C12345678")
//!         .with_comment("Weekly quota")
//!         .with_thread_ts("1700000000.000100");
//!
//!     let outcome = uploader.upload(&request).await?;
//!     println!("Uploaded {}", outcome.file_id().0);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod errors;
pub mod slack;
pub mod uploader;

pub use errors::UploadError;
pub use slack::{SlackApi, SlackClient};
pub use uploader::Uploader;

/// Log output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configure logging for the CLI.
///
/// Logs go to stderr. The filter comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// slack_uploader::setup_logging(slack_uploader::LogFormat::Json);
/// ```
pub fn setup_logging(format: LogFormat) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logging already initialised");
    }
}
