use std::env;
use std::fmt;
use std::time::Duration;

use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use url::Url;

use crate::errors::UploadError;

pub const TOKEN_VAR: &str = "SLACK_TOKEN";
pub const API_BASE_URL_VAR: &str = "SLACK_API_BASE_URL";
pub const METADATA_TIMEOUT_VAR: &str = "SLACK_UPLOADER_METADATA_TIMEOUT_SECS";
pub const TRANSFER_TIMEOUT_VAR: &str = "SLACK_UPLOADER_TRANSFER_TIMEOUT_SECS";

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api/";
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct AppConfig {
    pub slack_token: SlackApiToken,
    pub api_base_url: Url,
    /// Applies to the upload-URL, completion, file-info and post-message calls.
    pub metadata_timeout: Duration,
    /// Applies to the raw byte transfer.
    pub transfer_timeout: Duration,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`UploadError::Configuration`] if `SLACK_TOKEN` is unset or
    /// empty, or an optional setting cannot be parsed.
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup instead of the process environment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UploadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                UploadError::Configuration(format!("{} environment variable not set.", TOKEN_VAR))
            })?;

        let api_base_url = parse_base_url(
            lookup(API_BASE_URL_VAR)
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;

        let metadata_timeout =
            parse_timeout(METADATA_TIMEOUT_VAR, lookup(METADATA_TIMEOUT_VAR))?
                .unwrap_or(DEFAULT_METADATA_TIMEOUT);
        let transfer_timeout =
            parse_timeout(TRANSFER_TIMEOUT_VAR, lookup(TRANSFER_TIMEOUT_VAR))?
                .unwrap_or(DEFAULT_TRANSFER_TIMEOUT);

        Ok(Self {
            slack_token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            api_base_url,
            metadata_timeout,
            transfer_timeout,
        })
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("slack_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("metadata_timeout", &self.metadata_timeout)
            .field("transfer_timeout", &self.transfer_timeout)
            .finish()
    }
}

// Endpoint names are joined onto the base, which only appends when the path ends in '/'.
fn parse_base_url(raw: &str) -> Result<Url, UploadError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized)
        .map_err(|e| UploadError::Configuration(format!("{}: {}", API_BASE_URL_VAR, e)))
}

fn parse_timeout(var: &str, raw: Option<String>) -> Result<Option<Duration>, UploadError> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let secs: u64 = value.trim().parse().map_err(|e| {
                UploadError::Configuration(format!("{}: invalid value {:?}: {}", var, value, e))
            })?;
            if secs == 0 {
                return Err(UploadError::Configuration(format!(
                    "{}: timeout must be greater than zero",
                    var
                )));
            }
            Ok(Some(Duration::from_secs(secs)))
        }
    }
}
