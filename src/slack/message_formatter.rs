//! Text of the message that announces an uploaded file.

pub const LINK_LABEL: &str = "Download Report";

/// Format a Slack link reference: `<url|label>`.
#[must_use]
pub fn format_link(url: &str, label: &str) -> String {
    format!("<{}|{}>", url, label)
}

/// Compose the announcement: the caller's comment followed by a link to the file.
///
/// # Examples
///
/// ```
/// use slack_uploader::slack::message_formatter::format_announcement;
///
/// let text = format_announcement("Quota Report", "https://x/files/abc");
/// assert_eq!(text, "Quota Report\n<https://x/files/abc|Download Report>");
/// ```
#[must_use]
pub fn format_announcement(comment: &str, permalink: &str) -> String {
    format!("{}\n{}", comment, format_link(permalink, LINK_LABEL))
}
