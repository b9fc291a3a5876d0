use slack_uploader::core::models::UploadStage;
use slack_uploader::errors::UploadError;
use std::error::Error;

#[test]
fn test_upload_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = UploadError::Input("missing".to_string());
    assert_error(&error);
}

#[test]
fn test_upload_error_display() {
    let error = UploadError::Configuration("SLACK_TOKEN environment variable not set.".to_string());
    assert_eq!(
        format!("{error}"),
        "Configuration error: SLACK_TOKEN environment variable not set."
    );

    let error = UploadError::provider(UploadStage::RequestUploadUrl, "invalid_auth");
    assert_eq!(
        format!("{error}"),
        "Slack API error in step 1 (request upload URL): invalid_auth"
    );

    let error = UploadError::transport(UploadStage::TransferBytes, "connection reset");
    assert_eq!(
        format!("{error}"),
        "Network error in step 2 (upload file binary): connection reset"
    );
}

#[test]
fn test_upload_error_stage() {
    assert_eq!(
        UploadError::provider(UploadStage::CompleteUpload, "x").stage(),
        Some(UploadStage::CompleteUpload)
    );
    assert_eq!(UploadError::Input("x".to_string()).stage(), None);
}

#[test]
fn test_anyhow_wraps_upload_error() {
    // The binary reports through anyhow; the Slack error text must survive.
    let err: anyhow::Error =
        UploadError::provider(UploadStage::RequestUploadUrl, "invalid_auth").into();
    assert!(format!("{err:#}").contains("invalid_auth"));
}
