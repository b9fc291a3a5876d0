use slack_uploader::{LogFormat, setup_logging};

#[test]
fn test_logging_setup() {
    // setup_logging must not panic, even when called twice in one process
    let result = std::panic::catch_unwind(|| {
        setup_logging(LogFormat::Json);
        setup_logging(LogFormat::Pretty);
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
