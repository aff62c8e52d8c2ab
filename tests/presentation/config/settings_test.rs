use marketchat::presentation::config::Settings;

#[test]
fn given_default_settings_when_validated_then_accepted() {
    assert!(Settings::default().validated().is_ok());
}

#[test]
fn given_zero_page_limit_when_validated_then_rejected() {
    let mut settings = Settings::default();
    settings.messaging.message_page_limit = 0;

    let error = settings.validated().unwrap_err();
    assert!(error.to_string().contains("message_page_limit"));
}

#[test]
fn given_zero_keep_alive_when_validated_then_rejected() {
    let mut settings = Settings::default();
    settings.realtime.sse_keep_alive_seconds = 0;

    let error = settings.validated().unwrap_err();
    assert!(error.to_string().contains("sse_keep_alive_seconds"));
}

#[test]
fn given_zero_channel_capacity_when_validated_then_rejected() {
    let mut settings = Settings::default();
    settings.realtime.channel_capacity = 0;

    assert!(settings.validated().is_err());
}
