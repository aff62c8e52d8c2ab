use marketchat::infrastructure::observability::redact_payload;

#[test]
fn given_blank_payload_when_redacting_then_marked_empty() {
    assert_eq!(redact_payload("   "), "[EMPTY]");
}

#[test]
fn given_short_text_when_redacting_then_unchanged() {
    assert_eq!(redact_payload("Is this still available?"), "Is this still available?");
}

#[test]
fn given_long_text_when_redacting_then_truncated_with_total_length() {
    let text = "x".repeat(250);
    let redacted = redact_payload(&text);

    assert!(redacted.starts_with(&"x".repeat(100)));
    assert!(redacted.ends_with("... (250 chars total)"));
}

#[test]
fn given_signed_url_when_redacting_then_credentials_are_hidden() {
    let redacted =
        redact_payload("https://blobs.example.com/v.ogg?Token=secret123&expires=99&sig=abc");

    assert!(!redacted.contains("secret123"));
    assert!(!redacted.contains("abc"));
    assert!(redacted.contains("expires=99"));
    assert_eq!(redacted.matches("[REDACTED]").count(), 2);
}
