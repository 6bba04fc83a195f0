use super::*;

// =============================================================================
// validate_login
// =============================================================================

#[test]
fn login_accepts_both_fields() {
    assert_eq!(validate_login("testuser", "Test123!"), Ok(()));
}

#[test]
fn login_rejects_empty_username() {
    assert_eq!(validate_login("", "Test123!"), Err(FormError::MissingFields));
}

#[test]
fn login_rejects_empty_password() {
    assert_eq!(validate_login("testuser", ""), Err(FormError::MissingFields));
}

#[test]
fn login_error_message_text() {
    let error = validate_login("", "").unwrap_err();
    assert_eq!(error.to_string(), "Please fill in all fields");
}

// =============================================================================
// validate_registration
// =============================================================================

#[test]
fn registration_accepts_valid_form() {
    assert_eq!(
        validate_registration("alice", "a@test.com", "Password1!", "Password1!"),
        Ok(())
    );
}

#[test]
fn registration_rejects_missing_required_field() {
    assert_eq!(
        validate_registration("alice", "", "Password1!", "Password1!"),
        Err(FormError::MissingRequiredFields)
    );
}

#[test]
fn registration_required_fields_message_text() {
    let error = validate_registration("", "a@test.com", "pw", "pw").unwrap_err();
    assert_eq!(error.to_string(), "Please fill in all required fields");
}

#[test]
fn registration_rejects_password_mismatch() {
    assert_eq!(
        validate_registration("alice", "a@test.com", "Password1!", "Password2!"),
        Err(FormError::PasswordMismatch)
    );
}

#[test]
fn registration_mismatch_message_text() {
    let error = validate_registration("alice", "a@test.com", "Password1!", "other").unwrap_err();
    assert_eq!(error.to_string(), "Passwords do not match");
}

#[test]
fn registration_rejects_short_password() {
    assert_eq!(
        validate_registration("alice", "a@test.com", "short", "short"),
        Err(FormError::PasswordTooShort)
    );
}

#[test]
fn registration_short_password_message_text() {
    let error = validate_registration("alice", "a@test.com", "short", "short").unwrap_err();
    assert_eq!(error.to_string(), "Password must be at least 8 characters long");
}

#[test]
fn registration_mismatch_wins_over_length() {
    // Both too short and mismatched: the mismatch is reported first.
    assert_eq!(
        validate_registration("alice", "a@test.com", "pw1", "pw2"),
        Err(FormError::PasswordMismatch)
    );
}

// =============================================================================
// validate_new_password
// =============================================================================

#[test]
fn new_password_accepts_exact_minimum_length() {
    assert_eq!(validate_new_password("12345678", "12345678"), Ok(()));
}

#[test]
fn new_password_rejects_seven_chars() {
    assert_eq!(
        validate_new_password("1234567", "1234567"),
        Err(FormError::PasswordTooShort)
    );
}

#[test]
fn new_password_counts_chars_not_bytes() {
    // Eight multi-byte characters pass the length rule.
    assert_eq!(validate_new_password("éééééééé", "éééééééé"), Ok(()));
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(
        normalize_email("  Alice@Example.COM  "),
        Some("alice@example.com".to_owned())
    );
}

#[test]
fn normalize_email_rejects_missing_at() {
    assert_eq!(normalize_email("alice.example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_local_part() {
    assert_eq!(normalize_email("@example.com"), None);
}

#[test]
fn normalize_email_rejects_empty_domain() {
    assert_eq!(normalize_email("alice@"), None);
}

#[test]
fn normalize_email_rejects_double_at() {
    assert_eq!(normalize_email("a@b@c.com"), None);
}

#[test]
fn recovery_email_error_message_text() {
    let error = validate_recovery_email("nope").unwrap_err();
    assert_eq!(error.to_string(), "Please enter a valid email address");
}

#[test]
fn recovery_email_returns_normalized_form() {
    assert_eq!(
        validate_recovery_email("User@Test.COM"),
        Ok("user@test.com".to_owned())
    );
}
