//! Caller-side form validation.
//!
//! These checks run before any gateway operation is invoked; a failed
//! validation never constructs a request. Messages are the ones the
//! interactive surfaces show verbatim.

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please fill in all required fields")]
    MissingRequiredFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

/// Login form: both fields required.
///
/// # Errors
///
/// `MissingFields` when either field is empty.
pub fn validate_login(username: &str, password: &str) -> Result<(), FormError> {
    if username.is_empty() || password.is_empty() {
        return Err(FormError::MissingFields);
    }
    Ok(())
}

/// Registration form: required fields, then confirmation match, then
/// minimum password length — in that order.
///
/// # Errors
///
/// The first failing check, with its display message.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), FormError> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(FormError::MissingRequiredFields);
    }
    validate_new_password(password, confirm_password)
}

/// New-password rules shared by registration and password reset:
/// confirmation must match, then minimum length.
///
/// # Errors
///
/// `PasswordMismatch` or `PasswordTooShort`.
pub fn validate_new_password(password: &str, confirm_password: &str) -> Result<(), FormError> {
    if password != confirm_password {
        return Err(FormError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}

/// Trim and lowercase an email, rejecting anything without exactly one `@`
/// separating two non-empty parts.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Forgot-password form: the email must normalize.
///
/// # Errors
///
/// `InvalidEmail` when the address does not normalize.
pub fn validate_recovery_email(email: &str) -> Result<String, FormError> {
    normalize_email(email).ok_or(FormError::InvalidEmail)
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
