//! Local input checks. Failures here never reach the network layer.

use crate::error::ClientError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const PASSWORD_MIN_LEN: usize = 6;

pub fn email(input: &str) -> Result<(), ClientError> {
    if EMAIL_RE.is_match(input) {
        Ok(())
    } else {
        Err(ClientError::validation("Invalid email address."))
    }
}

pub fn password(input: &str) -> Result<(), ClientError> {
    if input.len() >= PASSWORD_MIN_LEN {
        Ok(())
    } else {
        Err(ClientError::validation(
            "Password must be at least 6 characters long.",
        ))
    }
}

/// Accepts anything `url::Url` can parse with a scheme, e.g.
/// `https://example.com`.
pub fn site_url(input: &str) -> Result<(), ClientError> {
    match url::Url::parse(input) {
        Ok(_) => Ok(()),
        Err(_) => Err(ClientError::validation(
            "Invalid URL. Use the form: https://example.com",
        )),
    }
}
