// Input validation shared by the engine and the command layer

use crate::error::{CrmError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;

/// Trim a display name and check it is 2..=100 characters
pub fn validate_name(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(CrmError::invalid(format!("{} is required", field_name)));
    }
    if len < NAME_MIN {
        return Err(CrmError::invalid(format!(
            "{} must have at least {} characters",
            field_name, NAME_MIN
        )));
    }
    if len > NAME_MAX {
        return Err(CrmError::invalid(format!(
            "{} must have at most {} characters",
            field_name, NAME_MAX
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text field and cap its length
pub fn validate_optional(value: Option<&str>, field_name: &str, max: usize) -> Result<Option<String>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some(v) if v.chars().count() > max => Err(CrmError::invalid(format!(
            "{} must have at most {} characters",
            field_name, max
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
/// `(XX) XXXXX-XXXX` or `(XX) XXXX-XXXX`, any whitespace after the area code
const MOBILE_PATTERN: &str = r"^\([0-9]{2}\)\s[0-9]{4,5}-[0-9]{4}$";

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static MOBILE_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> Result<&'static Regex> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern)?;
    Ok(cell.get_or_init(|| re))
}

/// Lowercase and shape-check an email address
pub fn validate_email(value: &str) -> Result<String> {
    let email = value.trim().to_lowercase();
    if email.len() > 255 {
        return Err(CrmError::invalid("Email must have at most 255 characters"));
    }
    if compiled(&EMAIL_RE, EMAIL_PATTERN)?.is_match(&email) {
        Ok(email)
    } else {
        Err(CrmError::invalid(format!("Invalid email: '{}'", value.trim())))
    }
}

pub fn validate_mobile(value: &str) -> Result<String> {
    let mobile = value.trim();
    if compiled(&MOBILE_RE, MOBILE_PATTERN)?.is_match(mobile) {
        Ok(mobile.to_string())
    } else {
        Err(CrmError::invalid(format!(
            "Invalid mobile: '{}'. Expected format (XX) XXXXX-XXXX",
            mobile
        )))
    }
}

/// Photo must be an http(s) URL of at most 500 characters
pub fn validate_photo_url(value: &str) -> Result<String> {
    let photo = value.trim();
    if photo.len() > 500 {
        return Err(CrmError::invalid("Photo URL must have at most 500 characters"));
    }
    match Url::parse(photo) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Ok(photo.to_string())
        }
        _ => Err(CrmError::invalid(format!("Invalid photo URL: '{}'", photo))),
    }
}
