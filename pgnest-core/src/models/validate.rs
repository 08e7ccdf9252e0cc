//! Field-level checks shared by the request models.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

lazy_static! {
    static ref PINCODE: Regex = Regex::new(r"^[1-9][0-9]{5}$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^(\+91[- ]?)?[6-9][0-9]{9}$").unwrap();
}

pub fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

pub fn pincode(field: &str, value: &str) -> Result<(), ValidationError> {
    if !PINCODE.is_match(value.trim()) {
        return Err(ValidationError::new(field, "must be a 6-digit pincode"));
    }
    Ok(())
}

pub fn phone(field: &str, value: &str) -> Result<(), ValidationError> {
    if !PHONE.is_match(value.trim()) {
        return Err(ValidationError::new(
            field,
            "must be a 10-digit mobile number",
        ));
    }
    Ok(())
}

pub fn http_url(field: &str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::new(field, "must be an http(s) URL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pincode() {
        assert!(pincode("pincode", "560034").is_ok());
        assert!(pincode("pincode", "060034").is_err());
        assert!(pincode("pincode", "56003").is_err());
        assert!(pincode("pincode", "56003a").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(phone("phone", "9876543210").is_ok());
        assert!(phone("phone", "+91 9876543210").is_ok());
        assert!(phone("phone", "+91-9876543210").is_ok());
        assert!(phone("phone", "1234567890").is_err());
        assert!(phone("phone", "98765").is_err());
    }

    #[test]
    fn test_http_url() {
        assert!(http_url("images", "https://cdn.example.com/a.jpg").is_ok());
        assert!(http_url("images", "http://x.io").is_ok());
        assert!(http_url("images", "ftp://x.io").is_err());
        assert!(http_url("images", "https://").is_err());
        assert!(http_url("images", "https://a b").is_err());
    }

    #[test]
    fn test_non_empty_and_max_len() {
        assert!(non_empty("title", "  ").is_err());
        assert!(non_empty("title", "Sunrise PG").is_ok());
        assert!(max_len("title", "abcd", 3).is_err());
        assert!(max_len("title", "abc", 3).is_ok());
    }
}
