//! Argument checks run before any request is sent.

use crate::clients::MultipartPart;
use crate::error::Error;

/// Length of an item identifier (hexadecimal object id).
pub const ITEM_ID_LENGTH: usize = 24;

pub(crate) const LIMIT_ILLEGAL_ARG_MSG: &str = "limit must be greater than zero";

/// Fails when `value` is empty.
pub(crate) fn require_non_empty(name: &str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{name} cannot be empty")));
    }
    Ok(())
}

/// Fails when a page size is zero.
pub(crate) fn require_limit(limit: u32) -> Result<(), Error> {
    if limit == 0 {
        return Err(Error::invalid_argument(LIMIT_ILLEGAL_ARG_MSG));
    }
    Ok(())
}

pub(crate) fn require_item_id(item_id: &str) -> Result<(), Error> {
    if item_id.len() != ITEM_ID_LENGTH {
        return Err(Error::invalid_argument(format!(
            "invalid hexadecimal representation of item id '{item_id}'"
        )));
    }
    Ok(())
}

/// Fails when a multipart file carries an invalid content type.
pub(crate) fn require_multipart(parts: &[MultipartPart]) -> Result<(), Error> {
    parts.iter().try_for_each(MultipartPart::verify)
}

/// Percent-encodes a caller-supplied path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("user_id", "u1").is_ok());
        let error = require_non_empty("user_id", "").unwrap_err();
        assert_eq!(error.to_string(), "Invalid argument: user_id cannot be empty");
    }

    #[test]
    fn test_require_limit_rejects_zero() {
        assert!(require_limit(1).is_ok());
        assert!(matches!(
            require_limit(0),
            Err(Error::InvalidArgument(m)) if m == LIMIT_ILLEGAL_ARG_MSG
        ));
    }

    #[test]
    fn test_require_item_id_checks_length_only() {
        assert!(require_item_id("5c8a1d5b0190b214360dc031").is_ok());
        assert!(require_item_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_ok());
        assert!(require_item_id("").is_err());
        assert!(require_item_id("short-id").is_err());
    }

    #[test]
    fn test_segment_escapes_separators() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("plain-id_1"), "plain-id_1");
    }
}
