//! Status code validation.

use crate::protocol::StatusError;
use http::StatusCode;
use std::ops::RangeInclusive;

/// The canonical HTTP status range accepted for an envelope.
pub const STATUS_RANGE: RangeInclusive<u16> = 100..=599;

/// The status every envelope starts with.
pub const DEFAULT_STATUS: u16 = 200;

/// Validates `code` against [`STATUS_RANGE`].
pub fn validate_status(code: u16) -> Result<StatusCode, StatusError> {
    match StatusCode::from_u16(code) {
        Ok(status) if STATUS_RANGE.contains(&code) => Ok(status),
        _ => Err(StatusError::invalid_status(code)),
    }
}

/// Returns the canonical reason phrase for `code`, falling back to the number itself.
pub fn reason_phrase(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or_else(|| code.to_string(), ToOwned::to_owned)
}
