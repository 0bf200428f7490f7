// Txfeed Engine — Input Validation

use crate::atoms::error::{HistoryError, HistoryResult};

/// Page size used when the caller does not request one.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// An address is exactly `0x` followed by 40 hex characters, any case.
/// Prefix and length are checked first so the error names what is wrong.
pub fn validate_address(address: &str) -> HistoryResult<()> {
    if !address.starts_with("0x") {
        return Err(HistoryError::InvalidAddress(format!(
            "'{}' is missing the 0x prefix",
            address
        )));
    }
    if address.len() != 42 {
        return Err(HistoryError::InvalidAddress(format!(
            "expected 42 characters, got {}",
            address.len()
        )));
    }
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HistoryError::InvalidAddress(
            "contains non-hex characters".to_string(),
        ));
    }
    Ok(())
}

/// Clamp a requested page size against the configured maximum.
/// Absent ⇒ `min(DEFAULT_PAGE_SIZE, max)`. Non-positive ⇒ error. Never 0.
pub fn clamp_page_size(requested: Option<i64>, max_configured: usize) -> HistoryResult<usize> {
    match requested {
        None => Ok(DEFAULT_PAGE_SIZE.min(max_configured)),
        Some(n) if n <= 0 => Err(HistoryError::InvalidPageSize(n)),
        Some(n) => Ok((n as usize).min(max_configured)),
    }
}
