// Txfeed Engine — Exact Amount Conversion
// Wei-scale values arrive as hex-encoded arbitrary-precision integers. They
// are converted with string-digit arithmetic only: a native integer or float
// anywhere in this path would silently lose precision.

use crate::atoms::error::{HistoryError, HistoryResult};

/// Largest decimals value accepted from upstream contract metadata. 78 is
/// the digit count of 2^256; anything above it is corrupt or hostile input
/// (and large enough widths panic the padding formatter).
pub const MAX_DECIMALS: u32 = 78;

/// Decode a 0x-prefixed hex integer into its base-10 digit string.
/// Handles the provider's minimal encoding ("0x0", "0x1a3") and values far
/// beyond u128 range.
pub fn hex_to_digits(hex: &str) -> HistoryResult<String> {
    let s = hex.strip_prefix("0x").unwrap_or(hex);
    if s.is_empty() {
        return Ok("0".to_string());
    }
    let mut digits: Vec<u8> = vec![0];
    for c in s.chars() {
        let nibble = c.to_digit(16).ok_or_else(|| {
            HistoryError::UpstreamMalformed(format!("invalid hex amount '{}'", hex))
        })? as u16;
        // digits = digits * 16 + nibble, carried out in base 10
        let mut carry = nibble;
        for d in digits.iter_mut().rev() {
            let v = *d as u16 * 16 + carry;
            *d = (v % 10) as u8;
            carry = v / 10;
        }
        while carry > 0 {
            digits.insert(0, (carry % 10) as u8);
            carry /= 10;
        }
    }
    let first_nonzero = digits.iter().position(|&d| d != 0).unwrap_or(digits.len() - 1);
    Ok(digits[first_nonzero..]
        .iter()
        .map(|d| (d + b'0') as char)
        .collect())
}

/// Place a decimal point `decimals` digits from the right of a base-10 digit
/// string, stripping trailing zeros (and a bare trailing point). An all-zero
/// result collapses to "0".
pub fn scale_decimal(digits: &str, decimals: u32) -> String {
    if decimals == 0 {
        return digits.to_string();
    }
    let dec = decimals as usize;
    // Manual pad: the formatter's width argument panics past u16 range.
    let padded = format!(
        "{}{}",
        "0".repeat((dec + 1).saturating_sub(digits.len())),
        digits
    );
    let (int_part, frac_part) = padded.split_at(padded.len() - dec);
    let trimmed = frac_part.trim_end_matches('0');
    if trimmed.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, trimmed)
    }
}

/// Convert a hex-encoded base-unit amount to an exact decimal string.
/// Rejects decimals beyond `MAX_DECIMALS` — the scale comes from untrusted
/// contract metadata.
pub fn hex_amount_to_decimal(hex: &str, decimals: u32) -> HistoryResult<String> {
    if decimals > MAX_DECIMALS {
        return Err(HistoryError::UpstreamMalformed(format!(
            "implausible decimals value {}",
            decimals
        )));
    }
    Ok(scale_decimal(&hex_to_digits(hex)?, decimals))
}

/// Parse a hex-encoded decimals field (e.g. "0x12" → 18).
pub fn hex_decimals(hex: &str) -> Option<u32> {
    let s = hex.strip_prefix("0x").unwrap_or(hex);
    u32::from_str_radix(s, 16).ok()
}

/// Render the upstream float approximation as a plain decimal string:
/// never exponent notation, trailing zeros stripped, "0" for zero.
/// Used only when no raw hex amount was supplied.
pub fn format_approx(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{}", value);
    if let Some(stripped) = s.strip_suffix(".0") {
        return stripped.to_string();
    }
    if s.contains('.') {
        let t = s.trim_end_matches('0').trim_end_matches('.');
        if t.is_empty() {
            return "0".to_string();
        }
        return t.to_string();
    }
    s
}
