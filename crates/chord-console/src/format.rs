//! Compact display of key-space positions
//!
//! Ring positions are 160-bit integers transported as decimal strings. For
//! display they are rendered in hex and long values are elided in the middle.

use num_bigint::BigUint;

/// Hex renderings up to this length are shown in full
const FULL_HEX_LEN: usize = 12;
const HEAD_LEN: usize = 8;
const TAIL_LEN: usize = 4;

/// Format a decimal key-space position as `0x…` hex.
///
/// Empty input yields an empty string; anything else that is not a
/// non-negative decimal integer, whitespace-only input included, is returned
/// unchanged.
pub fn short_hex(decimal: &str) -> String {
    if decimal.is_empty() {
        return String::new();
    }
    let trimmed = decimal.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return decimal.to_string();
    }
    let Some(value) = BigUint::parse_bytes(trimmed.as_bytes(), 10) else {
        return decimal.to_string();
    };

    let hex = value.to_str_radix(16);
    if hex.len() <= FULL_HEX_LEN {
        format!("0x{}", hex)
    } else {
        format!(
            "0x{}...{}",
            &hex[..HEAD_LEN],
            &hex[hex.len() - TAIL_LEN..]
        )
    }
}

/// [`short_hex`] for an optional value; `None` formats as an empty string
pub fn short_hex_opt(decimal: Option<&str>) -> String {
    decimal.map(short_hex).unwrap_or_default()
}
