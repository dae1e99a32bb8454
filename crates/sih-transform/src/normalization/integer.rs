//! Integer normalization.

/// Parses a trimmed, optionally signed integer.
///
/// Leading zeros are accepted, as are decimals whose fraction is all zeros
/// (`"12.0"`), which is how integral numeric fields render with a scale.
pub fn normalize_integer(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(parsed);
    }
    let (whole, fraction) = trimmed.split_once('.')?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    whole.parse::<i64>().ok()
}
