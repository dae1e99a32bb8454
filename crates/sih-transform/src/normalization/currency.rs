//! Fixed-point currency normalization.

/// Parses a fixed-point cents value.
///
/// Every non-digit is dropped and the last two remaining digits become the
/// fraction, so `"123456"` and `"1.234,56"` are both 1234.56. A single digit
/// is cents (`"5"` is 0.05). A leading `-` negates the amount. Blank input or
/// input without digits is `None`.
pub fn normalize_currency(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let split = digits.len().saturating_sub(2);
    let (whole, fraction) = digits.split_at(split);
    let whole = if whole.is_empty() { "0" } else { whole };
    let amount: f64 = format!("{whole}.{fraction:0>2}").parse().ok()?;
    if trimmed.starts_with('-') && amount != 0.0 {
        Some(-amount)
    } else {
        Some(amount)
    }
}
