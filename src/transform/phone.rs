//! Phone number normalization to `DDD-DDD-DDDD`

use crate::constants::{PHONE_DIGITS, PHONE_TRUNK_PREFIX};

/// Keep digits only, drop a leading trunk `1` from 11-digit numbers, and
/// format exactly ten digits; every other digit count is unrepresentable
pub fn normalize_phone(value: Option<&str>) -> Option<String> {
    let digits: String = value?.chars().filter(char::is_ascii_digit).collect();

    let digits = match digits.strip_prefix(PHONE_TRUNK_PREFIX) {
        Some(rest) if digits.len() == PHONE_DIGITS + 1 => rest,
        _ => digits.as_str(),
    };

    if digits.len() != PHONE_DIGITS {
        return None;
    }

    Some(format!(
        "{}-{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..]
    ))
}
