//! Whitespace and case normalization for names, emails and identifiers

/// Trim surrounding whitespace
pub fn normalize_trimmed(value: Option<&str>) -> Option<String> {
    value.map(|s| s.trim().to_string())
}

/// Trim and lowercase the whole value
pub fn normalize_lower_case(value: Option<&str>) -> Option<String> {
    value.map(|s| s.trim().to_lowercase())
}

/// Trim, then capitalize each whitespace-separated token
///
/// The first character of every token is uppercased and the remainder
/// lowercased. Whitespace between tokens is kept as-is.
pub fn normalize_title_case(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    let mut result = String::with_capacity(trimmed.len());
    let mut at_token_start = true;

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            result.push(ch);
            at_token_start = true;
        } else if at_token_start {
            result.extend(ch.to_uppercase());
            at_token_start = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }

    Some(result)
}
