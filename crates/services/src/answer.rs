/// Parse a typed answer as an integer prefix.
///
/// Surrounding whitespace is ignored, an optional sign is accepted and
/// parsing stops at the first non-digit, so `"12abc"` reads as 12. Returns
/// `None` when no digit follows the sign. Values beyond `i64` saturate.
#[must_use]
pub fn parse_answer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}
