//! North American phone number formatting for the application form

/// Maximum number of digits kept (country code + 10)
pub const MAX_PHONE_DIGITS: usize = 11;

/// Format free-form input as `+C (AAA) - BBB - CCCC` while typing.
///
/// Non-digits are dropped and input is cut to [`MAX_PHONE_DIGITS`] digits.
/// Partial input produces a partial format: `"1234"` becomes `"+1 (234"`.
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_PHONE_DIGITS)
        .collect();

    // ASCII digits only, so byte slicing is safe
    match digits.len() {
        0 => String::new(),
        1 => format!("+{}", digits),
        2..=4 => format!("+{} ({}", &digits[..1], &digits[1..]),
        5..=7 => format!("+{} ({}) - {}", &digits[..1], &digits[1..4], &digits[4..]),
        _ => format!(
            "+{} ({}) - {} - {}",
            &digits[..1],
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        ),
    }
}
