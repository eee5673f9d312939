//! Keystroke formatting for the lead form fields.
//!
//! Every function here is pure and runs on each field change, so stored
//! values are always already normalized.

/// Significant digits in a North American mobile number.
pub const PHONE_DIGIT_LIMIT: usize = 10;

/// Longest masked value, `(DDD)-DDD-DDDD`. Hosts cap raw input at this length.
pub const PHONE_DISPLAY_MAX_LEN: usize = 14;

pub const PHONE_DISPLAY_PLACEHOLDER: &str = "(XXX)-XXX-XXXX";

const SUBMISSION_COUNTRY_PREFIX: &str = "+1";

/// Lower-cases the input and capitalizes each single-space-delimited token.
///
/// Runs of spaces are kept as-is: `"jOHN   smith"` becomes `"John   Smith"`.
#[must_use]
pub fn format_name_display(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    raw.to_lowercase()
        .split(' ')
        .map(capitalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// ASCII digits of `raw`, in order.
#[must_use]
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Masks the digits of `raw` as `(DDD)-DDD-DDDD`, dropping anything past the
/// tenth digit.
#[must_use]
pub fn format_phone_display(raw: &str) -> String {
    let digits = phone_digits(raw);
    let digits = &digits[..digits.len().min(PHONE_DIGIT_LIMIT)];

    match digits.len() {
        0..=3 => digits.to_string(),
        4..=6 => format!("({})-{}", &digits[..3], &digits[3..]),
        _ => format!("({})-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// `+1` followed by the digits of `raw` when exactly ten digits are present.
///
/// `None` is the invalid sentinel: no request may be sent without a value here.
#[must_use]
pub fn format_phone_for_submission(raw: &str) -> Option<String> {
    let digits = phone_digits(raw);
    if digits.len() == PHONE_DIGIT_LIMIT {
        Some(format!("{SUBMISSION_COUNTRY_PREFIX}{digits}"))
    } else {
        None
    }
}

/// Phone value safe for logs: everything but the last four digits is hidden.
#[must_use]
pub fn mask_phone_for_log(raw: &str) -> String {
    let digits = phone_digits(raw);
    let visible = digits.len().saturating_sub(4);
    format!("***{}", &digits[visible..])
}
