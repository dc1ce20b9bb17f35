// ficha-cadastro: input masking and derived values

use chrono::{Datelike, NaiveDate};

/// Digits in a Brazilian mobile number including the two-digit area code.
pub const PHONE_DIGITS: usize = 11;

/// Storage format of the birth date (what a date input produces).
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format of dates in the pt-BR locale.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Masks raw phone input as `(DD) NNNNN-NNNN`, rendering whatever prefix
/// of the mask the typed digits allow. Extra digits are dropped.
pub fn format_phone(raw: &str) -> String {
    let numbers: String = digits(raw).chars().take(PHONE_DIGITS).collect();
    // ASCII digits only, so byte slicing is char slicing
    match numbers.len() {
        0 => String::new(),
        1..=2 => format!("({}", numbers),
        3..=7 => format!("({}) {}", &numbers[..2], &numbers[2..]),
        _ => format!("({}) {}-{}", &numbers[..2], &numbers[2..7], &numbers[7..]),
    }
}

pub fn is_phone_complete(masked: &str) -> bool {
    digits(masked).len() == PHONE_DIGITS
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Whole years between `birth_date` (ISO) and `today`.
///
/// Empty when the birth date is missing, unparsable, or lies after `today`.
pub fn compute_age(birth_date: &str, today: NaiveDate) -> String {
    let Some(birth) = parse_iso_date(birth_date) else {
        return String::new();
    };

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    if age < 0 {
        String::new()
    } else {
        age.to_string()
    }
}

/// Reformats an ISO date for display, `-` when it cannot be parsed.
pub fn format_date_display(iso: &str) -> String {
    match parse_iso_date(iso) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => "-".to_string(),
    }
}
