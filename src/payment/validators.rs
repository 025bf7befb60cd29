//! Field validators for checkout and signup forms.
//!
//! Every function here is total: it returns `false` (or the weakest rating)
//! for malformed input and never panics.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static UPI_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+@[A-Za-z0-9.-]+$").expect("valid UPI id regex"));

static INDIAN_MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("valid mobile regex"));

static PINCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9][0-9]{5}$").expect("valid pincode regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PERSON_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid name regex"));

static EXPIRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})$").expect("valid expiry regex"));

const MIN_CARD_DIGITS: usize = 16;
const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Card number check: at least 16 digits once separators are stripped, and a
/// valid Luhn checksum.
pub fn validate_card_number(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
    digits.len() >= MIN_CARD_DIGITS && luhn_checksum_valid(&digits)
}

/// Luhn checksum over a digit sequence.
///
/// Every second digit from the right is doubled (minus 9 when above 9); the
/// sequence is valid when the sum is a multiple of 10.
pub fn luhn_checksum_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Two digits, a slash, two digits. Says nothing about whether the date is valid.
pub fn is_expiry_format(mm_yy: &str) -> bool {
    EXPIRY_RE.is_match(mm_yy)
}

/// `MM/YY` expiry check. The card is usable through the whole expiry month, so
/// the first day of the following month must be after `today`.
pub fn validate_expiry(mm_yy: &str, today: NaiveDate) -> bool {
    let Some(caps) = EXPIRY_RE.captures(mm_yy) else {
        return false;
    };
    let (Ok(month), Ok(yy)) = (caps[1].parse::<u32>(), caps[2].parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let year = 2000 + yy;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_after_expiry) => first_after_expiry > today,
        None => false,
    }
}

/// UPI virtual payment address, e.g. `rider.42@okbank`.
pub fn validate_upi_id(upi_id: &str) -> bool {
    UPI_ID_RE.is_match(upi_id)
}

/// Ten-digit Indian mobile number starting with 6-9.
pub fn validate_indian_mobile(mobile: &str) -> bool {
    INDIAN_MOBILE_RE.is_match(mobile)
}

/// Six-digit Indian postal PIN code not starting with 0.
pub fn validate_pincode(pincode: &str) -> bool {
    PINCODE_RE.is_match(pincode)
}

/// Something shaped like `name@domain.tld`, with no whitespace.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Letters and spaces only, not blank.
pub fn validate_person_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && PERSON_NAME_RE.is_match(name)
}

/// Three or four digits.
pub fn validate_cvv(cvv: &str) -> bool {
    (3..=4).contains(&cvv.len()) && cvv.bytes().all(|b| b.is_ascii_digit())
}

/// Password rating shown on the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

/// Score one point each for length >= 8, lowercase, uppercase, digit and a
/// special character.
pub fn password_strength(password: &str) -> PasswordStrength {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
    ];
    let score = checks.iter().filter(|&&passed| passed).count();

    match score {
        0 | 1 => PasswordStrength::Weak,
        2 => PasswordStrength::Fair,
        3 => PasswordStrength::Good,
        _ => PasswordStrength::Strong,
    }
}

/// Last four digits of a card number, for receipts.
pub fn card_suffix(number: &str) -> Option<String> {
    let digits: Vec<char> = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return None;
    }
    Some(digits[digits.len() - 4..].iter().collect())
}
