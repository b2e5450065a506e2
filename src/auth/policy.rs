use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref USERNAME_CHARSET_RE: Regex = Regex::new(r"^[A-Za-z0-9._]{8,20}$").unwrap();
    static ref DOUBLE_SEPARATOR_RE: Regex = Regex::new(r"[._]{2}").unwrap();
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '_'
}

/// 8-20 chars of letters, digits, `.` and `_`; separators never doubled and
/// never at either end.
pub fn is_valid_username(username: &str) -> bool {
    if !USERNAME_CHARSET_RE.is_match(username) || DOUBLE_SEPARATOR_RE.is_match(username) {
        return false;
    }
    let starts = username.starts_with(is_separator);
    let ends = username.ends_with(is_separator);
    !starts && !ends
}

/// At least 8 chars with at least one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Plain equality for the confirmation field; not a secret comparison.
pub fn is_same_password(password: &str, confirm_password: &str) -> bool {
    password == confirm_password
}
