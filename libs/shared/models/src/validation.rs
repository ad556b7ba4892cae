//! Field checks shared by the registration DTOs.

use std::sync::OnceLock;

use regex::Regex;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be blank", field));
    }
    Ok(())
}

pub fn require_email(field: &str, value: &str) -> Result<(), String> {
    if !email_pattern().is_match(value.trim()) {
        return Err(format!("{} must be a valid e-mail address", field));
    }
    Ok(())
}

/// Accepts strings made only of ASCII digits whose length is in `min..=max`.
pub fn require_digits(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let ok = (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit());
    if !ok {
        return Err(if min == max {
            format!("{} must have exactly {} digits", field, min)
        } else {
            format!("{} must have between {} and {} digits", field, min, max)
        });
    }
    Ok(())
}
