use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

/// Longest phone number the form accepts (E.164 maximum)
pub const MAX_PHONE_DIGITS: usize = 15;
pub const MIN_PHONE_DIGITS: usize = 7;

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"^\d{{{MIN_PHONE_DIGITS},{MAX_PHONE_DIGITS}}}$"))
    .expect("phone pattern is a valid regex")
});

/// True iff `phone` is 7 to 15 ASCII digits and nothing else
pub fn validate_phone(phone: &str) -> bool {
  // `\d` is Unicode-aware in the regex crate, so rule out non-ASCII digits first
  phone.is_ascii() && PHONE_PATTERN.is_match(phone)
}

pub fn validate_name(name: &str) -> bool {
  !name.trim().is_empty()
}

/// Keystroke-time cleanup: keep ASCII digits only, capped at the input's max length
pub fn sanitize_phone(raw: &str) -> String {
  raw.chars().filter(|c| c.is_ascii_digit()).take(MAX_PHONE_DIGITS).collect()
}

/// Check both fields, name first
pub fn validate_fields(name: &str, phone: &str) -> Result<(), ValidationError> {
  if !validate_name(name) {
    return Err(ValidationError::EmptyName);
  }
  if !validate_phone(phone) {
    return Err(ValidationError::InvalidPhone);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validate_phone_accepts_bounds() {
    assert!(validate_phone("1234567"));
    assert!(validate_phone("123456789012345"));
    assert!(validate_phone("4420794601"));
  }

  #[test]
  fn test_phone_bounds_follow_constants() {
    assert!(validate_phone(&"1".repeat(MIN_PHONE_DIGITS)));
    assert!(validate_phone(&"1".repeat(MAX_PHONE_DIGITS)));
    assert!(!validate_phone(&"1".repeat(MIN_PHONE_DIGITS - 1)));
    assert!(!validate_phone(&"1".repeat(MAX_PHONE_DIGITS + 1)));
  }

  #[test]
  fn test_validate_phone_rejects_length() {
    assert!(!validate_phone(""));
    assert!(!validate_phone("123"));
    assert!(!validate_phone("123456"));
    assert!(!validate_phone("1234567890123456"));
  }

  #[test]
  fn test_validate_phone_rejects_non_digits() {
    assert!(!validate_phone("12a4567"));
    assert!(!validate_phone("+4420794601"));
    assert!(!validate_phone("442 079 4601"));
    assert!(!validate_phone("1234567\n"));
    // Arabic-Indic digits are digits, just not ASCII ones
    assert!(!validate_phone("١٢٣٤٥٦٧"));
  }

  #[test]
  fn test_sanitize_strips_and_caps() {
    assert_eq!(sanitize_phone("+44 (20) 7946-0199"), "442079460199");
    assert_eq!(sanitize_phone("12a4567"), "124567");
    assert_eq!(sanitize_phone("1234567890123456789"), "123456789012345");
    assert_eq!(sanitize_phone("abc"), "");
  }

  #[test]
  fn test_sanitized_input_reduces_to_length_check() {
    let cleaned = sanitize_phone("12a4567");
    assert!(!validate_phone(&cleaned));
    let cleaned = sanitize_phone("12a45678");
    assert!(validate_phone(&cleaned));
  }

  #[test]
  fn test_validate_name() {
    assert!(validate_name("John Smith"));
    assert!(validate_name("  Jo  "));
    assert!(!validate_name(""));
    assert!(!validate_name(" \t\n"));
  }

  #[test]
  fn test_validate_fields_reports_name_first() {
    assert_eq!(validate_fields("", "1"), Err(ValidationError::EmptyName));
    assert_eq!(validate_fields("Ann", "1"), Err(ValidationError::InvalidPhone));
    assert_eq!(validate_fields("Ann", "5550101"), Ok(()));
  }
}
