//! Status banner projection.
//!
//! Every session or submission transition maps to exactly one [`UiStatus`];
//! the form replaces its current status wholesale with the projected one.

use serde::Serialize;

use crate::error::{IntakeError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
  Info,
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiStatus {
  pub message: String,
  pub kind: StatusKind,
}

impl UiStatus {
  pub fn info(message: impl Into<String>) -> Self {
    Self { message: message.into(), kind: StatusKind::Info }
  }

  pub fn success(message: impl Into<String>) -> Self {
    Self { message: message.into(), kind: StatusKind::Success }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self { message: message.into(), kind: StatusKind::Error }
  }

  /// Success and error are final for a submission; info means work is still running
  pub fn is_terminal(&self) -> bool {
    !matches!(self.kind, StatusKind::Info)
  }
}

/// Something the status banner should reflect
#[derive(Debug)]
pub enum Transition<'a> {
  Connecting,
  AuthFailed(&'a IntakeError),
  Rejected(&'a ValidationError),
  Saving,
  Predicting,
  Completed,
  SaveFailed(&'a IntakeError),
  PredictionFailed(&'a IntakeError),
}

pub fn project(transition: Transition<'_>) -> UiStatus {
  match transition {
    Transition::Connecting => UiStatus::info("Connecting..."),
    Transition::AuthFailed(err) => UiStatus::error(err.to_string()),
    Transition::Rejected(err) => UiStatus::error(err.to_string()),
    Transition::Saving => UiStatus::info("Saving contact..."),
    Transition::Predicting => UiStatus::info("Contact saved. Predicting country of origin..."),
    Transition::Completed => UiStatus::success("Contact saved and country of origin predicted."),
    Transition::SaveFailed(err) => UiStatus::error(err.to_string()),
    Transition::PredictionFailed(err) => {
      UiStatus::error(format!("Contact saved, but {}", lowercase_first(&err.to_string())))
    }
  }
}

fn lowercase_first(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_lowercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_interim_states_are_info() {
    for transition in [Transition::Connecting, Transition::Saving, Transition::Predicting] {
      let status = project(transition);
      assert_eq!(status.kind, StatusKind::Info);
      assert!(!status.is_terminal());
    }
  }

  #[test]
  fn test_completed_is_terminal_success() {
    let status = project(Transition::Completed);
    assert_eq!(status.kind, StatusKind::Success);
    assert!(status.is_terminal());
  }

  #[test]
  fn test_rejection_uses_validation_message() {
    let status = project(Transition::Rejected(&ValidationError::InvalidPhone));
    assert_eq!(status, UiStatus::error("Please enter a valid phone number (7 to 15 digits)."));
  }

  #[test]
  fn test_save_failure_message() {
    let err = IntakeError::store("HTTP 403 Forbidden");
    let status = project(Transition::SaveFailed(&err));
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.message, "Failed to save contact: HTTP 403 Forbidden");
  }

  #[test]
  fn test_prediction_failure_mentions_saved_record() {
    let err = IntakeError::prediction("HTTP 500");
    let status = project(Transition::PredictionFailed(&err));
    assert_eq!(status.message, "Contact saved, but country prediction failed: HTTP 500");
    assert!(status.is_terminal());
  }

  #[test]
  fn test_status_kind_serializes_lowercase() {
    let json = serde_json::to_value(UiStatus::success("ok")).unwrap();
    assert_eq!(json["kind"], "success");
  }
}
