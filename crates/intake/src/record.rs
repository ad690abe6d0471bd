use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation;

/// A validated contact, ready to be written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
  name: String,
  phone_number: String,
}

impl ContactRecord {
  /// Validate raw form fields. The name is stored trimmed.
  pub fn new(name: &str, phone_number: &str) -> Result<Self, ValidationError> {
    validation::validate_fields(name, phone_number)?;
    Ok(Self { name: name.trim().to_string(), phone_number: phone_number.to_string() })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn phone_number(&self) -> &str {
    &self.phone_number
  }
}

/// The most recent saved submission, shown in the "last submission" panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
  pub name: String,
  pub phone_number: String,
  pub document_id: String,
  /// Local time the write was acknowledged; the stored `createdAt` is server time
  pub saved_at: DateTime<Utc>,
}

impl SubmissionResult {
  pub fn new(record: &ContactRecord, document_id: impl Into<String>) -> Self {
    Self {
      name: record.name().to_string(),
      phone_number: record.phone_number().to_string(),
      document_id: document_id.into(),
      saved_at: Utc::now(),
    }
  }
}

/// Identity assigned by the identity service for this session
#[derive(Clone, PartialEq, Eq)]
pub struct SessionIdentity {
  pub uid: String,
  /// Bearer credential for store writes
  pub id_token: String,
}

impl SessionIdentity {
  pub fn new(uid: impl Into<String>, id_token: impl Into<String>) -> Self {
    Self { uid: uid.into(), id_token: id_token.into() }
  }
}

// Keep the token out of logs
impl std::fmt::Debug for SessionIdentity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SessionIdentity").field("uid", &self.uid).field("id_token", &"<redacted>").finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_trims_name() {
    let record = ContactRecord::new("  John Smith ", "442079460199").unwrap();
    assert_eq!(record.name(), "John Smith");
    assert_eq!(record.phone_number(), "442079460199");
  }

  #[test]
  fn test_record_rejects_invalid_fields() {
    assert_eq!(ContactRecord::new(" ", "442079460199"), Err(ValidationError::EmptyName));
    assert_eq!(ContactRecord::new("Ann", "12345"), Err(ValidationError::InvalidPhone));
  }

  #[test]
  fn test_submission_result_copies_record() {
    let record = ContactRecord::new("Ann", "5550101").unwrap();
    let result = SubmissionResult::new(&record, "doc-1");
    assert_eq!(result.name, "Ann");
    assert_eq!(result.phone_number, "5550101");
    assert_eq!(result.document_id, "doc-1");
  }

  #[test]
  fn test_submission_result_json_field_names() {
    let record = ContactRecord::new("Ann", "5550101").unwrap();
    let json = serde_json::to_value(SubmissionResult::new(&record, "doc-1")).unwrap();
    assert_eq!(json["phoneNumber"], "5550101");
    assert_eq!(json["documentId"], "doc-1");
    assert!(json["savedAt"].is_string());
  }

  #[test]
  fn test_identity_debug_redacts_token() {
    let identity = SessionIdentity::new("uid-1", "secret-token");
    let printed = format!("{identity:?}");
    assert!(printed.contains("uid-1"));
    assert!(!printed.contains("secret-token"));
  }
}
