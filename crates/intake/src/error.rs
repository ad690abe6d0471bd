use thiserror::Error;

/// Why a submission was refused before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Please enter a name.")]
  EmptyName,

  #[error("Please enter a valid phone number (7 to 15 digits).")]
  InvalidPhone,

  #[error("Still connecting, please wait a moment and try again.")]
  SessionNotReady,
}

#[derive(Error, Debug)]
pub enum IntakeError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Authentication failed: {message}")]
  Auth { message: String },

  #[error("Failed to save contact: {message}")]
  Store { message: String },

  #[error("Country prediction failed: {message}")]
  Prediction { message: String },

  #[error("Invalid configuration: {message}")]
  Config { message: String },
}

impl IntakeError {
  pub fn auth(message: impl Into<String>) -> Self {
    Self::Auth { message: message.into() }
  }

  pub fn store(message: impl Into<String>) -> Self {
    Self::Store { message: message.into() }
  }

  pub fn prediction(message: impl Into<String>) -> Self {
    Self::Prediction { message: message.into() }
  }

  pub fn config(message: impl Into<String>) -> Self {
    Self::Config { message: message.into() }
  }

  /// True for errors raised before anything was sent over the network
  pub fn is_validation(&self) -> bool {
    matches!(self, Self::Validation(_))
  }
}

pub type Result<T, E = IntakeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_messages_are_user_facing() {
    let err: IntakeError = ValidationError::EmptyName.into();
    assert_eq!(err.to_string(), "Please enter a name.");
    assert!(err.is_validation());
  }

  #[test]
  fn test_constructor_helpers() {
    assert_eq!(IntakeError::store("HTTP 403").to_string(), "Failed to save contact: HTTP 403");
    assert_eq!(
      IntakeError::prediction("timed out").to_string(),
      "Country prediction failed: timed out"
    );
    assert!(!IntakeError::auth("nope").is_validation());
  }
}
