//! Contact intake: collect a name and phone number, save them to Firestore
//! under an anonymous (or pre-issued) Firebase session, then ask Gemini for
//! the contact's likely country of origin.

pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod platform;
pub mod record;
pub mod session;
pub mod status;
pub mod validation;

// Re-export commonly used types for easier testing
pub use config::IntakeConfig;
pub use error::{IntakeError, ValidationError};
pub use form::{ContactIntakeForm, FormState, SubmissionPhase, SubmitOutcome};
pub use platform::{CountryPredictor, DocumentStore, IdentityService, Platform};
pub use record::{ContactRecord, SessionIdentity, SubmissionResult};
pub use status::{StatusKind, UiStatus};
