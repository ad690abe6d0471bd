use clap::Args;
use url::Url;

use crate::error::{IntakeError, Result};

pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_GENERATIVE_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// App id baked in at compile time, scopes the collection path
pub const BUILD_APP_ID: &str = match option_env!("INTAKE_APP_ID") {
  Some(app_id) => app_id,
  None => "default-app-id",
};

/// Everything the intake form needs to reach its backing services.
///
/// Each field except the app id can be given as a flag or environment
/// variable. The app id is fixed when the binary is built. Credentials that
/// are absent at runtime fall back to values injected at build time (see
/// [`IntakeConfig::with_build_defaults`]).
#[derive(Clone, Args)]
pub struct IntakeConfig {
  /// Application id used to scope stored contacts, never read at runtime
  #[arg(skip = BUILD_APP_ID.to_string())]
  pub app_id: String,

  /// Firebase project that owns the Firestore database
  #[arg(long, global = true, env = "FIREBASE_PROJECT_ID")]
  pub project_id: Option<String>,

  /// Firebase web API key
  #[arg(long, global = true, env = "FIREBASE_API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,

  /// Pre-issued custom auth token (anonymous sign-in is used without one)
  #[arg(long = "auth-token", global = true, env = "INTAKE_AUTH_TOKEN", hide_env_values = true)]
  pub initial_auth_token: Option<String>,

  /// Gemini API key
  #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
  pub gemini_api_key: Option<String>,

  /// Gemini model used for the country prediction
  #[arg(long, global = true, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
  pub gemini_model: String,

  #[arg(long, global = true, env = "INTAKE_IDENTITY_URL", default_value = DEFAULT_IDENTITY_BASE_URL)]
  pub identity_base_url: String,

  #[arg(long, global = true, env = "INTAKE_FIRESTORE_URL", default_value = DEFAULT_FIRESTORE_BASE_URL)]
  pub firestore_base_url: String,

  #[arg(long, global = true, env = "INTAKE_GENERATIVE_URL", default_value = DEFAULT_GENERATIVE_BASE_URL)]
  pub generative_base_url: String,

  /// HTTP request timeout in seconds
  #[arg(long, global = true, env = "INTAKE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  pub timeout_secs: u64,
}

impl Default for IntakeConfig {
  fn default() -> Self {
    Self {
      app_id: BUILD_APP_ID.to_string(),
      project_id: None,
      api_key: None,
      initial_auth_token: None,
      gemini_api_key: None,
      gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
      identity_base_url: DEFAULT_IDENTITY_BASE_URL.to_string(),
      firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
      generative_base_url: DEFAULT_GENERATIVE_BASE_URL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }
}

impl IntakeConfig {
  /// Fill unset credentials from values captured when the binary was built
  pub fn with_build_defaults(mut self) -> Self {
    fill(&mut self.project_id, option_env!("FIREBASE_PROJECT_ID"));
    fill(&mut self.api_key, option_env!("FIREBASE_API_KEY"));
    fill(&mut self.initial_auth_token, option_env!("INTAKE_AUTH_TOKEN"));
    fill(&mut self.gemini_api_key, option_env!("GEMINI_API_KEY"));
    self
  }

  pub fn validate(&self) -> Result<()> {
    if self.app_id.trim().is_empty() {
      return Err(IntakeError::config("app id must not be empty"));
    }
    if self.gemini_model.trim().is_empty() {
      return Err(IntakeError::config("Gemini model must not be empty"));
    }
    if self.timeout_secs == 0 {
      return Err(IntakeError::config("timeout must be at least one second"));
    }
    for (label, value) in [
      ("identity", &self.identity_base_url),
      ("firestore", &self.firestore_base_url),
      ("generative", &self.generative_base_url),
    ] {
      Url::parse(value)
        .map_err(|e| IntakeError::config(format!("{label} base URL '{value}' is invalid: {e}")))?;
    }
    Ok(())
  }

  /// Collection every contact is written to
  pub fn collection_path(&self) -> String {
    format!("artifacts/{}/public/data/contacts", self.app_id)
  }
}

fn fill(slot: &mut Option<String>, build_value: Option<&'static str>) {
  if slot.as_deref().map_or(true, str::is_empty) {
    *slot = build_value.filter(|v| !v.is_empty()).map(str::to_string);
  }
}
