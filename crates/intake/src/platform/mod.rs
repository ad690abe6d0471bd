use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::IntakeConfig;
use crate::error::{IntakeError, Result};
use crate::record::{ContactRecord, SessionIdentity};

pub mod firebase;
pub mod gemini;

/// Identity service seam - sign-in plus change notifications
#[async_trait]
pub trait IdentityService: Send + Sync {
  /// Identity-change notifications. The current value is the signed-in
  /// identity, `None` while nobody is signed in.
  fn subscribe(&self) -> watch::Receiver<Option<SessionIdentity>>;

  /// Create a fresh anonymous account and sign it in
  async fn sign_in_anonymously(&self) -> Result<SessionIdentity>;

  /// Exchange a pre-issued custom token for a session
  async fn sign_in_with_custom_token(&self, token: &str) -> Result<SessionIdentity>;
}

/// Append-only document store seam
#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Write `record` tagged with `author`, returning the generated document id
  async fn add_contact(&self, record: &ContactRecord, author: &SessionIdentity) -> Result<String>;
}

/// Generative inference seam
#[async_trait]
pub trait CountryPredictor: Send + Sync {
  /// Guess a likely country of origin from a name and phone number
  async fn predict(&self, name: &str, phone_number: &str) -> Result<String>;
}

/// The three collaborators the form talks to
#[derive(Clone)]
pub struct Platform {
  pub identity: Arc<dyn IdentityService>,
  /// Absent when no project is configured; every write then fails
  pub store: Option<Arc<dyn DocumentStore>>,
  pub predictor: Arc<dyn CountryPredictor>,
}

/// Build the production Firebase + Gemini platform from configuration
pub fn create_platform(config: &IntakeConfig) -> Result<Platform> {
  config.validate()?;
  let client = http_client(config.timeout_secs)?;

  let identity = Arc::new(firebase::FirebaseAuth::new(client.clone(), config));
  let store: Option<Arc<dyn DocumentStore>> = match config.project_id.as_deref() {
    Some(project_id) if !project_id.is_empty() => {
      Some(Arc::new(firebase::FirestoreStore::new(client.clone(), config, project_id)))
    }
    _ => {
      tracing::warn!("no Firebase project configured, contacts cannot be saved");
      None
    }
  };
  let predictor = Arc::new(gemini::GeminiPredictor::new(client, config));

  Ok(Platform { identity, store, predictor })
}

pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
  reqwest::Client::builder()
    .timeout(Duration::from_secs(timeout_secs))
    .user_agent(concat!("intake/", env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(|e| IntakeError::config(format!("failed to create HTTP client: {e}")))
}

/// Store writer: refuses to write without a store handle or a session identity
pub async fn save_contact(
  store: Option<&dyn DocumentStore>,
  identity: Option<&SessionIdentity>,
  record: &ContactRecord,
) -> Result<String> {
  let store = store.ok_or_else(|| IntakeError::store("document store is not available"))?;
  let identity = identity.ok_or_else(|| IntakeError::store("not signed in"))?;

  let document_id = store.add_contact(record, identity).await?;
  tracing::info!(document_id = %document_id, author = %identity.uid, "contact saved");
  Ok(document_id)
}

/// Pull a human-readable message out of a Google API error body
pub(crate) fn api_error_message(body: &str) -> String {
  serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
    .unwrap_or_else(|| body.trim().to_string())
}
