//! Firebase REST clients: Identity Toolkit for sign-in, Firestore for writes.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::config::IntakeConfig;
use crate::error::{IntakeError, Result};
use crate::platform::{api_error_message, DocumentStore, IdentityService};
use crate::record::{ContactRecord, SessionIdentity};

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const AUTO_ID_LENGTH: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
  id_token: String,
  local_id: Option<String>,
}

pub struct FirebaseAuth {
  client: reqwest::Client,
  base_url: String,
  api_key: Option<String>,
  current: watch::Sender<Option<SessionIdentity>>,
}

impl FirebaseAuth {
  pub fn new(client: reqwest::Client, config: &IntakeConfig) -> Self {
    let (current, _) = watch::channel(None);
    Self {
      client,
      base_url: config.identity_base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      current,
    }
  }

  async fn sign_in(&self, action: &str, body: Value) -> Result<SessionIdentity> {
    let api_key = self
      .api_key
      .as_deref()
      .filter(|key| !key.is_empty())
      .ok_or_else(|| IntakeError::auth("no Firebase API key configured"))?;

    let url = format!("{}/v1/accounts:{action}", self.base_url);
    tracing::debug!(%url, "signing in");

    let response = self
      .client
      .post(&url)
      .query(&[("key", api_key)])
      .json(&body)
      .send()
      .await
      .map_err(|e| IntakeError::auth(format!("identity service unreachable: {}", e.without_url())))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      return Err(IntakeError::auth(format!("HTTP {}: {}", status, api_error_message(&text))));
    }

    let signed_in: SignInResponse = response
      .json()
      .await
      .map_err(|e| IntakeError::auth(format!("unexpected sign-in response: {e}")))?;

    let uid = match signed_in.local_id {
      Some(uid) => uid,
      None => uid_from_id_token(&signed_in.id_token)?,
    };
    let identity = SessionIdentity::new(uid, signed_in.id_token);

    self.current.send_replace(Some(identity.clone()));
    Ok(identity)
  }
}

#[async_trait]
impl IdentityService for FirebaseAuth {
  fn subscribe(&self) -> watch::Receiver<Option<SessionIdentity>> {
    self.current.subscribe()
  }

  async fn sign_in_anonymously(&self) -> Result<SessionIdentity> {
    self.sign_in("signUp", json!({ "returnSecureToken": true })).await
  }

  async fn sign_in_with_custom_token(&self, token: &str) -> Result<SessionIdentity> {
    self.sign_in("signInWithCustomToken", json!({ "token": token, "returnSecureToken": true })).await
  }
}

/// Read the Firebase uid out of an ID token's claims.
///
/// Custom-token sign-in does not echo the uid back, but the token carries it
/// as `user_id` (and `sub`). The signature is not checked, the token came
/// straight from the identity service.
pub fn uid_from_id_token(id_token: &str) -> Result<String> {
  let payload = id_token
    .split('.')
    .nth(1)
    .ok_or_else(|| IntakeError::auth("ID token is not a JWT"))?;
  let bytes = URL_SAFE_NO_PAD
    .decode(payload.trim_end_matches('='))
    .map_err(|e| IntakeError::auth(format!("ID token payload is not base64: {e}")))?;
  let claims: Value = serde_json::from_slice(&bytes)
    .map_err(|e| IntakeError::auth(format!("ID token payload is not JSON: {e}")))?;

  claims["user_id"]
    .as_str()
    .or_else(|| claims["sub"].as_str())
    .filter(|uid| !uid.is_empty())
    .map(str::to_string)
    .ok_or_else(|| IntakeError::auth("ID token has no user id"))
}

pub struct FirestoreStore {
  client: reqwest::Client,
  base_url: String,
  database: String,
  collection_path: String,
}

impl FirestoreStore {
  pub fn new(client: reqwest::Client, config: &IntakeConfig, project_id: &str) -> Self {
    Self {
      client,
      base_url: config.firestore_base_url.trim_end_matches('/').to_string(),
      database: format!("projects/{project_id}/databases/(default)"),
      collection_path: config.collection_path(),
    }
  }

  pub fn document_name(&self, document_id: &str) -> String {
    format!("{}/documents/{}/{}", self.database, self.collection_path, document_id)
  }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
  async fn add_contact(&self, record: &ContactRecord, author: &SessionIdentity) -> Result<String> {
    let document_id = auto_id();
    let body = commit_body(&self.document_name(&document_id), record, &author.uid);
    let url = format!("{}/v1/{}/documents:commit", self.base_url, self.database);

    let response = self
      .client
      .post(&url)
      .bearer_auth(&author.id_token)
      .json(&body)
      .send()
      .await
      .map_err(|e| IntakeError::store(format!("document store unreachable: {}", e.without_url())))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      tracing::debug!(%status, body = %text, "commit rejected");
      return Err(IntakeError::store(format!("HTTP {}: {}", status, api_error_message(&text))));
    }

    let commit: Value = response
      .json()
      .await
      .map_err(|e| IntakeError::store(format!("unexpected commit response: {e}")))?;
    tracing::debug!(commit_time = ?commit["commitTime"].as_str(), %document_id, "commit accepted");

    Ok(document_id)
  }
}

/// A create-only write with a server timestamp for `createdAt`
pub fn commit_body(document_name: &str, record: &ContactRecord, author_uid: &str) -> Value {
  json!({
    "writes": [{
      "update": {
        "name": document_name,
        "fields": {
          "name": { "stringValue": record.name() },
          "phoneNumber": { "stringValue": record.phone_number() },
          "authorIdentity": { "stringValue": author_uid }
        }
      },
      "updateTransforms": [{
        "fieldPath": "createdAt",
        "setToServerValue": "REQUEST_TIME"
      }],
      "currentDocument": { "exists": false }
    }]
  })
}

/// 20 random alphanumerics, same shape as the Firestore SDKs' auto ids
pub fn auto_id() -> String {
  let mut rng = rand::rng();
  (0..AUTO_ID_LENGTH)
    .map(|_| AUTO_ID_ALPHABET[rng.random_range(0..AUTO_ID_ALPHABET.len())] as char)
    .collect()
}
