use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::IntakeConfig;
use crate::error::{IntakeError, Result};
use crate::platform::{api_error_message, CountryPredictor};

pub const FALLBACK_PREDICTION: &str = "Could not determine country of origin.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant that estimates a person's likely \
country of origin. Use the name's linguistic origin and the phone number's international dialing \
prefix, and search the web when that helps. Answer in one or two short sentences naming the most \
likely country and the main reason.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
  contents: Vec<Content>,
  tools: Vec<Tool>,
  system_instruction: Content,
}

#[derive(Debug, Serialize)]
struct Content {
  parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
  text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
  google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl Content {
  fn text(text: impl Into<String>) -> Self {
    Self { parts: vec![Part { text: text.into() }] }
  }
}

pub fn build_prompt(name: &str, phone_number: &str) -> String {
  format!(
    "Given the name \"{name}\" and the phone number \"{phone_number}\", what is this person's \
     most likely country of origin?"
  )
}

/// One grounded single-turn request for the given contact
pub fn build_request(name: &str, phone_number: &str) -> GenerateContentRequest {
  GenerateContentRequest {
    contents: vec![Content::text(build_prompt(name, phone_number))],
    tools: vec![Tool { google_search: GoogleSearch {} }],
    system_instruction: Content::text(SYSTEM_INSTRUCTION),
  }
}

/// First candidate's text, or the fallback when the response doesn't have one
pub fn extract_text(response: &Value) -> String {
  response
    .pointer("/candidates/0/content/parts/0/text")
    .and_then(Value::as_str)
    .map(str::to_string)
    .unwrap_or_else(|| FALLBACK_PREDICTION.to_string())
}

pub struct GeminiPredictor {
  client: reqwest::Client,
  endpoint: String,
  api_key: Option<String>,
}

impl GeminiPredictor {
  pub fn new(client: reqwest::Client, config: &IntakeConfig) -> Self {
    let endpoint = format!(
      "{}/v1beta/models/{}:generateContent",
      config.generative_base_url.trim_end_matches('/'),
      config.gemini_model
    );
    Self { client, endpoint, api_key: config.gemini_api_key.clone() }
  }
}

#[async_trait]
impl CountryPredictor for GeminiPredictor {
  async fn predict(&self, name: &str, phone_number: &str) -> Result<String> {
    let mut request = self.client.post(&self.endpoint).json(&build_request(name, phone_number));
    if let Some(key) = self.api_key.as_deref().filter(|key| !key.is_empty()) {
      request = request.query(&[("key", key)]);
    }

    let response = request
      .send()
      .await
      .map_err(|e| IntakeError::prediction(format!("inference service unreachable: {}", e.without_url())))?;

    let status = response.status();
    if !status.is_success() {
      let text = response.text().await.unwrap_or_default();
      tracing::debug!(%status, body = %text, "generateContent rejected");
      return Err(IntakeError::prediction(format!("HTTP {}: {}", status, api_error_message(&text))));
    }

    // A 2xx body we can't read is treated like one without a candidate
    let body: Value = match response.json().await {
      Ok(body) => body,
      Err(e) => {
        tracing::warn!("unreadable generateContent response: {e}");
        Value::Null
      }
    };
    Ok(extract_text(&body))
  }
}
