//! The contact intake view-model.
//!
//! `ContactIntakeForm` owns the session, the two input fields and the
//! submission sequencer. Renderers never call back into it to read state;
//! they subscribe and receive a fresh [`FormState`] after every transition.
//!
//! A submission runs `Idle -> Saving -> Predicting -> Idle`. A failed save
//! returns to `Idle` before any prediction is requested. A failed prediction
//! also returns to `Idle`, but the saved record stays saved and stays in the
//! last-submission panel.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{IntakeError, Result};
use crate::platform::{self, CountryPredictor, DocumentStore, Platform};
use crate::record::{ContactRecord, SubmissionResult};
use crate::session::{SessionBootstrapper, SessionHandle, SessionState};
use crate::status::{self, StatusKind, Transition, UiStatus};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionPhase {
  #[default]
  Idle,
  Saving,
  Predicting,
}

/// Everything a renderer needs to draw the form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
  pub name: String,
  pub phone_number: String,
  pub phase: SubmissionPhase,
  pub session_ready: bool,
  pub user_id: Option<String>,
  pub status: Option<UiStatus>,
  pub last_submission: Option<SubmissionResult>,
  pub prediction: Option<String>,
}

impl FormState {
  /// Whether the submit control is enabled
  pub fn can_submit(&self) -> bool {
    self.phase == SubmissionPhase::Idle && self.session_ready
  }
}

/// How a submit request ended, when nothing was rejected up front
#[derive(Debug)]
pub enum SubmitOutcome {
  /// Another submission was still in flight; nothing happened
  Busy,
  Completed { submission: SubmissionResult, prediction: String },
  /// The record was saved but the prediction failed
  SavedWithoutPrediction { submission: SubmissionResult, error: IntakeError },
}

pub struct ContactIntakeForm {
  state: Arc<watch::Sender<FormState>>,
  session: SessionHandle,
  session_sync: JoinHandle<()>,
  store: Option<Arc<dyn DocumentStore>>,
  predictor: Arc<dyn CountryPredictor>,
}

impl ContactIntakeForm {
  /// Mount the form: start the session bootstrap and mirror it into form state.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn mount(platform: Platform, initial_auth_token: Option<String>) -> Self {
    let session = SessionBootstrapper::new(platform.identity, initial_auth_token).mount();
    let state = Arc::new(watch::Sender::new(FormState::default()));
    let session_sync = tokio::spawn(mirror_session(session.subscribe(), Arc::clone(&state)));

    Self { state, session, session_sync, store: platform.store, predictor: platform.predictor }
  }

  pub fn subscribe(&self) -> watch::Receiver<FormState> {
    self.state.subscribe()
  }

  pub fn snapshot(&self) -> FormState {
    self.state.borrow().clone()
  }

  pub fn can_submit(&self) -> bool {
    self.state.borrow().can_submit()
  }

  /// Wait for the session bootstrap to settle, then return the form state
  pub async fn wait_until_ready(&self) -> Result<FormState> {
    self.session.wait_until_ready().await?;
    let mut state = self.state.subscribe();
    let ready = state
      .wait_for(|form| form.session_ready)
      .await
      .map_err(|_| IntakeError::auth("form was unmounted before the session was ready"))?;
    Ok(ready.clone())
  }

  pub fn set_name(&self, name: &str) {
    self.state.send_if_modified(|form| replace(&mut form.name, name.to_string()));
  }

  /// Phone input is sanitized as it is entered: digits only, at most 15
  pub fn set_phone(&self, raw: &str) {
    let phone = validation::sanitize_phone(raw);
    self.state.send_if_modified(|form| replace(&mut form.phone_number, phone));
  }

  /// Run one submission: validate, save, then predict.
  ///
  /// Validation and save failures come back as `Err` (nothing was persisted).
  /// A prediction failure comes back as [`SubmitOutcome::SavedWithoutPrediction`].
  pub async fn submit(&self) -> Result<SubmitOutcome> {
    let Some(record) = self.begin_submission()? else {
      tracing::debug!("submit ignored, a submission is already in flight");
      return Ok(SubmitOutcome::Busy);
    };

    let identity = self.session.snapshot().identity;
    let document_id =
      match platform::save_contact(self.store.as_deref(), identity.as_ref(), &record).await {
        Ok(document_id) => document_id,
        Err(err) => {
          tracing::error!("save failed: {err}");
          self.finish(Transition::SaveFailed(&err), |_| {});
          return Err(err);
        }
      };

    let submission = SubmissionResult::new(&record, document_id);
    self.state.send_modify(|form| {
      form.phase = SubmissionPhase::Predicting;
      form.last_submission = Some(submission.clone());
      form.name.clear();
      form.phone_number.clear();
      form.status = Some(status::project(Transition::Predicting));
    });

    match self.predictor.predict(record.name(), record.phone_number()).await {
      Ok(prediction) => {
        self.finish(Transition::Completed, |form| form.prediction = Some(prediction.clone()));
        Ok(SubmitOutcome::Completed { submission, prediction })
      }
      Err(error) => {
        tracing::error!(document_id = %submission.document_id, "prediction failed: {error}");
        self.finish(Transition::PredictionFailed(&error), |_| {});
        Ok(SubmitOutcome::SavedWithoutPrediction { submission, error })
      }
    }
  }

  /// Idle -> Saving in one step, so two submits can't both get through
  fn begin_submission(&self) -> Result<Option<ContactRecord>> {
    let mut claimed = None;
    self.state.send_if_modified(|form| {
      if form.phase != SubmissionPhase::Idle {
        return false;
      }

      let checked = if form.session_ready {
        ContactRecord::new(&form.name, &form.phone_number)
      } else {
        Err(crate::error::ValidationError::SessionNotReady)
      };

      match &checked {
        Ok(_) => {
          form.phase = SubmissionPhase::Saving;
          form.last_submission = None;
          form.prediction = None;
          form.status = Some(status::project(Transition::Saving));
        }
        Err(rejection) => form.status = Some(status::project(Transition::Rejected(rejection))),
      }
      claimed = Some(checked);
      true
    });

    match claimed {
      None => Ok(None),
      Some(Ok(record)) => Ok(Some(record)),
      Some(Err(rejection)) => {
        tracing::debug!("submission rejected: {rejection}");
        Err(rejection.into())
      }
    }
  }

  fn finish(&self, transition: Transition<'_>, update: impl FnOnce(&mut FormState)) {
    let status = status::project(transition);
    self.state.send_modify(|form| {
      form.phase = SubmissionPhase::Idle;
      update(form);
      form.status = Some(status);
    });
  }

  pub fn unmount(self) {
    drop(self);
  }
}

impl Drop for ContactIntakeForm {
  fn drop(&mut self) {
    self.session_sync.abort();
  }
}

fn replace(slot: &mut String, value: String) -> bool {
  if *slot == value {
    return false;
  }
  *slot = value;
  true
}

async fn mirror_session(
  mut session: watch::Receiver<SessionState>,
  form: Arc<watch::Sender<FormState>>,
) {
  loop {
    let current = session.borrow_and_update().clone();
    form.send_modify(|state| apply_session(state, &current));
    if session.changed().await.is_err() {
      break;
    }
  }
}

fn apply_session(form: &mut FormState, session: &SessionState) {
  form.session_ready = session.ready;
  form.user_id = session.identity.as_ref().map(|identity| identity.uid.clone());

  // Session messages only ever replace the startup banner
  let showing_startup = match &form.status {
    None => true,
    Some(current) => form.phase == SubmissionPhase::Idle && current.kind == StatusKind::Info,
  };
  if showing_startup {
    form.status = session.status.clone();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::SessionIdentity;

  #[test]
  fn test_can_submit_requires_idle_and_ready() {
    let mut state = FormState::default();
    assert!(!state.can_submit());

    state.session_ready = true;
    assert!(state.can_submit());

    state.phase = SubmissionPhase::Saving;
    assert!(!state.can_submit());

    state.phase = SubmissionPhase::Predicting;
    assert!(!state.can_submit());
  }

  #[test]
  fn test_apply_session_clears_connecting_banner() {
    let mut form = FormState::default();
    apply_session(&mut form, &SessionState::default());
    assert_eq!(form.status, Some(UiStatus::info("Connecting...")));

    let ready = SessionState {
      ready: true,
      identity: Some(SessionIdentity::new("uid-1", "t")),
      status: None,
    };
    apply_session(&mut form, &ready);
    assert!(form.session_ready);
    assert_eq!(form.user_id.as_deref(), Some("uid-1"));
    assert!(form.status.is_none());
  }

  #[test]
  fn test_apply_session_keeps_submission_status() {
    let mut form = FormState {
      status: Some(UiStatus::success("Contact saved and country of origin predicted.")),
      ..FormState::default()
    };
    let ready = SessionState { ready: true, identity: None, status: None };
    apply_session(&mut form, &ready);
    assert_eq!(form.status.unwrap().kind, StatusKind::Success);
  }

  #[test]
  fn test_replace_reports_changes() {
    let mut slot = "a".to_string();
    assert!(!replace(&mut slot, "a".to_string()));
    assert!(replace(&mut slot, "b".to_string()));
    assert_eq!(slot, "b");
  }
}
