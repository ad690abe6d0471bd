use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{IntakeError, Result};
use crate::platform::IdentityService;
use crate::record::SessionIdentity;
use crate::status::{self, StatusKind, Transition, UiStatus};

/// What the rest of the form knows about the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
  pub ready: bool,
  pub identity: Option<SessionIdentity>,
  pub status: Option<UiStatus>,
}

impl Default for SessionState {
  fn default() -> Self {
    Self { ready: false, identity: None, status: Some(status::project(Transition::Connecting)) }
  }
}

/// Establishes one identity per mount before submissions are allowed
pub struct SessionBootstrapper {
  identity_service: Arc<dyn IdentityService>,
  initial_auth_token: Option<String>,
}

impl SessionBootstrapper {
  pub fn new(identity_service: Arc<dyn IdentityService>, initial_auth_token: Option<String>) -> Self {
    Self {
      identity_service,
      initial_auth_token: initial_auth_token.filter(|token| !token.is_empty()),
    }
  }

  /// Subscribe to identity changes and react to them until unmounted.
  ///
  /// Must be called from within a Tokio runtime.
  pub fn mount(self) -> SessionHandle {
    let (state_tx, state_rx) = watch::channel(SessionState::default());
    let mut identities = self.identity_service.subscribe();

    let task = tokio::spawn(async move {
      loop {
        let current = identities.borrow_and_update().clone();
        self.on_identity_changed(current, &state_tx).await;
        if identities.changed().await.is_err() {
          tracing::debug!("identity service went away, session listener stopping");
          break;
        }
      }
    });

    SessionHandle { state: state_rx, task }
  }

  async fn on_identity_changed(
    &self,
    identity: Option<SessionIdentity>,
    state: &watch::Sender<SessionState>,
  ) {
    let already_signed_in = state.borrow().identity.is_some();
    match identity {
      Some(identity) => state.send_modify(|session| record_identity(session, identity)),
      None if already_signed_in => {
        // The session identity is fixed for the lifetime of the mount
        tracing::warn!("identity service reported a sign-out, keeping the session identity");
      }
      None => {
        if let Err(err) = self.sign_in().await {
          tracing::error!("sign-in failed: {err}");
          state.send_modify(|session| {
            // Unblock the form anyway; submissions will fail on the missing identity
            session.ready = true;
            session.status = Some(status::project(Transition::AuthFailed(&err)));
          });
        }
        // On success the service publishes the new identity and the next
        // notification records it
      }
    }
  }

  async fn sign_in(&self) -> Result<SessionIdentity> {
    match self.initial_auth_token.as_deref() {
      Some(token) => {
        tracing::debug!("signing in with pre-issued token");
        self.identity_service.sign_in_with_custom_token(token).await
      }
      None => {
        tracing::debug!("signing in anonymously");
        self.identity_service.sign_in_anonymously().await
      }
    }
  }
}

fn record_identity(session: &mut SessionState, identity: SessionIdentity) {
  match &session.identity {
    None => {
      tracing::info!(uid = %identity.uid, "session established");
      session.identity = Some(identity);
    }
    Some(existing) if existing.uid != identity.uid => {
      tracing::warn!(uid = %identity.uid, kept = %existing.uid, "ignoring identity change");
    }
    Some(_) => {}
  }
  session.ready = true;
  if session.status.as_ref().is_some_and(|s| s.kind == StatusKind::Info) {
    session.status = None;
  }
}

/// A mounted session. Dropping it tears the subscription down.
pub struct SessionHandle {
  state: watch::Receiver<SessionState>,
  task: JoinHandle<()>,
}

impl SessionHandle {
  pub fn subscribe(&self) -> watch::Receiver<SessionState> {
    self.state.clone()
  }

  pub fn snapshot(&self) -> SessionState {
    self.state.borrow().clone()
  }

  /// Wait until the session is ready (signed in, or sign-in failed)
  pub async fn wait_until_ready(&self) -> Result<SessionState> {
    let mut state = self.state.clone();
    let ready = state
      .wait_for(|session| session.ready)
      .await
      .map_err(|_| IntakeError::auth("session bootstrap stopped before it was ready"))?;
    Ok(ready.clone())
  }

  pub fn is_mounted(&self) -> bool {
    !self.task.is_finished()
  }

  pub fn unmount(self) {
    drop(self);
  }
}

impl Drop for SessionHandle {
  fn drop(&mut self) {
    self.task.abort();
  }
}
