pub mod form;
pub mod predict;
pub mod submit;

use anyhow::{Context, Result};

use crate::config::IntakeConfig;
use crate::form::{ContactIntakeForm, FormState};
use crate::platform::{self, Platform};
use crate::status::StatusKind;

/// Build the platform from configuration
pub fn connect(config: &IntakeConfig) -> Result<Platform> {
  platform::create_platform(config).context("failed to set up backing services")
}

/// Mount a form and wait for its session to settle.
///
/// A failed sign-in is reported but not fatal; the form still mounts and
/// submissions report the missing session themselves.
pub async fn mount_form(
  platform: Platform,
  config: &IntakeConfig,
) -> Result<(ContactIntakeForm, FormState)> {
  let form = ContactIntakeForm::mount(platform, config.initial_auth_token.clone());
  let ready = form.wait_until_ready().await?;

  match (&ready.user_id, &ready.status) {
    (Some(uid), _) => tracing::debug!(uid = %uid, "form ready"),
    (None, Some(status)) if status.kind == StatusKind::Error => {
      bentley::warn!(&status.message);
    }
    (None, _) => {
      bentley::warn!("No session was established; contacts cannot be saved.");
    }
  }

  Ok((form, ready))
}
