use anyhow::{anyhow, Result};

use crate::commands;
use crate::config::IntakeConfig;
use crate::display;
use crate::form::SubmitOutcome;
use crate::validation;

/// Fill the form once, submit it and report the result.
///
/// Exits with an error for anything short of a completed save plus
/// prediction. A failed prediction still prints the saved record first.
pub async fn handle(config: IntakeConfig, name: String, phone: String, json: bool) -> Result<()> {
  if json {
    bentley::set_quiet(true);
  }

  let platform = commands::connect(&config)?;
  let (form, _) = commands::mount_form(platform, &config).await?;

  let sanitized = validation::sanitize_phone(&phone);
  if sanitized != phone {
    bentley::info(&format!("Using phone number {sanitized}"));
  }

  form.set_name(&name);
  form.set_phone(&phone);
  let outcome = form.submit().await;

  let state = form.snapshot();
  if json {
    println!("{}", serde_json::to_string_pretty(&state)?);
  } else {
    display::print_form(&state);
  }
  form.unmount();

  match outcome? {
    SubmitOutcome::Completed { submission, .. } => {
      tracing::debug!(document_id = %submission.document_id, "submission complete");
      Ok(())
    }
    SubmitOutcome::SavedWithoutPrediction { submission, error } => Err(
      anyhow::Error::new(error)
        .context(format!("contact {} was saved without a prediction", submission.document_id)),
    ),
    SubmitOutcome::Busy => Err(anyhow!("another submission is already in flight")),
  }
}
