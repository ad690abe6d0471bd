use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input};

use crate::commands;
use crate::config::IntakeConfig;
use crate::display;
use crate::error;
use crate::form::{ContactIntakeForm, SubmitOutcome};

/// Interactive form: prompt for contacts until an empty name is entered
pub async fn handle(config: IntakeConfig) -> Result<()> {
  let platform = commands::connect(&config)?;
  let (form, _) = commands::mount_form(platform, &config).await?;

  bentley::as_banner(|line| println!("{line}"), "Contact intake", Some(display::PANEL_WIDTH), None);
  println!("{}", console::style("Leave the name empty to quit.").dim());

  let mut saved = 0;
  loop {
    let name = prompt("Name").await?;
    if name.trim().is_empty() {
      break;
    }
    form.set_name(&name);

    let phone = prompt("Phone number (digits only, up to 15)").await?;
    form.set_phone(&phone);

    match submit_and_report(&form, |line| println!("{line}")).await {
      Ok(SubmitOutcome::Completed { .. } | SubmitOutcome::SavedWithoutPrediction { .. }) => saved += 1,
      Ok(SubmitOutcome::Busy) => {}
      Err(err) if err.is_validation() => tracing::debug!("submission rejected: {err}"),
      Err(err) => tracing::warn!("submission did not complete: {err}"),
    }

    let panels = display::render_panels(&form.snapshot());
    if !panels.is_empty() {
      println!("{panels}");
    }
  }

  form.unmount();
  bentley::success!(&format!("Saved {saved} contact(s) this session"));
  Ok(())
}

async fn prompt(label: &'static str) -> Result<String> {
  tokio::task::spawn_blocking(move || {
    Input::<String>::with_theme(&ColorfulTheme::default())
      .with_prompt(label)
      .allow_empty(true)
      .interact_text()
  })
  .await?
  .context("failed to read input")
}

/// Submit the form, emitting each interim status while it runs and the
/// final status once it returns.
///
/// Everything is emitted from the calling task, so the final status always
/// comes last. Statuses from before the call (such as a sign-in failure
/// already reported at mount) are not repeated.
pub async fn submit_and_report(
  form: &ContactIntakeForm,
  mut emit: impl FnMut(&str),
) -> error::Result<SubmitOutcome> {
  let mut state = form.subscribe();
  let submission = form.submit();
  tokio::pin!(submission);

  let result = loop {
    tokio::select! {
      biased;
      Ok(()) = state.changed() => {
        let status = state.borrow_and_update().status.clone();
        if let Some(status) = status.filter(|status| !status.is_terminal()) {
          emit(&display::render_status(&status));
        }
      }
      result = &mut submission => break result,
    }
  };

  if !matches!(result, Ok(SubmitOutcome::Busy)) {
    if let Some(status) = form.snapshot().status {
      emit(&display::render_status(&status));
    }
  }
  result
}
