use colored::*;

use crate::form::{FormState, SubmissionPhase};
use crate::record::SubmissionResult;
use crate::status::{StatusKind, UiStatus};

pub const PANEL_WIDTH: usize = 60;

/// Interim statuses get the hourglass, terminal ones a check or a cross
pub fn status_icon(status: &UiStatus) -> &'static str {
  if !status.is_terminal() {
    return "⏳";
  }
  match status.kind {
    StatusKind::Error => "❌",
    _ => "✅",
  }
}

pub fn render_status(status: &UiStatus) -> String {
  let message = match status.kind {
    StatusKind::Info => status.message.blue(),
    StatusKind::Success => status.message.green().bold(),
    StatusKind::Error => status.message.red().bold(),
  };
  format!("{} {}", status_icon(status), message)
}

/// Label for the submit control; it reads as disabled whenever it can't be used
pub fn submit_label(state: &FormState) -> &'static str {
  match state.phase {
    SubmissionPhase::Saving => "Saving...",
    SubmissionPhase::Predicting => "Predicting...",
    SubmissionPhase::Idle if !state.session_ready => "Connecting...",
    SubmissionPhase::Idle => "Submit",
  }
}

pub fn render_prediction(prediction: &str) -> String {
  let mut lines = vec![
    bentley::banner_line(PANEL_WIDTH, '-'),
    "🌍 Predicted country of origin".bold().to_string(),
    bentley::banner_line(PANEL_WIDTH, '-'),
  ];
  lines.extend(wrap(prediction, PANEL_WIDTH));
  lines.push(bentley::banner_line(PANEL_WIDTH, '-'));
  lines.join("\n")
}

pub fn render_last_submission(submission: &SubmissionResult) -> String {
  let saved_at = submission.saved_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
  bentley::panel(
    "📇 Last submission",
    &[
      ("Name", submission.name.as_str()),
      ("Phone", submission.phone_number.as_str()),
      ("Document ID", submission.document_id.as_str()),
      ("Saved at", saved_at.as_str()),
    ],
    PANEL_WIDTH,
  )
}

/// Prediction and last-submission panels, whichever are present
pub fn render_panels(state: &FormState) -> String {
  let mut sections = Vec::new();
  if let Some(prediction) = &state.prediction {
    sections.push(render_prediction(prediction));
  }
  if let Some(submission) = &state.last_submission {
    sections.push(render_last_submission(submission));
  }
  sections.join("\n\n")
}

/// The whole form below the inputs: banner, prediction, last submission
pub fn render_form(state: &FormState) -> String {
  let banner = state.status.as_ref().map(render_status);
  let panels = render_panels(state);
  match (banner, panels.is_empty()) {
    (Some(banner), true) => banner,
    (Some(banner), false) => format!("{banner}\n\n{panels}"),
    (None, _) => panels,
  }
}

pub fn print_form(state: &FormState) {
  let rendered = render_form(state);
  if !rendered.is_empty() {
    println!("{rendered}");
  }
}

/// Greedy word wrap; words longer than `width` get a line of their own
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  for paragraph in text.lines() {
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
      if !current.is_empty() && current.chars().count() + word.chars().count() + 1 > width {
        lines.push(std::mem::take(&mut current));
      }
      if !current.is_empty() {
        current.push(' ');
      }
      current.push_str(word);
    }
    lines.push(current);
  }
  lines
}
