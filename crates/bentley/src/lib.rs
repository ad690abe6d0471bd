//! ## Features
//!
//! - Leveled console logging (info, warn, error, success)
//! - Multi-line message support with consistent prefixes
//! - Banners and key/value panels for terminal front ends
//! - A process-wide quiet switch for machine-readable output modes
//! - All output to stderr, stdout stays free for command results
//!
//! ## Usage
//!
//! Logging functions: `info()`, `warn()`, `error()`, `success()`
//!
//! Layout helpers: `banner_line()`, `as_banner()`, `panel()`

use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Severity of a console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Success,
  Warn,
  Error,
}

impl Level {
  pub fn tag(&self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Success => "sccs",
      Level::Warn => "warn",
      Level::Error => "error",
    }
  }

  fn color(&self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Success => Color::Green,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
    }
  }
}

/// Suppress (or restore) console output for the whole process
pub fn set_quiet(quiet: bool) {
  QUIET.store(quiet, Ordering::SeqCst);
}

pub fn is_quiet() -> bool {
  QUIET.load(Ordering::SeqCst)
}

/// Core output function, one stderr line per message line
pub fn log(message: &str) {
  if is_quiet() {
    return;
  }
  for line in message.lines() {
    eprintln!("{line}");
  }
}

/// Format a colored, padded prefix for the given level
pub fn format_prefix(level: Level) -> String {
  let tag = level.tag();
  format!("[{}]{:<width$}", tag.color(level.color()).bold(), "", width = 7 - tag.len() - 2)
}

/// Prefix every line of `message` for `level`
pub fn render(level: Level, message: &str) -> Vec<String> {
  let prefix = format_prefix(level);
  message.lines().map(|line| format!("{prefix} {line}")).collect()
}

pub fn emit(level: Level, message: &str) {
  for line in render(level, message) {
    log(&line);
  }
}

/// Info level logging - general information
pub fn info(message: &str) {
  emit(Level::Info, message);
}

/// Warning level logging - something needs attention
pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

/// Error level logging - something went wrong
pub fn error(message: &str) {
  emit(Level::Error, message);
}

/// Success level logging - something completed successfully
pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Create a banner line of the specified length and character
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Display a message with a banner around it
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let border_char = border_char.unwrap_or('=');

  let banner = banner_line(width, border_char);

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// Lay out a titled block of aligned `label: value` rows.
///
/// Labels are padded to the longest label so values line up:
///
/// ```
/// let text = bentley::panel("Last submission", &[("Name", "Ada"), ("Phone", "5550101")], 30);
/// assert!(text.contains("Name  : Ada"));
/// ```
pub fn panel(title: &str, rows: &[(&str, &str)], width: usize) -> String {
  let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
  let rule = banner_line(width, '-');

  let mut out = Vec::with_capacity(rows.len() + 3);
  out.push(rule.clone());
  out.push(title.to_string());
  out.push(rule.clone());
  for (label, value) in rows {
    out.push(format!("{label:<label_width$}: {value}"));
  }
  out.push(rule);
  out.join("\n")
}

/// Macros for coverage-excluded logging - these expand with LCOV_EXCL_LINE at call sites
#[macro_export]
macro_rules! info {
  ($msg:expr) => {
    $crate::info($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! warn {
  ($msg:expr) => {
    $crate::warn($msg); // LCOV_EXCL_LINE
  };
}

#[macro_export]
macro_rules! success {
  ($msg:expr) => {
    $crate::success($msg); // LCOV_EXCL_LINE
  };
}
