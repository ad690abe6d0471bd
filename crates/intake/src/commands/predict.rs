use anyhow::{Context, Result};

use crate::commands;
use crate::config::IntakeConfig;
use crate::display;
use crate::record::ContactRecord;
use crate::validation;

/// Ask for a prediction without saving anything
pub async fn handle(config: IntakeConfig, name: String, phone: String) -> Result<()> {
  let record = ContactRecord::new(&name, &validation::sanitize_phone(&phone))?;
  let platform = commands::connect(&config)?;

  bentley::info!("Predicting country of origin...");
  let prediction = platform
    .predictor
    .predict(record.name(), record.phone_number())
    .await
    .context("prediction request failed")?;

  println!("{}", display::render_prediction(&prediction));
  Ok(())
}
