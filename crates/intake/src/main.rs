use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake::commands;
use intake::config::IntakeConfig;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Contact intake form - saves a name and phone number, then predicts where they are from")]
#[command(version)]
struct Cli {
  /// Log diagnostic detail to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(flatten)]
  config: IntakeConfig,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fill in contacts interactively until an empty name is entered
  Form,
  /// Submit a single contact
  Submit {
    /// Contact name
    #[arg(long)]
    name: String,
    /// Phone number; anything but digits is dropped
    #[arg(long)]
    phone: String,
    /// Print the final form state as JSON instead of the panels
    #[arg(long)]
    json: bool,
  },
  /// Predict a country of origin without saving anything
  Predict {
    /// Contact name
    #[arg(long)]
    name: String,
    /// Phone number; anything but digits is dropped
    #[arg(long)]
    phone: String,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = cli.config.with_build_defaults();

  match cli.command {
    Commands::Form => commands::form::handle(config).await,
    Commands::Submit { name, phone, json } => commands::submit::handle(config, name, phone, json).await,
    Commands::Predict { name, phone } => commands::predict::handle(config, name, phone).await,
  }
}

/// The developer console: silent unless RUST_LOG or --verbose asks for it
fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("intake=debug,info")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
  };

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}
