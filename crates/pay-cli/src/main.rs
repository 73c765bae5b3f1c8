//! # afriart-pay
//!
//! Pay for AfriArt artworks and exhibition tickets with M-Pesa.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the gallery API (or put these in .env)
//! export AFRIART_API_URL=https://afriart.co.ke/api
//!
//! afriart-pay login --email wanjiru@example.com --password ...
//! afriart-pay pay --artwork 42 --phone 0712345678
//! ```

use clap::Parser;
use pay_cli::{commands, output, AppContext, Cli};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();

    if matches!(cli.command, pay_cli::cli::Command::Pay(_)) {
        print_banner();
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("Command failed: {:#}", err);
            eprintln!("{}", output::describe(&err));
            ExitCode::from(output::exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::from_cli(&cli)?;
    commands::run(&ctx, cli.command).await
}

fn print_banner() {
    println!(
        r#"
  🎨 AfriArt Pay
  ━━━━━━━━━━━━━━━━━━━━━━━
  M-Pesa checkout
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
