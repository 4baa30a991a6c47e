use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod fetch;
pub mod render;
pub mod serve;

use crate::core::AppConfig;
use crate::github::RangeQuery;
use render::OutputFormat;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port, the next free one is used if taken
        #[arg(long, default_value = "3003")]
        port: u16,
    },
    /// Fetch a contribution calendar and save it as a JSON snapshot
    Fetch {
        #[arg(long)]
        username: String,
        /// Number of months back from today
        #[arg(long)]
        months: Option<String>,
        /// Start date (YYYY-MM-DD or RFC 3339), requires --to
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD or RFC 3339), requires --from
        #[arg(long)]
        to: Option<String>,
        /// Write the snapshot here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a saved snapshot without touching the network
    Render {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long, value_enum, default_value = "svg")]
        format: OutputFormat,
        /// Write the output here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Render option as key=value, e.g. --option boxSize=12
        #[arg(long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// Logging for one-shot commands goes to stderr so stdout stays clean
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Fetch {
            username,
            months,
            from,
            to,
            out,
        }) => {
            init_cli_tracing();
            let config = AppConfig::from_env()?;
            let range = RangeQuery { months, from, to };
            fetch::run(&config, &username, &range, out.as_deref()).await?;
        }
        Some(Command::Render {
            snapshot,
            format,
            out,
            options,
        }) => {
            init_cli_tracing();
            render::run(&snapshot, format, out.as_deref(), &options)?;
        }
        None => {}
    }

    Ok(())
}
