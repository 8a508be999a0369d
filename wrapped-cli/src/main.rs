use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wrapped_core::Statement;
use wrapped_ingest::{IngestClient, load_statement_file};

mod app;
mod config;
mod copy;
mod layout;
mod logging;
mod render;
mod state;
mod summary;
mod upload_worker;

use logging::LogTarget;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("WRAPPED_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "wrapped",
    version,
    long_version = LONG_VERSION,
    about = "M-PESA Wrapped: your statement as a slide deck"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full-screen viewer. Starts on the upload step unless --json is given.
    View {
        /// Saved service response to show directly
        #[arg(long)]
        json: Option<PathBuf>,

        /// Pre-fill the upload form with this PDF statement
        #[arg(long, conflicts_with = "json")]
        file: Option<PathBuf>,

        /// Statement password (sent by SMS with the statement)
        #[arg(long)]
        password: Option<String>,
    },

    /// Print every slide as text
    Summary {
        /// Saved service response
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        json: Option<PathBuf>,

        /// PDF statement to upload
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, requires = "file")]
        password: Option<String>,
    },

    /// Manage ~/.wrapped/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::View {
            json,
            file,
            password,
        } => {
            logging::init(LogTarget::File, &cfg.log.level)?;
            info!(version = LONG_VERSION, "wrapped view");

            let statement = json.map(|p| load_statement_file(&p)).transpose()?;
            let form = app::UploadForm {
                path: file.map(|p| p.display().to_string()).unwrap_or_default(),
                password: password.unwrap_or_default(),
                ..app::UploadForm::default()
            };
            let client = ingest_client(&cfg)?;
            app::run_view(
                client,
                app::ViewOptions {
                    statement,
                    form,
                    transition_ms: cfg.viewer.transition_ms,
                    mouse: cfg.viewer.mouse,
                },
            )?;
        }

        Command::Summary {
            json,
            file,
            password,
        } => {
            logging::init(LogTarget::Stderr, &cfg.log.level)?;
            let statement = match (json, file) {
                (Some(path), _) => load_statement_file(&path)?,
                (None, Some(path)) => upload(&cfg, &path, password.as_deref()).await?,
                (None, None) => bail!("pass --json <payload> or --file <statement.pdf>"),
            };
            print!("{}", summary::render_summary(&statement));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn ingest_client(cfg: &config::Config) -> Result<IngestClient> {
    IngestClient::new(cfg.api.base_url.clone(), cfg.api.timeout())
        .context("build http client")
}

async fn upload(cfg: &config::Config, path: &Path, password: Option<&str>) -> Result<Statement> {
    if !path.exists() {
        bail!("statement not found: {}", path.display());
    }
    let client = ingest_client(cfg)?;
    match client.upload_file(path, password).await {
        Ok(statement) => Ok(statement),
        Err(e) => {
            warn!(error = %e, "upload failed");
            bail!("{}", e.user_message())
        }
    }
}
