use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "agrid")]
#[command(about = "AgriDiagnose - agricultural assistant with a hosted LLM and a rule-based fallback", long_about = None)]
struct Cli {
    /// Assistant config file (defaults to ~/.config/agrid/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = agrid_server::config::DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = agrid_server::config::DEFAULT_PORT)]
        port: u16,
        /// Directory for uploaded images
        #[arg(long, default_value = agrid_server::config::DEFAULT_UPLOAD_DIR)]
        upload_dir: PathBuf,
        /// Directory with a web front end, served for unknown paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Start an interactive chat session
    Chat,
    /// Ask a single question and print the reply
    Ask {
        message: String,
        /// Image attached to the question (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
}

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Interactive commands keep the terminal quiet unless RUST_LOG asks otherwise.
    match cli.command {
        Commands::Serve { .. } => init_tracing("agrid=info,tower_http=info"),
        Commands::Chat | Commands::Ask { .. } => init_tracing("agrid=warn"),
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Serve {
            host,
            port,
            upload_dir,
            static_dir,
        } => {
            let server = agrid_server::ServerConfig {
                host,
                port,
                upload_dir,
                static_dir,
                ..agrid_server::ServerConfig::default()
            };
            commands::serve::run(config, server).await?
        }
        Commands::Chat => commands::chat::run(config).await?,
        Commands::Ask { message, images } => commands::ask::run(config, &message, &images).await?,
    }

    Ok(())
}
