use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use form_api::{compose_message, decode_voice, parse_request, MailSettings};
use layout::{resolve_all, resolve_layout_traced, LayoutConfig, TracingTrace};
use shared::domain::CardId;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print card layouts for a viewport width as JSON.
    Layout {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        card: Option<CardId>,
    },
    /// Validate a layout TOML file.
    CheckLayout { path: PathBuf },
    /// Compose the email for a JSON submission without sending it. Voice
    /// memos are attached as recorded.
    RenderMail {
        path: PathBuf,
        #[arg(long, default_value = "portfolio@localhost")]
        from: String,
        #[arg(long, default_value = "owner@localhost")]
        to: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Layout {
            width,
            config,
            card,
        } => {
            let config = match config {
                Some(path) => LayoutConfig::load(&path)?,
                None => LayoutConfig::default(),
            };
            let descriptors = match card {
                Some(card) => vec![resolve_layout_traced(&config, width, card, &TracingTrace)],
                None => resolve_all(&config, width),
            };
            let rows: Vec<_> = descriptors
                .iter()
                .map(|descriptor| {
                    serde_json::json!({
                        "layout": descriptor,
                        "label": descriptor.label(&config),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Command::CheckLayout { path } => {
            LayoutConfig::load(&path)?;
            println!("{} is a valid layout configuration", path.display());
        }
        Command::RenderMail { path, from, to } => {
            let body = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let request = parse_request(&body)?;
            form_api::validate(&request)?;
            let voice = decode_voice(&request)?;
            let mail = MailSettings { from, to };
            let message = compose_message(&mail, &request, voice.as_ref())?;
            print!("{}", message.to_rfc822());
        }
    }

    Ok(())
}
