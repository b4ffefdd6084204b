//! Beacon - command-line front end for the Skylink satellite gateway
//!
//! Each subcommand runs one gateway operation against the provider and
//! prints the result as pretty JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, warn};
use satmsg::{ErrorKind, ProviderClient, ProviderConfig};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "beacon",
    about = "Query and send satellite terminal messages",
    version
)]
struct Cli {
    #[arg(
        long,
        env = "SKYLINK_PROVIDER_CONFIG",
        help = "Provider settings file (defaults to ~/.config/skylink/provider.json, then INMARSAT_* variables)"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Args)]
struct Window {
    #[arg(long = "start-utc", help = "Window start, passed to the provider verbatim")]
    start_utc: String,

    #[arg(long = "end-utc", help = "Window end, passed to the provider verbatim")]
    end_utc: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Raw return messages (terminal to gateway)
    Messages(Window),
    /// Forward messages merged with their statuses and error descriptions
    Forward(Window),
    /// One chat thread per terminal
    Chat(Window),
    /// Send a text message to a terminal
    Send {
        #[arg(long, help = "Destination terminal ID")]
        destination: String,

        #[arg(long, help = "Message text (characters above U+00FF are rejected)")]
        message: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = config::init() {
        warn!("Failed to initialize config directory: {}", e);
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            match ErrorKind::of(&e) {
                ErrorKind::Validation => ExitCode::from(2),
                ErrorKind::Provider | ErrorKind::Internal => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let settings = match &cli.config {
        Some(path) => ProviderConfig::from_file(path)?,
        None => {
            if !ProviderConfig::is_available() {
                if let Some(path) = ProviderConfig::default_config_path() {
                    warn!(
                        "To configure provider access, either:\n\
                         1. Place provider settings at: {}\n\
                         2. Or set INMARSAT_BASE_URL, INMARSAT_ACCESS_ID, INMARSAT_ACCESS_PASSWORD, \
                         INMARSAT_USERNAME and INMARSAT_PASSWORD",
                        path.display()
                    );
                }
            }
            ProviderConfig::load()?
        }
    };
    let client = ProviderClient::new(&settings);

    let output: Value = match cli.command {
        Command::Messages(w) => satmsg::fetch_return_messages(&client, &w.start_utc, &w.end_utc)?,
        Command::Forward(w) => serde_json::to_value(satmsg::fetch_forward_reconciled(
            &client,
            &w.start_utc,
            &w.end_utc,
        )?)?,
        Command::Chat(w) => {
            serde_json::to_value(satmsg::fetch_chat_threads(&client, &w.start_utc, &w.end_utc)?)?
        }
        Command::Send {
            destination,
            message,
        } => satmsg::submit_outbound_message(&client, &destination, &message)?,
    };

    serde_json::to_string_pretty(&output).context("Failed to render output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_command() {
        let cli = Cli::try_parse_from([
            "beacon",
            "chat",
            "--start-utc",
            "2024-01-01 00:00:00",
            "--end-utc",
            "2024-01-02 00:00:00",
        ])
        .unwrap();

        match cli.command {
            Command::Chat(w) => {
                assert_eq!(w.start_utc, "2024-01-01 00:00:00");
                assert_eq!(w.end_utc, "2024-01-02 00:00:00");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_send_command() {
        let cli = Cli::try_parse_from([
            "beacon",
            "--config",
            "/tmp/provider.json",
            "send",
            "--destination",
            "T9",
            "--message",
            "hi",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/provider.json")));
        assert!(matches!(
            cli.command,
            Command::Send { ref destination, ref message } if destination == "T9" && message == "hi"
        ));
    }

    #[test]
    fn test_window_is_required() {
        assert!(Cli::try_parse_from(["beacon", "forward", "--start-utc", "x"]).is_err());
    }
}
