//! `dwarf-bot` -- long-lived command bot.
//!
//! Reads prefixed commands line-by-line from stdin (the chat transport
//! in front of it is an external concern), dispatches them through the
//! command registry, and prints replies to stdout.
//!
//! # Environment variables
//!
//! | Variable                  | Required | Default                    | Description                       |
//! |---------------------------|----------|----------------------------|-----------------------------------|
//! | `LOSTARK_API_KEY`         | yes      | --                         | Pre-issued API key (bearer token) |
//! | `COMMAND_PREFIX`          | no       | `!`                        | Command prefix                    |
//! | `ROSTER_PATH`             | no       | `configs/members.json`     | Roster file                       |
//! | `STORE_PATH`              | no       | `data/character_data.json` | Store file                        |
//! | `MIN_ITEM_LEVEL`          | no       | `1600`                     | Default collection threshold      |
//! | `LOSTARK_MAX_CONCURRENCY` | no       | client default             | In-flight request ceiling         |
//!
//! Ctrl-C cancels an active collection run cooperatively, then shuts
//! the process down.

use std::sync::Arc;

use dwarf_bot::{CommandContext, CommandRegistry};
use dwarf_collector::CollectorService;
use dwarf_lostark::{ClientConfig, LostarkClient};
use dwarf_store::CharacterStore;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PREFIX: &str = "!";
const DEFAULT_MIN_LEVEL: f64 = 1600.0;
const DEFAULT_ROSTER_PATH: &str = "configs/members.json";
const DEFAULT_STORE_PATH: &str = "data/character_data.json";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "dwarf_bot=info,dwarf_collector=info,dwarf_lostark=info,dwarf_store=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_key = std::env::var("LOSTARK_API_KEY").unwrap_or_else(|_| {
        tracing::error!("LOSTARK_API_KEY environment variable is required");
        std::process::exit(1);
    });

    let prefix = std::env::var("COMMAND_PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string());
    let roster_path =
        std::env::var("ROSTER_PATH").unwrap_or_else(|_| DEFAULT_ROSTER_PATH.to_string());
    let store_path =
        std::env::var("STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    let min_level: f64 = std::env::var("MIN_ITEM_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MIN_LEVEL);

    let mut client_config = ClientConfig::new(api_key);
    if let Some(n) = std::env::var("LOSTARK_MAX_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        client_config.max_concurrency = n;
    }

    let client = match LostarkClient::new(client_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build API client");
            std::process::exit(1);
        }
    };

    let store = CharacterStore::new(&store_path);
    let service = Arc::new(CollectorService::new(&roster_path, store.clone(), client));

    let cancel = CancellationToken::new();
    let context = CommandContext::new(service, store, min_level, cancel.clone());
    let registry = CommandRegistry::builtin();

    // Ctrl-C cancels any active run; the main loop then drains and exits.
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, shutting down");
            ctrl_c_cancel.cancel();
        }
    });

    tracing::info!(
        prefix = %prefix,
        roster = %roster_path,
        store = %store_path,
        min_level,
        "dwarf-bot ready",
    );

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(reply) = registry.dispatch(&context, &line, &prefix).await {
                        println!("{reply}");
                    }
                }
                Ok(None) => {
                    tracing::info!("Input closed, shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read input");
                    break;
                }
            },
        }
    }
}
