//! `dwarf-collect` -- one-shot character collection run.
//!
//! Reads the member roster, fetches every member's characters from the
//! Lost Ark API, filters by minimum item level, and merges the results
//! into the character store.
//!
//! # Flags
//!
//! | Flag                | Default                    | Description                    |
//! |---------------------|----------------------------|--------------------------------|
//! | `--min-level <n>`   | `1600.0`                   | Minimum item level to keep     |
//! | `--roster <path>`   | `configs/members.json`     | Roster file                    |
//! | `--store <path>`    | `data/character_data.json` | Store file                     |
//! | `--debug`           | off                        | Debug-level logging            |
//!
//! # Environment variables
//!
//! | Variable                  | Required | Description                          |
//! |---------------------------|----------|--------------------------------------|
//! | `LOSTARK_API_KEY`         | yes      | Pre-issued API key (bearer token)    |
//! | `LOSTARK_MAX_CONCURRENCY` | no       | In-flight request ceiling            |
//!
//! Exit code is 0 when the run completed, even with per-member
//! failures recorded in the results; non-zero only on a fatal
//! condition (roster unreadable, store unwritable).

use std::sync::Arc;

use dwarf_collector::{CollectorService, RunError};
use dwarf_core::types::CollectionStatus;
use dwarf_lostark::{ClientConfig, LostarkClient};
use dwarf_store::CharacterStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MIN_LEVEL: f64 = 1600.0;
const DEFAULT_ROSTER_PATH: &str = "configs/members.json";
const DEFAULT_STORE_PATH: &str = "data/character_data.json";

/// Parse a CLI flag value like `--min-level 1620`.
fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find_map(|pair| {
        if pair[0] == flag {
            Some(pair[1].clone())
        } else {
            None
        }
    })
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let debug = args.contains(&"--debug".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if debug {
                    "dwarf_collector=debug,dwarf_lostark=debug,dwarf_store=debug".into()
                } else {
                    "dwarf_collector=info,dwarf_lostark=info,dwarf_store=info".into()
                }
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let min_level: f64 = match parse_cli_value(&args, "--min-level") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::error!(value = %raw, "--min-level must be a number");
            std::process::exit(1);
        }),
        None => DEFAULT_MIN_LEVEL,
    };

    let roster_path = parse_cli_value(&args, "--roster")
        .unwrap_or_else(|| DEFAULT_ROSTER_PATH.to_string());
    let store_path = parse_cli_value(&args, "--store")
        .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());

    let api_key = std::env::var("LOSTARK_API_KEY").unwrap_or_else(|_| {
        tracing::error!("LOSTARK_API_KEY environment variable is required");
        std::process::exit(1);
    });

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

    let service = CollectorService::new(&roster_path, CharacterStore::new(&store_path), client);

    // Ctrl-C stops issuing new fetches; in-flight work completes and a
    // partial result set is still merged and reported.
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight fetches");
            ctrl_c_cancel.cancel();
        }
    });

    tracing::info!(min_level, roster = %roster_path, store = %store_path, "Collecting characters");

    match service.run(min_level, &cancel).await {
        Ok(results) => {
            let members_with_characters =
                results.iter().filter(|r| r.stored_count() > 0).count();
            let total_characters: usize = results.iter().map(|r| r.stored_count()).sum();

            for result in &results {
                match result.status {
                    CollectionStatus::Complete => {}
                    CollectionStatus::Partial => tracing::warn!(
                        member_id = %result.member_id,
                        failed_handles = result.failures.len(),
                        "Member collected partially",
                    ),
                    CollectionStatus::Cancelled => tracing::warn!(
                        member_id = %result.member_id,
                        "Member skipped due to cancellation",
                    ),
                }
            }

            println!(
                "Collected {total_characters} characters across {members_with_characters} members \
                 ({} roster entries processed)",
                results.len()
            );
        }
        Err(RunError::Config(e)) => {
            tracing::error!(error = %e, "Roster unusable, nothing collected");
            std::process::exit(1);
        }
        Err(RunError::Store { source, results }) => {
            tracing::error!(
                error = %source,
                members = results.len(),
                "Run finished but the store was not updated",
            );
            std::process::exit(2);
        }
    }
}
