//! Pitwall - motorsport session and telemetry data in the terminal
//!
//! A command-line client for a read-only motorsport data API. Every response
//! is cached in a local versioned store, so repeated queries for finished
//! sessions never touch the network.

mod api;
mod cache;
mod cli;

use clap::Parser;
use serde_json::Value;

use api::ApiClient;
use cache::CacheStore;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(CacheStore::default_dir)
        .ok_or("could not determine a cache directory; pass --cache-dir")?;
    let store = CacheStore::open(cache_dir)?;

    let mut client = ApiClient::new(store);
    if let Some(api_base) = cli.api_base.clone() {
        client = client.with_base_url(api_base);
    }

    let payload = run_command(&client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

/// Dispatches a parsed subcommand against the API client
async fn run_command(
    client: &ApiClient,
    command: Command,
) -> Result<Value, Box<dyn std::error::Error>> {
    let payload = match command {
        Command::Events { years } => {
            let fetches = years.iter().map(|&year| client.events(year));
            let results = futures::future::join_all(fetches).await;

            let mut seasons = Vec::with_capacity(results.len());
            for result in results {
                seasons.push(result?);
            }
            if seasons.len() == 1 {
                seasons.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(seasons)
            }
        }
        Command::Sessions { year, event } => client.sessions(Some(year), Some(&event)).await?,
        Command::Drivers {
            year,
            event,
            session,
        } => {
            client
                .drivers(Some(year), Some(&event), Some(&session))
                .await?
        }
        Command::Comparison {
            year,
            event,
            session,
            driver1,
            driver2,
        } => {
            client
                .race_comparison(
                    Some(year),
                    Some(&event),
                    Some(&session),
                    Some(driver1),
                    Some(driver2),
                )
                .await?
        }
        Command::Telemetry {
            year,
            event,
            session,
            driver1,
            driver2,
            lap1,
            lap2,
        } => {
            client
                .lap_telemetry(
                    Some(year),
                    Some(&event),
                    Some(&session),
                    Some(driver1),
                    Some(driver2),
                    Some(lap1),
                    Some(lap2),
                )
                .await?
        }
        Command::Summary {
            year,
            event,
            session,
        } => {
            client
                .race_summary(Some(year), Some(&event), Some(&session))
                .await?
        }
    };

    Ok(payload)
}
