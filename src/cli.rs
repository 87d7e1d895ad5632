//! Command-line interface parsing for Pitwall
//!
//! This module handles parsing of CLI arguments using clap, with one
//! subcommand per API endpoint plus global overrides for the API base URL
//! and the cache directory.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pitwall - motorsport session and telemetry data, cached locally
#[derive(Parser, Debug)]
#[command(name = "pitwall")]
#[command(about = "Browse motorsport session and telemetry data with a local versioned cache")]
#[command(version)]
pub struct Cli {
    /// Base URL of the data API (overrides the PITWALL_API_BASE environment variable)
    #[arg(long, value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Directory for the cache store (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per API endpoint
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the season schedule for one or more years
    Events {
        /// Season year; repeat the flag to fetch several seasons at once
        #[arg(long = "year", value_name = "YEAR", required = true)]
        years: Vec<i32>,
    },
    /// List the sessions of an event
    Sessions {
        /// Season year
        #[arg(long)]
        year: i32,
        /// Event key, e.g. "bahrain"
        #[arg(long)]
        event: String,
    },
    /// List the drivers who took part in a session
    Drivers {
        /// Season year
        #[arg(long)]
        year: i32,
        /// Event key, e.g. "bahrain"
        #[arg(long)]
        event: String,
        /// Session name, e.g. "Race" or "Sprint Qualifying"
        #[arg(long)]
        session: String,
    },
    /// Compare two drivers lap by lap
    Comparison {
        /// Season year
        #[arg(long)]
        year: i32,
        /// Event key
        #[arg(long)]
        event: String,
        /// Session name
        #[arg(long)]
        session: String,
        /// First driver's number
        #[arg(long)]
        driver1: u32,
        /// Second driver's number
        #[arg(long)]
        driver2: u32,
    },
    /// Show telemetry for one lap of each of two drivers
    Telemetry {
        /// Season year
        #[arg(long)]
        year: i32,
        /// Event key
        #[arg(long)]
        event: String,
        /// Session name
        #[arg(long)]
        session: String,
        /// First driver's number
        #[arg(long)]
        driver1: u32,
        /// Second driver's number
        #[arg(long)]
        driver2: u32,
        /// Lap number for the first driver
        #[arg(long)]
        lap1: u32,
        /// Lap number for the second driver
        #[arg(long)]
        lap2: u32,
    },
    /// Show the race summary with standings and tyre stints
    Summary {
        /// Season year
        #[arg(long)]
        year: i32,
        /// Event key
        #[arg(long)]
        event: String,
        /// Session name
        #[arg(long)]
        session: String,
    },
}
