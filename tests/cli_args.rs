//! Integration tests for CLI argument handling
//!
//! Tests subcommand and flag parsing against the compiled binary. Nothing
//! here reaches the network: every invocation either prints help or fails
//! argument validation before a request is made.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pitwall"))
        .args(args)
        .output()
        .expect("Failed to execute pitwall")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pitwall"), "Help should mention pitwall");
    assert!(stdout.contains("events"), "Help should list the events subcommand");
    assert!(stdout.contains("telemetry"), "Help should list the telemetry subcommand");
}

#[test]
fn test_subcommand_help_mentions_flags() {
    let output = run_cli(&["comparison", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--driver1"), "Help should mention --driver1");
    assert!(stdout.contains("--driver2"), "Help should mention --driver2");
}

#[test]
fn test_unknown_subcommand_fails() {
    let output = run_cli(&["standings"]);
    assert!(
        !output.status.success(),
        "Expected an unknown subcommand to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("standings") || stderr.contains("unrecognized"),
        "Should print an error about the unknown subcommand: {}",
        stderr
    );
}

#[test]
fn test_missing_required_flag_fails() {
    let output = run_cli(&["sessions", "--year", "2024"]);
    assert!(
        !output.status.success(),
        "Expected sessions without --event to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--event") || stderr.contains("required"),
        "Should point at the missing flag: {}",
        stderr
    );
}

#[test]
fn test_non_numeric_year_fails_validation() {
    let output = run_cli(&["events", "--year", "twentytwentyfour"]);
    assert!(
        !output.status.success(),
        "Expected a non-numeric year to fail"
    );
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pitwall::cli::{Cli, Command};

    #[test]
    fn test_cli_parses_summary_subcommand() {
        let cli = Cli::parse_from([
            "pitwall", "summary", "--year", "2023", "--event", "suzuka", "--session", "Race",
        ]);
        match cli.command {
            Command::Summary { year, event, session } => {
                assert_eq!(year, 2023);
                assert_eq!(event, "suzuka");
                assert_eq!(session, "Race");
            }
            other => panic!("Expected summary command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_flags_default_to_none() {
        let cli = Cli::parse_from(["pitwall", "events", "--year", "2024"]);
        assert!(cli.api_base.is_none());
        assert!(cli.cache_dir.is_none());
    }
}
