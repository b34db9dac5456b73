// crates/idp-visibility-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for command parsing and command execution.
// Purpose: Ensure reports match the fixture deployment and failures surface.
// Dependencies: idp-visibility-cli main helpers
// ============================================================================

//! ## Overview
//! Runs CLI commands against the config crate's fixture deployment and
//! checks the rendered JSON.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use clap::Parser;
use serde_json::Value;
use serde_json::json;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::execute;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn fixture_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("idp-visibility-config")
        .join("tests")
        .join("fixtures")
        .join("idp-visibility.toml")
}

fn run_json(args: &[&str]) -> Value {
    let config = fixture_config();
    let mut argv = vec!["idp-visibility", "--config", config.to_str().expect("utf-8 path")];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("parse args");
    let command = cli.command.expect("command");
    let output = execute(cli.config.as_deref(), command).expect("execute");
    serde_json::from_str(&output).expect("json output")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn idps_lists_visible_entity_ids_in_catalog_order() {
    let output = run_json(&["idps", "--sp", "sp-onForSpsWithIdpList"]);
    let ids: Vec<&str> = output
        .as_array()
        .expect("array")
        .iter()
        .map(|record| record["entity_id"].as_str().expect("entity id"))
        .collect();
    assert_eq!(ids, vec!["idp-bare", "idp-forSpsExclude"]);
}

#[test]
fn sources_with_logos_decorates_only_valid_urls() {
    let output = run_json(&["sources", "--sp", "sp-bare", "--logos"]);
    assert_eq!(
        output,
        json!([
            { "label": "local" },
            {
                "label": "bare",
                "idp_entity_id": "idp-bare",
                "logo_url": "https://idp-bare.example.org/logo.png"
            }
        ])
    );
}

#[test]
fn explain_reports_rejecting_rule() {
    let output = run_json(&["explain", "--sp", "sp-bare", "--idp", "idp-exclude"]);
    assert_eq!(
        output,
        json!({
            "sp_entity_id": "sp-bare",
            "idp_entity_id": "idp-exclude",
            "accepted": false,
            "reason": "excluded_by_default"
        })
    );
}

#[test]
fn explain_omits_reason_when_accepted() {
    let output = run_json(&["explain", "--sp", "sp-onForSps", "--idp", "idp-forSps"]);
    assert_eq!(output["accepted"], json!(true));
    assert!(output.get("reason").is_none());
}

#[test]
fn graph_lists_every_entity() {
    let output = run_json(&["graph"]);
    assert_eq!(output["sp_to_idps"].as_array().expect("sp links").len(), 3);
    assert_eq!(output["idp_to_sps"].as_array().expect("idp links").len(), 4);
}

#[test]
fn unknown_sp_fails_hard() {
    let config = fixture_config();
    let config = config.to_str().expect("utf-8 path");
    let argv = ["idp-visibility", "--config", config, "idps", "--sp", "sp-x"];
    let cli = Cli::try_parse_from(argv).expect("parse args");
    let err = execute(cli.config.as_deref(), cli.command.expect("command")).unwrap_err();
    assert_eq!(err.to_string(), "Visibility query failed: unknown sp entity: sp-x");
}

#[test]
fn config_validate_summarizes_deployment() {
    let config = fixture_config();
    let command = Commands::Config {
        command: ConfigCommand::Validate,
    };
    let output = execute(Some(config.as_path()), command).expect("validate");
    assert_eq!(
        output,
        "Config valid: 4 IDPs, 3 SPs (0 malformed), 7 auth sources, 1 load findings."
    );
}

#[test]
fn missing_settings_file_reports_load_failure() {
    let missing = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("no-such-settings.toml");
    let err = execute(Some(missing.as_path()), Commands::Graph).unwrap_err();
    assert!(err.to_string().starts_with("Failed to load config: config io error"));
}

#[test]
fn version_flag_parses_without_subcommand() {
    let cli = Cli::try_parse_from(["idp-visibility", "--version"]).expect("parse args");
    assert!(cli.show_version);
    assert!(cli.command.is_none());
}
