// crates/idp-visibility-cli/src/main.rs
// ============================================================================
// Module: IdP Visibility CLI Entry Point
// Description: Command dispatcher for IdP visibility reporting.
// Purpose: Let operators inspect which IDPs each SP may present.
// Dependencies: clap, idp-visibility-config, idp-visibility-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The IdP visibility CLI loads a deployment (settings, metadata directory,
//! authsources file) and reports filtering results as JSON: visible IDPs for
//! an SP, reduced auth sources, the SP<->IDP link graph, and the rule behind a
//! single decision. All user-facing strings are routed through the message
//! catalog. Security posture: inputs are untrusted and loaded fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use idp_visibility_cli::t;
use idp_visibility_config::Deployment;
use idp_visibility_core::IdpEntityId;
use idp_visibility_core::RejectReason;
use idp_visibility_core::SpEntityId;
use idp_visibility_core::VisibilityService;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "idp-visibility", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Settings file path (defaults to idp-visibility.toml or `IDP_VISIBILITY_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the IDPs visible to an SP.
    Idps(IdpsCommand),
    /// List the auth sources an SP may offer.
    Sources(SourcesCommand),
    /// Print the deployment-wide SP<->IDP link graph.
    Graph,
    /// Explain the decision for one SP and IDP.
    Explain(ExplainCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `idps` command.
#[derive(Args, Debug)]
struct IdpsCommand {
    /// SP entity id.
    #[arg(long, value_name = "ENTITY_ID")]
    sp: String,
}

/// Arguments for the `sources` command.
#[derive(Args, Debug)]
struct SourcesCommand {
    /// SP entity id.
    #[arg(long, value_name = "ENTITY_ID")]
    sp: String,
    /// Attach validated logo URLs to IDP-backed sources.
    #[arg(long, action = ArgAction::SetTrue)]
    logos: bool,
}

/// Arguments for the `explain` command.
#[derive(Args, Debug)]
struct ExplainCommand {
    /// SP entity id.
    #[arg(long, value_name = "ENTITY_ID")]
    sp: String,
    /// IDP entity id.
    #[arg(long, value_name = "ENTITY_ID")]
    idp: String,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate every configured input.
    Validate,
}

/// JSON output of the `explain` command.
#[derive(Debug, Serialize)]
struct ExplainReport {
    /// SP the decision was made for.
    sp_entity_id: SpEntityId,
    /// IDP the decision was made about.
    idp_entity_id: IdpEntityId,
    /// Whether the IDP is visible.
    accepted: bool,
    /// Rule that hid the IDP, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<RejectReason>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let output = execute(cli.config.as_deref(), command)?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints CLI help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Runs a command and returns its rendered output.
fn execute(config: Option<&Path>, command: Commands) -> CliResult<String> {
    match command {
        Commands::Idps(command) => command_idps(config, &command),
        Commands::Sources(command) => command_sources(config, &command),
        Commands::Graph => command_graph(config),
        Commands::Explain(command) => command_explain(config, &command),
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate => command_config_validate(config),
        },
    }
}

// ============================================================================
// SECTION: Visibility Commands
// ============================================================================

/// Executes the `idps` command.
fn command_idps(config: Option<&Path>, command: &IdpsCommand) -> CliResult<String> {
    let service = load_service(config)?.0;
    let visible = service
        .visible_idps(&SpEntityId::new(command.sp.as_str()))
        .map_err(|err| CliError::new(t!("visibility.failed", error = err)))?;
    render_json(&visible)
}

/// Executes the `sources` command.
fn command_sources(config: Option<&Path>, command: &SourcesCommand) -> CliResult<String> {
    let (service, has_auth_sources) = load_service(config)?;
    if !has_auth_sources {
        return Err(CliError::new(t!("sources.not_configured")));
    }
    let sources = service
        .visible_auth_sources(&SpEntityId::new(command.sp.as_str()), command.logos)
        .map_err(|err| CliError::new(t!("visibility.failed", error = err)))?;
    render_json(&sources)
}

/// Executes the `graph` command.
fn command_graph(config: Option<&Path>) -> CliResult<String> {
    let service = load_service(config)?.0;
    render_json(&service.visibility_graph())
}

/// Executes the `explain` command.
fn command_explain(config: Option<&Path>, command: &ExplainCommand) -> CliResult<String> {
    let service = load_service(config)?.0;
    let sp_entity_id = SpEntityId::new(command.sp.as_str());
    let idp_entity_id = IdpEntityId::new(command.idp.as_str());
    let decision = service
        .explain(&sp_entity_id, &idp_entity_id)
        .map_err(|err| CliError::new(t!("visibility.failed", error = err)))?;
    render_json(&ExplainReport {
        sp_entity_id,
        idp_entity_id,
        accepted: decision.is_accepted(),
        reason: decision.reject_reason(),
    })
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Executes the config validation command.
fn command_config_validate(config: Option<&Path>) -> CliResult<String> {
    let deployment = load_deployment(config)?;
    deployment
        .settings
        .audit_sink()
        .map_err(|err| CliError::new(t!("config.audit_failed", error = err)))?;
    let metadata = &deployment.metadata;
    Ok(t!(
        "config.validate.ok",
        idps = metadata.idps.len(),
        sps = metadata.sps.len(),
        malformed = metadata.sps.malformed().count(),
        sources = deployment.auth_sources.as_ref().map_or(0, |sources| sources.sources.len()),
        diagnostics = metadata.diagnostics.len()
    ))
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads the deployment named by the settings file.
fn load_deployment(config: Option<&Path>) -> CliResult<Deployment> {
    Deployment::load(config).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds a visibility service and reports whether auth sources are configured.
fn load_service(config: Option<&Path>) -> CliResult<(VisibilityService, bool)> {
    let deployment = load_deployment(config)?;
    let audit = deployment
        .settings
        .audit_sink()
        .map_err(|err| CliError::new(t!("config.audit_failed", error = err)))?;
    let has_auth_sources = deployment.auth_sources.is_some();
    Ok((deployment.into_service(audit), has_auth_sources))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Renders a value as pretty-printed JSON.
fn render_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
