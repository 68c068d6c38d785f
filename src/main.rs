//! Shipyard CLI - deployment orchestrator
//!
//! Usage: shipyard [--config <FILE>] [--json] [-v] <COMMAND>
//!
//! Commands:
//!   deploy       Install a release on the matched instances
//!   rollback     Re-activate an older installation
//!   copy-shared  Copy shared folders from another stage
//!   release      Build and publish a release

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use shipyard::application::{
    ActionReport, CopySharedRequest, DeployRequest, RollbackRequest,
};
use shipyard::config::{self, Config};
use shipyard::domain::entities::Release;
use shipyard::domain::ports::ActionEventSink;
use shipyard::domain::value_objects::Filter;
use shipyard::presentation::{create_renderer, factory, format_warning, OutputFormat};

/// Shipyard - deploy releases to server/environment/stage instances
#[derive(Parser, Debug)]
#[command(name = "shipyard")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "TARGET is <servers>:<environments>:<stages>, each a comma list or * (e.g. web:*:prod).")]
struct Cli {
    /// Configuration file (defaults to ./shipyard.toml, then the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit NDJSON events for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install a release on every matched instance and activate it
    Deploy {
        /// Release name or commitish
        release: String,

        /// Instances to deploy to
        target: String,
    },

    /// Re-activate an older installation
    Rollback {
        /// Instances to roll back
        target: String,

        /// Release to roll back to (defaults to the previous installation)
        #[arg(long = "to")]
        rollback_to: Option<String>,

        /// Only roll back instances currently running this release
        #[arg(long = "from")]
        rollback_from: Option<String>,
    },

    /// Copy shared folders from another stage of the same server and environment
    CopyShared {
        /// Instances to copy into
        target: String,

        /// Stage to copy from
        source_stage: String,
    },

    /// Build a release from the repository and publish it
    Release {
        /// Commit, branch or tag to build
        commitish: String,

        /// Release name (defaults to the commitish)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let events = factory::create_event_sink(cli.json);

    let report = match cli.command {
        Commands::Deploy { release, target } => cmd_deploy(&config, events, &release, &target)?,
        Commands::Rollback {
            target,
            rollback_to,
            rollback_from,
        } => cmd_rollback(&config, events, &target, rollback_to, rollback_from)?,
        Commands::CopyShared {
            target,
            source_stage,
        } => cmd_copy_shared(&config, events, &target, &source_stage)?,
        Commands::Release { commitish, name } => cmd_release(&config, events, &commitish, name)?,
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    print!("{}", create_renderer(format, true).render(&report));

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("SHIPYARD_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let (config, path, warnings) = config::discover(explicit)?;
    for warning in &warnings {
        warn!("{}", format_warning(warning));
    }

    let config = config.with_env_overrides();
    config
        .validate()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn cmd_deploy(
    config: &Config,
    events: Arc<dyn ActionEventSink>,
    release: &str,
    target: &str,
) -> Result<ActionReport> {
    let runner = factory::create_runner(config, events)?;
    let action = factory::create_deploy_action(config)?;
    let request = DeployRequest {
        release: Release::new(release, None),
        target: Filter::parse(target)?,
    };
    Ok(runner.run(&action, &request)?)
}

fn cmd_rollback(
    config: &Config,
    events: Arc<dyn ActionEventSink>,
    target: &str,
    rollback_to: Option<String>,
    rollback_from: Option<String>,
) -> Result<ActionReport> {
    let runner = factory::create_runner(config, events)?;
    let action = factory::create_rollback_action(config);
    let request = RollbackRequest {
        target: Filter::parse(target)?,
        rollback_to,
        rollback_from,
    };
    Ok(runner.run(&action, &request)?)
}

fn cmd_copy_shared(
    config: &Config,
    events: Arc<dyn ActionEventSink>,
    target: &str,
    source_stage: &str,
) -> Result<ActionReport> {
    let runner = factory::create_runner(config, events)?;
    let action = factory::create_copy_shared_action(config);
    let request = CopySharedRequest {
        target: Filter::parse(target)?,
        source_stage: source_stage.to_string(),
    };
    Ok(runner.run(&action, &request)?)
}

fn cmd_release(
    config: &Config,
    events: Arc<dyn ActionEventSink>,
    commitish: &str,
    name: Option<String>,
) -> Result<ActionReport> {
    let runner = factory::create_runner(config, events)?;
    let action = factory::create_release_action(config)?;
    Ok(runner.run(&action, &Release::new(commitish, name))?)
}
