//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Acceptance tests for a Cloud Foundry style platform
#[derive(Parser)]
#[command(
    name = "cats",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (default: $CONFIG, then ~/.cats/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (overridden by CATS_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run acceptance scenarios
    Run(commands::run::RunArgs),

    /// List scenarios and whether they are enabled
    List,

    /// Show or validate configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Poll a URL or command until its output matches
    Eventually(commands::poll::EventuallyArgs),

    /// Check that a URL or command keeps matching for a window
    Consistently(commands::poll::ConsistentlyArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before it can report a verdict.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            config,
        });

        match command {
            Command::Run(args) => commands::run::run(&app, &args).await,
            Command::List => commands::list::run(&app),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Eventually(args) => commands::poll::eventually(&app, &args).await,
            Command::Consistently(args) => commands::poll::consistently(&app, &args).await,
            Command::Version => commands::version::run(&app),
        }
    }
}
