//! Command-line interface definitions.

pub mod check;
pub mod launch;

use clap::{Parser, Subcommand};
use std::num::NonZeroU32;

/// Liftoff - environment-adaptive bootstrap for the learning server.
#[derive(Parser, Debug)]
#[command(name = "liftoff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bootstrap the environment and hand off to the server
    Launch(LaunchArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `liftoff check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Show the detected platform context and its defaults
    Platform,
    /// Show the credential record state (secrets masked)
    Credentials,
    /// Exercise the token-refresh endpoint once
    Refresh,
}

/// Arguments for the `launch` subcommand.
#[derive(Parser, Debug)]
pub struct LaunchArgs {
    /// Override the listening port
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the worker count (selects the production server)
    #[arg(long)]
    pub workers: Option<NonZeroU32>,

    /// Force memory-only mode regardless of platform
    #[arg(long)]
    pub memory_only: bool,

    /// Resolve the plan and print it without launching
    #[arg(long)]
    pub dry_run: bool,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,
}
