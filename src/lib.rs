//! Liftoff - environment-adaptive bootstrap for the learning server.
//!
//! This crate detects which hosting platform invoked it, prepares a
//! correctly configured runtime environment, and hands off to the
//! long-running server process exactly once. Every preparation step is
//! best-effort: an unreachable OAuth endpoint or a missing optional
//! dependency degrades a feature but never blocks the launch, so the
//! server's health surface stays available in a broken environment.
//!
//! # Pipeline
//!
//! 1. Capture an immutable [`env::EnvSnapshot`] and resolve a
//!    [`config::BootstrapConfig`] from it, once.
//! 2. Prepare working directories ([`workspace`]), unless memory-only.
//! 3. Probe optional capabilities ([`probe`]).
//! 4. Sync and refresh credentials ([`credentials`], [`token`]).
//! 5. Resolve the launch plan and exec the server ([`launcher`]).
//!
//! # Modules
//!
//! - [`env`] - immutable snapshot of the process environment
//! - [`platform`] - hosting-platform detection and per-platform defaults
//! - [`config`] - the single resolved bootstrap configuration
//! - [`credentials`] - durable OAuth credential record
//! - [`token`] - token-refresh collaborator
//! - [`probe`] - optional-dependency probes
//! - [`workspace`] - working-directory layout
//! - [`orchestrator`] - the step pipeline
//! - [`launcher`] - port preflight and server handoff
//! - [`error`] - fatal-vs-degraded error taxonomy

pub mod banner;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod env;
pub mod error;
pub mod launcher;
pub mod orchestrator;
pub mod platform;
pub mod probe;
pub mod token;
pub mod workspace;
