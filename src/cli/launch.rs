//! Handler for the `launch` command.

use tracing::{error, info};

use crate::banner;
use crate::cli::LaunchArgs;
use crate::config::BootstrapConfig;
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::launcher;
use crate::orchestrator::{Orchestrator, StepStatus};
use crate::platform::StorageMode;
use crate::token::DropboxTokenRefresher;

/// Execute the launch command.
///
/// Returns only in dry-run mode or on a fatal launch failure; a successful
/// handoff replaces this process with the server.
pub async fn execute(args: &LaunchArgs) -> Result<()> {
    let env = EnvSnapshot::capture();
    let mut config = BootstrapConfig::from_env(&env)?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(workers) = args.workers {
        config.workers = Some(workers.get());
    }
    if args.memory_only {
        config.storage_mode = StorageMode::MemoryOnly;
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }

    config.init_logging();

    if !args.no_banner {
        banner::print_banner();
    }

    info!(
        platform = %config.platform,
        port = config.port,
        "liftoff starting"
    );

    let refresher = DropboxTokenRefresher::new(config.server.token_refresh_url.clone());
    let orchestrator = Orchestrator::new(config, Box::new(refresher));
    let report = orchestrator.bootstrap().await;

    if args.dry_run {
        println!("Launch plan: {}", report.plan);
        println!();
        for step in &report.steps {
            match &step.status {
                StepStatus::Ready => println!("  ✓ {}", step.name),
                StepStatus::Degraded(reason) => println!("  ⚠ {} - {reason}", step.name),
            }
        }
        println!();
        if report.fully_ready() {
            println!("All steps ready.");
        } else {
            println!("Some steps degraded; the server would still launch.");
        }
        return Ok(());
    }

    launcher::preflight_port(report.plan.port)?;

    info!(command = %report.plan.command_line(), "handing off to server");
    // Only returns on failure.
    let err = launcher::exec_server(&report.plan);
    error!(error = %err, "server handoff failed");
    Err(err)
}
