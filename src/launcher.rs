//! Port preflight and server handoff.
//!
//! The final bootstrap step replaces this process with the server via
//! `exec`, so the orchestrator's lifetime equals the server's. Everything
//! here except [`exec_server`] is side-effect free and testable.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};
use std::process::Command;

use crate::config::BootstrapConfig;
use crate::error::{Error, Result};

/// Which server flavor the plan launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Single-process development server.
    Development,
    /// Multi-worker production server.
    Production { workers: u32 },
}

/// A fully resolved server command, ready to exec.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub mode: LaunchMode,
    pub port: u16,
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchPlan {
    /// Build the launch plan from the resolved configuration.
    ///
    /// `GUNICORN_WORKERS` present selects the production server; absent
    /// selects the development server.
    #[must_use]
    pub fn build(config: &BootstrapConfig) -> Self {
        match config.workers {
            Some(workers) => Self {
                mode: LaunchMode::Production { workers },
                port: config.port,
                program: "gunicorn".to_string(),
                args: vec![
                    "--workers".to_string(),
                    workers.to_string(),
                    "--bind".to_string(),
                    format!("0.0.0.0:{}", config.port),
                    config.server.wsgi_app.clone(),
                ],
            },
            None => Self {
                mode: LaunchMode::Development,
                port: config.port,
                program: "python3".to_string(),
                args: vec!["app.py".to_string()],
            },
        }
    }

    /// Render the command line for logs and `--dry-run`.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (port {})", self.command_line(), self.port)
    }
}

/// Verify the listening port is free by binding and releasing it.
///
/// An occupied port is the one unrecoverable pre-launch condition: the
/// server could never become reachable, so this is fatal.
pub fn preflight_port(port: u16) -> Result<()> {
    let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
    TcpListener::bind(addr)
        .map(drop)
        .map_err(|source| Error::PortBind { port, source })
}

/// Replace this process with the server.
///
/// On success this never returns. A return value is always the exec
/// failure, which the caller treats as fatal.
pub fn exec_server(plan: &LaunchPlan) -> Error {
    use std::os::unix::process::CommandExt;

    let err = Command::new(&plan.program)
        .args(&plan.args)
        .env("PORT", plan.port.to_string())
        .exec();

    Error::Exec {
        program: plan.program.clone(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use crate::env::EnvSnapshot;

    fn config_from(pairs: &[(&str, &str)]) -> BootstrapConfig {
        let env = EnvSnapshot::from_pairs(pairs.iter().copied());
        BootstrapConfig::from_env(&env).unwrap()
    }

    #[test]
    fn absent_workers_yields_development_plan() {
        let plan = LaunchPlan::build(&config_from(&[]));
        assert_eq!(plan.mode, LaunchMode::Development);
        assert_eq!(plan.program, "python3");
        assert_eq!(plan.args, vec!["app.py"]);
    }

    #[test]
    fn workers_yield_production_plan() {
        let plan = LaunchPlan::build(&config_from(&[
            ("GUNICORN_WORKERS", "3"),
            ("PORT", "9999"),
        ]));
        assert_eq!(plan.mode, LaunchMode::Production { workers: 3 });
        assert_eq!(plan.program, "gunicorn");
        assert!(plan.args.contains(&"0.0.0.0:9999".to_string()));
        assert!(plan.args.contains(&"app:app".to_string()));
    }

    #[test]
    fn wsgi_app_override_lands_in_plan() {
        let plan = LaunchPlan::build(&config_from(&[
            ("GUNICORN_WORKERS", "2"),
            ("SERVER_APP", "backdoor:application"),
        ]));
        assert!(plan.args.contains(&"backdoor:application".to_string()));
    }

    #[test]
    fn command_line_renders_full_invocation() {
        let plan = LaunchPlan::build(&config_from(&[("GUNICORN_WORKERS", "2")]));
        assert_eq!(
            plan.command_line(),
            "gunicorn --workers 2 --bind 0.0.0.0:10000 app:app"
        );
    }

    #[test]
    fn preflight_succeeds_on_free_port() {
        // Port 0 asks the OS for any free port.
        assert!(preflight_port(0).is_ok());
    }

    #[test]
    fn preflight_fails_on_occupied_port() {
        let listener = TcpListener::bind("0.0.0.0:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let err = preflight_port(port).unwrap_err();
        assert!(err.to_string().contains(&port.to_string()));
    }
}
