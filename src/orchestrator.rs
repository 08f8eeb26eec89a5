//! The bootstrap pipeline.
//!
//! An ordered list of individually-catchable steps: workspace preparation,
//! capability probes, credential sync, token refresh. Every step is
//! best-effort; a failure downgrades that feature and the pipeline keeps
//! going, so the server's health surface stays reachable in a partially
//! degraded environment. Only the final port-bind/exec can be fatal, and
//! that lives in [`crate::launcher`].

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::BootstrapConfig;
use crate::credentials::{CredentialRecord, CredentialStore, SyncOutcome};
use crate::launcher::LaunchPlan;
use crate::platform::StorageMode;
use crate::probe;
use crate::token::TokenRefresher;
use crate::workspace::WorkspaceLayout;

/// Outcome of one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Ready,
    Degraded(String),
}

/// One step's report, kept for logs and `--dry-run` output.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: &'static str,
    pub status: StepStatus,
}

impl StepReport {
    fn ready(name: &'static str) -> Self {
        Self {
            name,
            status: StepStatus::Ready,
        }
    }

    fn degraded(name: &'static str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(step = name, reason = %reason, "continuing degraded");
        Self {
            name,
            status: StepStatus::Degraded(reason),
        }
    }
}

/// Everything bootstrap resolved, short of actually launching.
#[derive(Debug)]
pub struct BootstrapReport {
    pub steps: Vec<StepReport>,
    pub plan: LaunchPlan,
    pub credentials: Option<CredentialRecord>,
}

impl BootstrapReport {
    /// Whether every step came up ready.
    #[must_use]
    pub fn fully_ready(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.status == StepStatus::Ready)
    }
}

/// Runs the bootstrap steps in order against one immutable config.
pub struct Orchestrator {
    config: BootstrapConfig,
    refresher: Box<dyn TokenRefresher>,
    lib_dirs: Vec<PathBuf>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(config: BootstrapConfig, refresher: Box<dyn TokenRefresher>) -> Self {
        Self {
            config,
            refresher,
            lib_dirs: probe::default_lib_dirs(),
        }
    }

    /// Override the shared-library search path (tests).
    #[must_use]
    pub fn with_lib_dirs(mut self, lib_dirs: Vec<PathBuf>) -> Self {
        self.lib_dirs = lib_dirs;
        self
    }

    /// Run every step and resolve the launch plan.
    ///
    /// Never fails: each step catches its own errors and reports
    /// `Degraded` instead. The caller decides whether to exec the plan.
    pub async fn bootstrap(&self) -> BootstrapReport {
        info!(
            platform = %self.config.platform,
            storage_mode = ?self.config.storage_mode,
            port = self.config.port,
            "bootstrap starting"
        );

        let mut steps = Vec::new();

        steps.push(self.prepare_workspace());
        steps.extend(self.probe_capabilities());

        let (credential_step, credentials) = self.sync_credentials();
        steps.push(credential_step);

        steps.push(self.refresh_token(credentials.as_ref()).await);

        let plan = LaunchPlan::build(&self.config);
        info!(command = %plan.command_line(), "launch plan resolved");

        BootstrapReport {
            steps,
            plan,
            credentials,
        }
    }

    fn prepare_workspace(&self) -> StepReport {
        if self.config.storage_mode == StorageMode::MemoryOnly {
            info!("memory-only mode, skipping working directories");
            return StepReport::ready("workspace");
        }

        let layout = WorkspaceLayout::from_dirs(&self.config.dirs);
        match layout.prepare() {
            Ok(()) => {
                info!(data_dir = %layout.data_dir.display(), "working directories ready");
                StepReport::ready("workspace")
            }
            Err(e) => StepReport::degraded("workspace", e.to_string()),
        }
    }

    fn probe_capabilities(&self) -> Vec<StepReport> {
        let caps = [
            probe::probe_linear_algebra(&self.lib_dirs),
            probe::probe_nltk_resources(&self.config.dirs.nltk_data_dir),
        ];

        caps.into_iter()
            .map(|cap| {
                if cap.available {
                    info!(capability = cap.name, detail = %cap.detail, "capability available");
                    StepReport::ready(cap.name)
                } else {
                    StepReport::degraded(cap.name, cap.detail)
                }
            })
            .collect()
    }

    fn sync_credentials(&self) -> (StepReport, Option<CredentialRecord>) {
        let store = CredentialStore::new(self.config.credential_path());

        match store.sync(&self.config.credentials) {
            Ok(outcome) => {
                match &outcome {
                    SyncOutcome::Created => info!("credential record created"),
                    SyncOutcome::Updated(fields) => {
                        info!(fields = ?fields, "credential record updated from environment");
                    }
                    SyncOutcome::Unchanged => info!("credential record up to date"),
                }
                match store.load() {
                    Ok(record) => (StepReport::ready("credentials"), record),
                    Err(e) => (StepReport::degraded("credentials", e.to_string()), None),
                }
            }
            Err(e) => (StepReport::degraded("credentials", e.to_string()), None),
        }
    }

    async fn refresh_token(&self, credentials: Option<&CredentialRecord>) -> StepReport {
        let Some(record) = credentials else {
            return StepReport::degraded("token-refresh", "no credential record");
        };

        match self.refresher.refresh(record).await {
            Ok(token) => {
                info!(expires_in = ?token.expires_in, "access token refreshed");
                StepReport::ready("token-refresh")
            }
            Err(e) => StepReport::degraded("token-refresh", e.to_string()),
        }
    }
}
