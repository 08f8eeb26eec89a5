//! Durable credential record for the storage collaborator.
//!
//! A small JSON file keeps the OAuth refresh token and app credentials
//! across restarts so a redeploy never needs re-authorization. Syncing is
//! idempotent: an unchanged environment leaves the record byte-stable, and
//! an override that differs rewrites exactly the differing fields.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CredentialOverrides;
use crate::error::{Error, Result};

/// The persisted credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub refresh_token: String,
    pub app_key: String,
    pub app_secret: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a sync pass did to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No record existed; one was created.
    Created,
    /// Named fields differed from the environment and were overwritten.
    Updated(Vec<&'static str>),
    /// Record already matched the environment.
    Unchanged,
}

/// File-backed store for the credential record.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record if one exists.
    pub fn load(&self) -> Result<Option<CredentialRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let record = serde_json::from_str(&content).map_err(|e| {
                    Error::CredentialStore(format!(
                        "corrupt record at {}: {e}",
                        self.path.display()
                    ))
                })?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reconcile the stored record with environment overrides.
    ///
    /// Creates the record when absent (absent overrides become empty
    /// fields; no secret defaults are built in). When present, overwrites
    /// only fields whose override differs and bumps `updated_at` only if
    /// something changed. The record is never deleted.
    pub fn sync(&self, overrides: &CredentialOverrides) -> Result<SyncOutcome> {
        match self.load()? {
            None => {
                let now = Utc::now();
                let record = CredentialRecord {
                    refresh_token: overrides.refresh_token.clone().unwrap_or_default(),
                    app_key: overrides.app_key.clone().unwrap_or_default(),
                    app_secret: overrides.app_secret.clone().unwrap_or_default(),
                    created_at: now,
                    updated_at: now,
                };
                self.write(&record)?;
                Ok(SyncOutcome::Created)
            }
            Some(mut record) => {
                let mut changed = Vec::new();
                if let Some(ref token) = overrides.refresh_token {
                    if record.refresh_token != *token {
                        record.refresh_token = token.clone();
                        changed.push("refresh_token");
                    }
                }
                if let Some(ref key) = overrides.app_key {
                    if record.app_key != *key {
                        record.app_key = key.clone();
                        changed.push("app_key");
                    }
                }
                if let Some(ref secret) = overrides.app_secret {
                    if record.app_secret != *secret {
                        record.app_secret = secret.clone();
                        changed.push("app_secret");
                    }
                }

                if changed.is_empty() {
                    Ok(SyncOutcome::Unchanged)
                } else {
                    record.updated_at = Utc::now();
                    self.write(&record)?;
                    Ok(SyncOutcome::Updated(changed))
                }
            }
        }
    }

    /// Write the record atomically (temp file, then rename).
    fn write(&self, record: &CredentialRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        Ok(())
    }
}

/// Mask a secret for display: first four characters, then an ellipsis.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return "(unset)".to_string();
    }
    // Count and slice by characters; tokens are arbitrary strings and a
    // byte slice could split a multibyte character.
    if value.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = value.chars().take(4).collect();
        format!("{prefix}...")
    }
}
