//! Hosting-platform detection.
//!
//! The orchestrator runs unchanged on five hosts. Each host leaves a
//! distinctive marker in the environment; detection walks a fixed, ordered
//! marker list and the first match wins, so a snapshot always maps to
//! exactly one [`Platform`].

use std::fmt;
use std::path::PathBuf;

use crate::env::EnvSnapshot;

/// The inferred hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Render,
    CircleCi,
    Koyeb,
    Glitch,
    /// Fallback when no known marker is present.
    Local,
}

/// How durable local state is handled on a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Working directories on a writable filesystem.
    LocalDisk,
    /// No durable local filesystem; artifacts live in process memory or
    /// with the external storage collaborator.
    MemoryOnly,
}

impl Platform {
    /// Detect the platform from an environment snapshot.
    ///
    /// Marker precedence: Render, CircleCI, Koyeb, Glitch. Unknown or empty
    /// snapshots fall back to [`Platform::Local`].
    #[must_use]
    pub fn detect(env: &EnvSnapshot) -> Self {
        if env.contains("RENDER") || env.contains("RENDER_DISK_PATH") {
            Self::Render
        } else if env.contains("CIRCLECI") {
            Self::CircleCi
        } else if env.contains("KOYEB_DEPLOYMENT") || env.contains("KOYEB_APP_NAME") {
            Self::Koyeb
        } else if env.contains("PROJECT_DOMAIN") && env.contains("PROJECT_ID") {
            Self::Glitch
        } else {
            Self::Local
        }
    }

    /// Listening port used when `PORT` is not set.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Render | Self::Local => 10000,
            Self::CircleCi => 5000,
            Self::Koyeb => 8000,
            Self::Glitch => 3000,
        }
    }

    /// Storage mode implied by the platform's filesystem guarantees.
    ///
    /// Render gets a durable disk only when the deployment attaches one
    /// (signalled by `RENDER_DISK_PATH`). CI and Koyeb containers are
    /// ephemeral. Glitch persists `.data` across restarts.
    #[must_use]
    pub fn default_storage_mode(self, env: &EnvSnapshot) -> StorageMode {
        match self {
            Self::Render => {
                if env.contains("RENDER_DISK_PATH") {
                    StorageMode::LocalDisk
                } else {
                    StorageMode::MemoryOnly
                }
            }
            Self::CircleCi | Self::Koyeb => StorageMode::MemoryOnly,
            Self::Glitch | Self::Local => StorageMode::LocalDisk,
        }
    }

    /// Root under which the default working directories are laid out.
    #[must_use]
    pub fn base_dir(self, env: &EnvSnapshot) -> PathBuf {
        match self {
            Self::Render => env
                .get("RENDER_DISK_PATH")
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
            Self::Koyeb => PathBuf::from("/app"),
            Self::Glitch => PathBuf::from(".data"),
            Self::CircleCi | Self::Local => PathBuf::from("."),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Render => "render",
            Self::CircleCi => "circleci",
            Self::Koyeb => "koyeb",
            Self::Glitch => "glitch",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}
