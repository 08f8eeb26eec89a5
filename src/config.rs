//! Bootstrap configuration.
//!
//! A [`BootstrapConfig`] is built exactly once from an [`EnvSnapshot`] and
//! threaded through every pipeline step. Nothing downstream re-reads the
//! environment, so two runs against the same snapshot resolve identically.

use std::path::PathBuf;

use tracing_subscriber::{fmt, EnvFilter};

use crate::env::EnvSnapshot;
use crate::error::{ConfigError, Result};
use crate::platform::{Platform, StorageMode};

/// Default Dropbox OAuth token endpoint.
pub const DEFAULT_TOKEN_REFRESH_URL: &str = "https://api.dropboxapi.com/oauth2/token";

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Detected hosting platform.
    pub platform: Platform,
    /// Resolved storage mode after force flags.
    pub storage_mode: StorageMode,
    /// Listening port for the server process.
    pub port: u16,
    /// Worker count when launching the production server; `None` selects
    /// the single-process development server.
    pub workers: Option<u32>,
    /// Working directory layout (meaningful in local-disk mode only).
    pub dirs: DirsConfig,
    /// Environment-supplied credential overrides.
    pub credentials: CredentialOverrides,
    /// Server handoff settings.
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Working directories for data, models, and NLTK resources.
#[derive(Debug, Clone)]
pub struct DirsConfig {
    pub data_dir: PathBuf,
    pub models_dir: PathBuf,
    pub nltk_data_dir: PathBuf,
}

/// Credential values supplied by the environment, if any.
///
/// There are deliberately no built-in secret defaults; an absent value
/// stays absent and the credential record is created with empty fields.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub app_key: Option<String>,
    pub app_secret: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// WSGI application path handed to the production server.
    pub wsgi_app: String,
    /// OAuth token endpoint (overridable for tests).
    pub token_refresh_url: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl BootstrapConfig {
    /// Resolve the full configuration from an environment snapshot.
    pub fn from_env(env: &EnvSnapshot) -> Result<Self> {
        let platform = Platform::detect(env);

        let force_memory_only = env.is_truthy("MEMORY_ONLY_MODE")
            || env.is_truthy("NO_LOCAL_STORAGE")
            || env.is_truthy("USE_DROPBOX_STREAMING");
        let storage_mode = if force_memory_only {
            StorageMode::MemoryOnly
        } else {
            platform.default_storage_mode(env)
        };

        let port = match env.get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                field: "PORT",
                reason: e.to_string(),
            })?,
            None => platform.default_port(),
        };

        let workers = match env.get("GUNICORN_WORKERS") {
            Some(raw) => {
                let count = raw.parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                    field: "GUNICORN_WORKERS",
                    reason: e.to_string(),
                })?;
                if count == 0 {
                    return Err(ConfigError::InvalidValue {
                        field: "GUNICORN_WORKERS",
                        reason: "worker count must be at least 1".into(),
                    }
                    .into());
                }
                Some(count)
            }
            None => None,
        };

        let base = platform.base_dir(env);
        let dirs = DirsConfig {
            data_dir: env
                .get("DATA_DIR")
                .map_or_else(|| base.join("data"), PathBuf::from),
            models_dir: env
                .get("MODELS_DIR")
                .map_or_else(|| base.join("models"), PathBuf::from),
            nltk_data_dir: env
                .get("NLTK_DATA_DIR")
                .map_or_else(|| base.join("nltk_data"), PathBuf::from),
        };

        let credentials = CredentialOverrides {
            app_key: env.get("DROPBOX_APP_KEY").map(str::to_string),
            app_secret: env.get("DROPBOX_APP_SECRET").map(str::to_string),
            refresh_token: env.get("DROPBOX_REFRESH_TOKEN").map(str::to_string),
        };

        let token_refresh_url = env
            .get("TOKEN_REFRESH_URL")
            .unwrap_or(DEFAULT_TOKEN_REFRESH_URL)
            .to_string();
        url::Url::parse(&token_refresh_url).map_err(|e| ConfigError::InvalidValue {
            field: "TOKEN_REFRESH_URL",
            reason: e.to_string(),
        })?;

        let server = ServerConfig {
            wsgi_app: env.get("SERVER_APP").unwrap_or("app:app").to_string(),
            token_refresh_url,
        };

        let logging = LoggingConfig {
            level: env.get("LOG_LEVEL").unwrap_or("info").to_string(),
            format: env.get("LOG_FORMAT").unwrap_or("pretty").to_string(),
        };

        Ok(Self {
            platform,
            storage_mode,
            port,
            workers,
            dirs,
            credentials,
            server,
            logging,
        })
    }

    /// Path of the durable credential record.
    ///
    /// Local-disk mode keeps it next to the data; memory-only mode still
    /// persists this one small record (so restarts never re-authorize),
    /// under the user data dir when one exists.
    #[must_use]
    pub fn credential_path(&self) -> PathBuf {
        match self.storage_mode {
            StorageMode::LocalDisk => self.dirs.data_dir.join("credentials.json"),
            StorageMode::MemoryOnly => dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("liftoff")
                .join("credentials.json"),
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_override_beats_platform_default() {
        let env = EnvSnapshot::from_pairs([("RENDER", "true"), ("PORT", "9999")]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn platform_default_port_when_unset() {
        let env = EnvSnapshot::from_pairs([("KOYEB_DEPLOYMENT", "dep-1")]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let env = EnvSnapshot::from_pairs([("PORT", "not-a-port")]);
        let err = BootstrapConfig::from_env(&env).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn worker_count_parses() {
        let env = EnvSnapshot::from_pairs([("GUNICORN_WORKERS", "3")]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(config.workers, Some(3));
    }

    #[test]
    fn zero_workers_rejected() {
        let env = EnvSnapshot::from_pairs([("GUNICORN_WORKERS", "0")]);
        assert!(BootstrapConfig::from_env(&env).is_err());
    }

    #[test]
    fn memory_only_flags_force_mode() {
        for flag in ["MEMORY_ONLY_MODE", "NO_LOCAL_STORAGE", "USE_DROPBOX_STREAMING"] {
            let env = EnvSnapshot::from_pairs([(flag, "True")]);
            let config = BootstrapConfig::from_env(&env).unwrap();
            assert_eq!(
                config.storage_mode,
                StorageMode::MemoryOnly,
                "{flag} should force memory-only"
            );
        }
    }

    #[test]
    fn dir_overrides_apply() {
        let env = EnvSnapshot::from_pairs([
            ("DATA_DIR", "/srv/data"),
            ("NLTK_DATA_DIR", "/srv/nltk"),
        ]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(config.dirs.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.dirs.nltk_data_dir, PathBuf::from("/srv/nltk"));
        assert_eq!(config.dirs.models_dir, PathBuf::from("./models"));
    }

    #[test]
    fn credential_overrides_picked_up() {
        let env = EnvSnapshot::from_pairs([
            ("DROPBOX_APP_KEY", "key-1"),
            ("DROPBOX_REFRESH_TOKEN", "tok-1"),
        ]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(config.credentials.app_key.as_deref(), Some("key-1"));
        assert_eq!(config.credentials.app_secret, None);
        assert_eq!(config.credentials.refresh_token.as_deref(), Some("tok-1"));
    }

    #[test]
    fn invalid_token_url_rejected() {
        let env = EnvSnapshot::from_pairs([("TOKEN_REFRESH_URL", "not a url")]);
        assert!(BootstrapConfig::from_env(&env).is_err());
    }

    #[test]
    fn local_disk_credential_path_lives_in_data_dir() {
        let env = EnvSnapshot::from_pairs([("DATA_DIR", "/srv/data")]);
        let config = BootstrapConfig::from_env(&env).unwrap();
        assert_eq!(
            config.credential_path(),
            PathBuf::from("/srv/data/credentials.json")
        );
    }
}
