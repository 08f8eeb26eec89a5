use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

/// Errors from the fatal side of the bootstrap taxonomy.
///
/// Degraded conditions (missing optional dependency, failed token refresh)
/// are not errors; they are reported as step data and the pipeline
/// continues. Only conditions that make the server unlaunchable appear
/// here.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot bind 0.0.0.0:{port}: {source}")]
    PortBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch server process `{program}`: {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("credential store error: {0}")]
    CredentialStore(String),

    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
