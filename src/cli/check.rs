//! Diagnostic check commands.

use crate::config::BootstrapConfig;
use crate::credentials::{mask_secret, CredentialStore};
use crate::env::EnvSnapshot;
use crate::error::Result;
use crate::platform::StorageMode;
use crate::token::{DropboxTokenRefresher, TokenRefresher};

/// Print the detected platform context and its resolved defaults.
pub fn execute_platform() -> Result<()> {
    let env = EnvSnapshot::capture();
    let config = BootstrapConfig::from_env(&env)?;

    println!("Platform context");
    println!();
    println!("  Platform: {}", config.platform);
    println!(
        "  Storage mode: {}",
        match config.storage_mode {
            StorageMode::LocalDisk => "local-disk",
            StorageMode::MemoryOnly => "memory-only",
        }
    );
    println!("  Port: {}", config.port);
    match config.workers {
        Some(n) => println!("  Workers: {n} (production server)"),
        None => println!("  Workers: none (development server)"),
    }
    if config.storage_mode == StorageMode::LocalDisk {
        println!("  Data dir: {}", config.dirs.data_dir.display());
        println!("  Models dir: {}", config.dirs.models_dir.display());
        println!("  NLTK data dir: {}", config.dirs.nltk_data_dir.display());
    }
    println!("  Credential record: {}", config.credential_path().display());

    Ok(())
}

/// Show the credential record state with secrets masked.
pub fn execute_credentials() -> Result<()> {
    let env = EnvSnapshot::capture();
    let config = BootstrapConfig::from_env(&env)?;
    let store = CredentialStore::new(config.credential_path());

    println!("Credential record: {}", store.path().display());
    println!();

    match store.load()? {
        Some(record) => {
            println!("  App key: {}", mask_secret(&record.app_key));
            println!("  App secret: {}", mask_secret(&record.app_secret));
            println!("  Refresh token: {}", mask_secret(&record.refresh_token));
            println!("  Created: {}", record.created_at.to_rfc3339());
            println!("  Updated: {}", record.updated_at.to_rfc3339());
        }
        None => {
            println!("  No record yet; `liftoff launch` will create one.");
        }
    }

    println!();
    let overridden: Vec<&str> = [
        ("DROPBOX_APP_KEY", config.credentials.app_key.is_some()),
        ("DROPBOX_APP_SECRET", config.credentials.app_secret.is_some()),
        (
            "DROPBOX_REFRESH_TOKEN",
            config.credentials.refresh_token.is_some(),
        ),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();

    if overridden.is_empty() {
        println!("  No environment overrides set.");
    } else {
        println!("  Environment overrides: {}", overridden.join(", "));
    }

    Ok(())
}

/// Exercise the token-refresh collaborator once and report the outcome.
pub async fn execute_refresh() -> Result<()> {
    let env = EnvSnapshot::capture();
    let config = BootstrapConfig::from_env(&env)?;
    let store = CredentialStore::new(config.credential_path());

    let Some(record) = store.load()? else {
        eprintln!("No credential record found at {}", store.path().display());
        eprintln!("Run `liftoff launch` (or set DROPBOX_* variables) first.");
        std::process::exit(1);
    };

    println!("Refreshing against {}...", config.server.token_refresh_url);

    let refresher = DropboxTokenRefresher::new(config.server.token_refresh_url.clone());
    match refresher.refresh(&record).await {
        Ok(token) => {
            println!("✓ Access token obtained ({})", mask_secret(&token.token));
            if let Some(expires) = token.expires_in {
                println!("  Expires in {expires}s");
            }
        }
        Err(e) => {
            eprintln!("✗ Refresh failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
