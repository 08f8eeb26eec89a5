//! End-to-end bootstrap pipeline tests through the public API.

use async_trait::async_trait;
use liftoff::config::BootstrapConfig;
use liftoff::credentials::CredentialRecord;
use liftoff::env::EnvSnapshot;
use liftoff::error::{Error, Result};
use liftoff::launcher::LaunchMode;
use liftoff::orchestrator::{Orchestrator, StepStatus};
use liftoff::platform::Platform;
use liftoff::token::{AccessToken, TokenRefresher};
use tempfile::TempDir;

struct FailingRefresher;

#[async_trait]
impl TokenRefresher for FailingRefresher {
    async fn refresh(&self, _record: &CredentialRecord) -> Result<AccessToken> {
        Err(Error::TokenRefresh("endpoint unreachable".to_string()))
    }
}

fn env_in(dir: &TempDir, extra: &[(&str, &str)]) -> EnvSnapshot {
    let mut pairs = vec![
        ("DATA_DIR".to_string(), dir.path().join("data").display().to_string()),
        (
            "MODELS_DIR".to_string(),
            dir.path().join("models").display().to_string(),
        ),
        (
            "NLTK_DATA_DIR".to_string(),
            dir.path().join("nltk").display().to_string(),
        ),
        ("DROPBOX_REFRESH_TOKEN".to_string(), "tok".to_string()),
    ];
    pairs.extend(
        extra
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
    );
    EnvSnapshot::from_pairs(pairs)
}

#[tokio::test]
async fn unreachable_refresh_endpoint_degrades_but_launches() {
    let dir = TempDir::new().unwrap();
    let config = BootstrapConfig::from_env(&env_in(&dir, &[("GUNICORN_WORKERS", "2")])).unwrap();

    let orchestrator = Orchestrator::new(config, Box::new(FailingRefresher))
        .with_lib_dirs(vec![dir.path().join("empty")]);
    let report = orchestrator.bootstrap().await;

    let refresh = report
        .steps
        .iter()
        .find(|s| s.name == "token-refresh")
        .unwrap();
    assert!(matches!(refresh.status, StepStatus::Degraded(_)));
    assert_eq!(report.plan.mode, LaunchMode::Production { workers: 2 });
    assert_eq!(report.plan.port, 10000);
}

#[tokio::test]
async fn every_platform_resolves_exactly_one_context() {
    let cases: &[(&[(&str, &str)], Platform, u16)] = &[
        (&[("RENDER", "true")], Platform::Render, 10000),
        (&[("CIRCLECI", "true")], Platform::CircleCi, 5000),
        (&[("KOYEB_DEPLOYMENT", "d")], Platform::Koyeb, 8000),
        (
            &[("PROJECT_DOMAIN", "x"), ("PROJECT_ID", "y")],
            Platform::Glitch,
            3000,
        ),
        (&[], Platform::Local, 10000),
    ];

    for (markers, expected_platform, expected_port) in cases {
        let dir = TempDir::new().unwrap();
        let config = BootstrapConfig::from_env(&env_in(&dir, markers)).unwrap();
        assert_eq!(config.platform, *expected_platform);
        assert_eq!(config.port, *expected_port);
    }
}

#[tokio::test]
async fn port_override_wins_on_every_platform() {
    for markers in [
        &[("RENDER", "true")][..],
        &[("CIRCLECI", "true")][..],
        &[("KOYEB_DEPLOYMENT", "d")][..],
        &[][..],
    ] {
        let dir = TempDir::new().unwrap();
        let mut pairs: Vec<(&str, &str)> = markers.to_vec();
        pairs.push(("PORT", "9999"));
        let config = BootstrapConfig::from_env(&env_in(&dir, &pairs)).unwrap();
        assert_eq!(config.port, 9999);
    }
}

#[tokio::test]
async fn second_bootstrap_does_not_bump_updated_at() {
    let dir = TempDir::new().unwrap();
    let config = BootstrapConfig::from_env(&env_in(&dir, &[])).unwrap();

    let orchestrator = Orchestrator::new(config.clone(), Box::new(FailingRefresher))
        .with_lib_dirs(vec![dir.path().join("empty")]);
    let first = orchestrator.bootstrap().await.credentials.unwrap();

    let orchestrator = Orchestrator::new(config, Box::new(FailingRefresher))
        .with_lib_dirs(vec![dir.path().join("empty")]);
    let second = orchestrator.bootstrap().await.credentials.unwrap();

    assert_eq!(first.updated_at, second.updated_at);
    assert_eq!(first, second);
}

#[tokio::test]
async fn changed_token_updates_only_that_field() {
    let dir = TempDir::new().unwrap();

    let config = BootstrapConfig::from_env(&env_in(&dir, &[("DROPBOX_APP_KEY", "key-1")])).unwrap();
    let orchestrator = Orchestrator::new(config, Box::new(FailingRefresher))
        .with_lib_dirs(vec![dir.path().join("empty")]);
    let first = orchestrator.bootstrap().await.credentials.unwrap();

    let config = BootstrapConfig::from_env(&env_in(
        &dir,
        &[("DROPBOX_APP_KEY", "key-1"), ("DROPBOX_REFRESH_TOKEN", "tok-2")],
    ))
    .unwrap();
    let orchestrator = Orchestrator::new(config, Box::new(FailingRefresher))
        .with_lib_dirs(vec![dir.path().join("empty")]);
    let second = orchestrator.bootstrap().await.credentials.unwrap();

    assert_eq!(second.app_key, first.app_key);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.refresh_token, "tok-2");
    assert!(second.updated_at >= first.updated_at);
}
