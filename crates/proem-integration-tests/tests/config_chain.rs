//! Integration tests for building chains and logging from configuration.

#![allow(clippy::arithmetic_side_effects)]

use std::path::Path;
use std::sync::Arc;

use proem_config::{Config, ConfigError};
use proem_filter::{FilterChain, FilterError, bootstrap};
use proem_service::CapabilityId;
use proem_signal::SignalBus;
use proem_telemetry::{LogConfig, LogFormat};
use proem_test::{BuildCounter, CallLog, RecordingListener, test_composer};
use tempfile::TempDir;

fn write_workspace_config(body: &str) -> anyhow::Result<TempDir> {
    let workspace = tempfile::tempdir()?;
    let dir = workspace.path().join(".proem");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("config.toml"), body)?;
    Ok(workspace)
}

fn load(workspace: &Path) -> Result<Config, ConfigError> {
    let home = tempfile::tempdir().map_err(|source| ConfigError::ReadError {
        path: "<tempdir>".to_owned(),
        source,
    })?;
    Config::load_with_home(Some(workspace), home.path()).map(|resolved| resolved.config)
}

#[test]
fn default_config_builds_bootstrap_chain() -> anyhow::Result<()> {
    let config = Config::default();
    let chain = FilterChain::from_config(&config.chain, &test_composer(&BuildCounter::new()))?;
    assert_eq!(chain.stage_names(), bootstrap::DEFAULT_STAGES.to_vec());
    Ok(())
}

#[test]
fn workspace_config_drives_chain_and_signals() -> anyhow::Result<()> {
    let workspace = write_workspace_config(
        r#"
        [logging]
        level = "debug"
        format = "json"
        directives = ["proem_filter=trace"]

        [chain]
        stages = ["route", "response"]

        [chain.eager]
        route = false

        [signals]
        enabled = false
        "#,
    )?;
    let config = load(workspace.path())?;

    let counter = BuildCounter::new();
    let chain = FilterChain::from_config(&config.chain, &test_composer(&counter))?;
    assert_eq!(chain.stage_names(), vec!["route", "response"]);

    let log = CallLog::new();
    let bus = SignalBus::new();
    bus.attach("*", Arc::new(RecordingListener::new("all", &log)));
    let template = bootstrap::template_assets(&config.signals, &bus);

    let (assets, _) = chain.dispatch(&template)?;

    assert!(log.is_empty());
    assert!(assets.provides(&CapabilityId::ROUTE_MANAGER));
    assert!(assets.provides(&CapabilityId::RESPONSE));
    assert!(!assets.provides(&CapabilityId::REQUEST));
    assert_eq!(counter.count(), 0);

    let logging = LogConfig::from_section(&config.logging)?;
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.filter_directive(), "debug,proem_filter=trace");
    Ok(())
}

#[test]
fn enabled_signals_reach_listeners() -> anyhow::Result<()> {
    let workspace = write_workspace_config("[chain]\nstages = [\"request\"]\n")?;
    let config = load(workspace.path())?;

    let log = CallLog::new();
    let bus = SignalBus::new();
    bus.attach("pre.*", Arc::new(RecordingListener::new("pre", &log)));
    let template = bootstrap::template_assets(&config.signals, &bus);

    let chain = FilterChain::from_config(&config.chain, &test_composer(&BuildCounter::new()))?;
    chain.dispatch(&template)?;

    assert_eq!(log.entries(), ["pre:pre.in.request", "pre:pre.out.request"]);
    Ok(())
}

#[test]
fn unknown_stage_is_rejected_when_building() -> anyhow::Result<()> {
    let workspace = write_workspace_config("[chain]\nstages = [\"response\", \"dispatch\"]\n")?;
    let config = load(workspace.path())?;

    let err = FilterChain::from_config(&config.chain, &test_composer(&BuildCounter::new()))
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownStage(ref name) if name == "dispatch"));
    Ok(())
}

#[test]
fn eager_for_unlisted_stage_fails_validation() -> anyhow::Result<()> {
    let workspace = write_workspace_config(
        "[chain]\nstages = [\"response\"]\n\n[chain.eager]\nroute = true\n",
    )?;

    let err = load(workspace.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { ref field, .. } if field == "chain.eager.route"));
    Ok(())
}

#[test]
fn duplicate_stage_fails_validation() -> anyhow::Result<()> {
    let workspace = write_workspace_config("[chain]\nstages = [\"route\", \"route\"]\n")?;
    assert!(matches!(
        load(workspace.path()),
        Err(ConfigError::ValidationError { .. })
    ));
    Ok(())
}
