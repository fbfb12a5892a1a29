use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() -> Result<()> {
    let res = Config::serialize_default(cli::build());
    let doc = res.parse::<toml_edit::Document>()?;

    assert_eq!(
        doc.get("api-url").and_then(|e| return e.as_str()),
        Some("http://localhost:8000")
    );
    assert_eq!(
        doc.get("request-timeout").and_then(|e| return e.as_integer()),
        Some(30000)
    );
    assert_eq!(
        doc.get("health-check-timeout")
            .and_then(|e| return e.as_integer()),
        Some(1000)
    );
    assert!(doc.get("storage-dir").is_some());
    assert!(doc.get("session-id").is_none());
    assert!(doc.get("config-file").is_none());
    assert!(res.contains("# Legal assistant API base URL."));

    return Ok(());
}

#[test]
fn it_defaults_paths_under_the_app_dir() {
    assert!(Config::default(ConfigKey::ConfigFile).ends_with("config.toml"));
    assert!(Config::default(ConfigKey::StorageDir).contains("counsel"));
}

#[test]
fn it_validates_values() {
    assert!(Config::validate(ConfigKey::ApiURL, "https://legal.example.com/api").is_ok());
    assert!(Config::validate(ConfigKey::ApiURL, "not a url").is_err());
    assert!(Config::validate(ConfigKey::RequestTimeout, "500").is_ok());
    assert!(Config::validate(ConfigKey::RequestTimeout, "-1").is_err());
    assert!(Config::validate(ConfigKey::HealthCheckTimeout, "soon").is_err());
    assert!(Config::validate(ConfigKey::SessionID, "anything").is_ok());
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["counsel", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["counsel", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_rejects_invalid_flags() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "counsel",
        "-c",
        "./config.example.toml",
        "--request-timeout",
        "forever",
    ])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}
