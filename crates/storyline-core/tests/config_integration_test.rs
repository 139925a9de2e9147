//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use storyline_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use storyline_core::StorylineError;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var("STORYLINE_API_URL");
    env::remove_var("STORYLINE_CACHE_BUSTING");
    env::remove_var("STORYLINE_MAP_FEATURES");
    env::remove_var("STORYLINE_HTTP_TIMEOUT");
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file(
        r#"
api_url = "https://stories.example.com"
# Only the URL, leave the flags as defaults
"#,
    );

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.require_api_url().unwrap(), "https://stories.example.com");
    assert_eq!(config.api_url.source, ConfigSource::File);
    assert!(config.map_features.value);
    assert_eq!(config.map_features.source, ConfigSource::Default);
    assert_eq!(config.cache_busting.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/storyline.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let file = config_file("api_url = [unterminated");
    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}

#[test]
fn test_zero_timeout_in_file_is_an_error() {
    let file = config_file(
        r#"
api_url = "https://stories.example.com"
http_timeout_secs = 0
"#,
    );

    let error = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap_err();

    assert!(matches!(
        error,
        StorylineError::ConfigInvalid { ref key, .. } if key == "http_timeout_secs"
    ));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("STORYLINE_API_URL", "http://env.example.com/");
    env::set_var("STORYLINE_MAP_FEATURES", "false");

    let file = config_file(
        r#"
api_url = "https://file.example.com"
map_features = true
http_timeout_secs = 12
"#,
    );

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.require_api_url().unwrap(), "http://env.example.com");
    assert_eq!(config.api_url.source, ConfigSource::Environment);
    assert!(!config.map_features.value);
    assert_eq!(config.map_features.source, ConfigSource::Environment);
    // Not set in env, file value wins
    assert_eq!(config.http_timeout_secs.value, 12);
    assert_eq!(config.http_timeout_secs.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("STORYLINE_API_URL", "not a url");
    env::set_var("STORYLINE_CACHE_BUSTING", "sometimes");
    env::set_var("STORYLINE_HTTP_TIMEOUT", "0");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.api_url.value, None);
    assert!(config.cache_busting.value);
    assert_eq!(config.cache_busting.source, ConfigSource::Default);
    assert_eq!(config.http_timeout_secs.value, 30);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();
    env::set_var("STORYLINE_API_URL", "http://env.example.com");
    env::set_var("STORYLINE_CACHE_BUSTING", "true");

    let file = config_file(r#"api_url = "https://file.example.com""#);

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    config
        .update_from_cli(CliConfigOverrides {
            api_url: Some("http://cli.example.com".to_string()),
            cache_busting: Some(false),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(config.require_api_url().unwrap(), "http://cli.example.com");
    assert_eq!(config.api_url.source, ConfigSource::Cli);
    assert!(!config.cache_busting.value);
    assert_eq!(config.cache_busting.source, ConfigSource::Cli);

    clear_env();
}
