//! Integration tests for Settings loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION for `unauthenticated_codes`, override for scalars
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests assume no global config and no CONDTREE_* variables,
//! so they effectively test local config merging with defaults.

use std::fs;

use tempfile::TempDir;

use condtree::application::ApplicationError;
use condtree::config::Settings;

#[test]
fn given_local_config_with_codes_when_load_then_unions_with_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("condtree.toml");
    fs::write(&path, "unauthenticated_codes = [401, 810]\n").unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert: defaults kept, 401 added, 810 not duplicated
    assert_eq!(settings.unauthenticated_codes, vec![401, 810, 1919, 114514]);
}

#[test]
fn given_local_config_with_scalars_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("condtree.toml");
    fs::write(
        &path,
        r#"
base_url = "https://admin.example"
login_path = "/login"
timeout_secs = 3
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(path.as_path())).unwrap();

    assert_eq!(settings.base_url, "https://admin.example");
    assert_eq!(settings.login_path, "/login");
    assert_eq!(settings.timeout_secs, 3);
}

#[test]
fn given_env_override_when_load_then_env_wins_over_local_file() {
    // Only this test touches CONDTREE_SESSION_COOKIE
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("condtree.toml");
    fs::write(&path, "session_cookie = \"session=from-file\"\n").unwrap();
    std::env::set_var("CONDTREE_SESSION_COOKIE", "session=from-env");

    let result = Settings::load(Some(path.as_path()));
    std::env::remove_var("CONDTREE_SESSION_COOKIE");

    let settings = result.unwrap();
    assert_eq!(settings.session_cookie.as_deref(), Some("session=from-env"));
}

#[test]
fn given_missing_local_config_when_load_then_reports_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();

    match err {
        ApplicationError::Config { message } => assert!(message.contains("not found")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_malformed_local_config_when_load_then_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("condtree.toml");
    fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("parse"));
}

#[test]
fn given_cookie_file_when_reading_session_cookie_then_trims_content() {
    let dir = TempDir::new().unwrap();
    let cookie = dir.path().join("cookie");
    fs::write(&cookie, "session=abc123\n").unwrap();
    let settings = Settings {
        cookie_file: Some(cookie),
        ..Settings::default()
    };

    assert_eq!(
        settings.session_cookie_value().unwrap(),
        Some("session=abc123".to_string())
    );
}

#[test]
fn given_settings_when_rendering_toml_then_round_trips() {
    let settings = Settings {
        session_cookie: Some("session=xyz".into()),
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(parsed, settings);
}

#[test]
fn given_template_when_parsed_then_is_valid_toml() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();

    assert_eq!(parsed, Settings::default());
}
