//! Tests for Engine
//!
//! These tests verify:
//! - Opening an engine from a config
//! - Command execution for SET/GET/DEL
//! - Error mapping for missing and invalid keys

use filekv::config::Config;
use filekv::engine::Engine;
use filekv::protocol::Command;
use filekv::store::KeyPolicy;
use filekv::KvError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let engine = Engine::open(&config).unwrap();
    (temp_dir, engine)
}

fn set(key: &str, value: &[u8]) -> Command {
    Command::Set {
        key: key.to_string(),
        value: value.to_vec(),
    }
}

fn get(key: &str) -> Command {
    Command::Get { key: key.to_string() }
}

fn del(key: &str) -> Command {
    Command::Del { key: key.to_string() }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_engine_open_creates_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("mydb");

    let config = Config::builder().data_dir(&data_dir).build();
    let _engine = Engine::open(&config).unwrap();

    assert!(data_dir.exists());
}

#[test]
fn test_engine_sees_existing_files() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("preexisting"), b"from disk").unwrap();

    let config = Config::builder().data_dir(temp_dir.path()).build();
    let engine = Engine::open(&config).unwrap();

    assert_eq!(engine.get("preexisting").unwrap(), b"from disk");
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_set_then_get() {
    let (_temp, engine) = setup_temp_engine();

    assert_eq!(engine.execute(set("greeting", b"hello world")).unwrap(), None);
    assert_eq!(
        engine.execute(get("greeting")).unwrap(),
        Some(b"hello world".to_vec())
    );
}

#[test]
fn test_execute_get_missing() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(engine.execute(get("nope")), Err(KvError::KeyNotFound)));
}

#[test]
fn test_execute_del_then_get() {
    let (_temp, engine) = setup_temp_engine();

    engine.execute(set("k", b"v")).unwrap();
    assert_eq!(engine.execute(del("k")).unwrap(), None);
    assert!(matches!(engine.execute(get("k")), Err(KvError::KeyNotFound)));
}

#[test]
fn test_execute_del_missing_is_ok() {
    let (_temp, engine) = setup_temp_engine();

    assert_eq!(engine.execute(del("absent")).unwrap(), None);
}

#[test]
fn test_execute_overwrite() {
    let (_temp, engine) = setup_temp_engine();

    engine.execute(set("k", b"first value")).unwrap();
    engine.execute(set("k", b"v2")).unwrap();

    assert_eq!(engine.execute(get("k")).unwrap(), Some(b"v2".to_vec()));
}

#[test]
fn test_execute_rejects_traversal_by_default() {
    let (_temp, engine) = setup_temp_engine();

    assert!(matches!(
        engine.execute(set("../outside", b"v")),
        Err(KvError::InvalidKey(_))
    ));
}

#[test]
fn test_value_limit_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .max_value_len(3)
        .key_policy(KeyPolicy::Strict)
        .build();
    let engine = Engine::open(&config).unwrap();

    engine.set("k", b"abcdef").unwrap();

    assert_eq!(engine.get("k").unwrap(), b"abc");
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_default_config_matches_fixed_constants() {
    let config = Config::default();

    assert_eq!(config.listen_addr, "0.0.0.0:5000");
    assert_eq!(config.backlog, 1);
    assert_eq!(config.max_line_len, 512);
    assert_eq!(config.max_command_len, 7);
    assert_eq!(config.max_key_len, 255);
    assert_eq!(config.max_value_len, 255);
    assert_eq!(config.key_policy, KeyPolicy::Strict);
    config.validate().unwrap();
}

#[test]
fn test_config_validate_rejects_bad_values() {
    let bad = [
        Config::builder().backlog(0).build(),
        Config::builder().max_line_len(0).build(),
        Config::builder().max_value_len(0).build(),
        Config::builder().listen_addr("not an address").build(),
    ];
    for config in bad {
        assert!(matches!(config.validate(), Err(KvError::Config(_))));
    }
}

#[test]
fn test_default_log_filter_hides_connection_events() {
    assert_eq!(filekv::DEFAULT_LOG_FILTER, "info");
}
