use std::env;
use std::time::Duration;

use study_sessions::{EngineConfig, StarWritePolicy};

// Environment variables are process-global, so everything that touches them
// lives in a single test function to keep this binary race-free.
#[test]
fn test_engine_config_from_env() {
    unsafe {
        env::remove_var("GATEWAY_BASE_URL");
        env::remove_var("GATEWAY_TIMEOUT_SECS");
        env::remove_var("STAR_WRITE_POLICY");
        env::remove_var("RUST_LOG");
        env::remove_var("LOG_FILE_ENABLED");
        env::remove_var("LOG_DIRECTORY");
    }

    // Defaults with nothing set.
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.gateway.base_url, "http://localhost:3000");
    assert_eq!(config.gateway.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.session.star_write_policy, StarWritePolicy::Optimistic);
    assert_eq!(config.logging.level, "info,study_sessions=debug");
    assert!(!config.logging.file_enabled);
    assert!(config.validate().is_ok());

    // Fully specified environment.
    unsafe {
        env::set_var("GATEWAY_BASE_URL", "https://study.example.com");
        env::set_var("GATEWAY_TIMEOUT_SECS", "5");
        env::set_var("STAR_WRITE_POLICY", "write-through");
        env::set_var("RUST_LOG", "warn");
        env::set_var("LOG_FILE_ENABLED", "true");
        env::set_var("LOG_DIRECTORY", "/tmp/study-logs");
    }

    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.gateway.base_url, "https://study.example.com");
    assert_eq!(config.gateway.request_timeout(), Duration::from_secs(5));
    assert_eq!(
        config.session.star_write_policy,
        StarWritePolicy::WriteThrough
    );
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.file_enabled);
    assert_eq!(config.logging.log_directory, "/tmp/study-logs");
    assert!(config.validate().is_ok());

    // Unknown policy strings fall back to optimistic rather than failing.
    unsafe { env::set_var("STAR_WRITE_POLICY", "eventually-maybe"); }
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.session.star_write_policy, StarWritePolicy::Optimistic);

    // A base URL without a scheme loads but fails validation.
    unsafe { env::set_var("GATEWAY_BASE_URL", "study.example.com"); }
    let config = EngineConfig::from_env().unwrap();
    assert!(config.validate().is_err());

    // A non-numeric timeout is rejected at load time.
    unsafe { env::set_var("GATEWAY_TIMEOUT_SECS", "soon"); }
    assert!(EngineConfig::from_env().is_err());

    unsafe {
        env::remove_var("GATEWAY_BASE_URL");
        env::remove_var("GATEWAY_TIMEOUT_SECS");
        env::remove_var("STAR_WRITE_POLICY");
        env::remove_var("RUST_LOG");
        env::remove_var("LOG_FILE_ENABLED");
        env::remove_var("LOG_DIRECTORY");
    }
}
