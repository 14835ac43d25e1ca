use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub gateway: GatewayConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Backend gateway connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

/// Session behavior knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub star_write_policy: StarWritePolicy,
}

/// How star toggles reconcile local state with the backend.
///
/// `Optimistic` flips local state before the backend acknowledges and
/// surfaces (but does not roll back) a remote failure. `WriteThrough`
/// requires the acknowledgement first and leaves local state untouched on
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StarWritePolicy {
    Optimistic,
    WriteThrough,
}

/// Logging system configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_enabled: bool,
    pub log_directory: String,
}

impl EngineConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Reads a `.env` file first when one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = EngineConfig {
            gateway: GatewayConfig::from_env()?,
            session: SessionConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        };

        info!(
            gateway_base_url = %config.gateway.base_url,
            request_timeout_secs = config.gateway.request_timeout_secs,
            star_write_policy = ?config.session.star_write_policy,
            log_level = %config.logging.level,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.gateway.base_url.starts_with("http://")
            && !self.gateway.base_url.starts_with("https://")
        {
            return Err(anyhow!(
                "GATEWAY_BASE_URL must start with 'http://' or 'https://'"
            ));
        }

        if self.gateway.request_timeout_secs == 0 {
            return Err(anyhow!("GATEWAY_TIMEOUT_SECS must be greater than 0"));
        }

        if !["trace", "debug", "info", "warn", "error"]
            .contains(&self.logging.level.to_lowercase().as_str())
        {
            warn!(
                "Invalid log level '{}', using 'info' as fallback",
                self.logging.level
            );
        }

        Ok(())
    }
}

impl GatewayConfig {
    fn from_env() -> Result<Self> {
        let base_url = env::var("GATEWAY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let timeout_str = env::var("GATEWAY_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let request_timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            anyhow!(
                "Invalid GATEWAY_TIMEOUT_SECS value: '{}'. Must be a number of seconds",
                timeout_str
            )
        })?;

        Ok(GatewayConfig {
            base_url,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SessionConfig {
    fn from_env() -> Result<Self> {
        let policy_str =
            env::var("STAR_WRITE_POLICY").unwrap_or_else(|_| "optimistic".to_string());

        let star_write_policy = match policy_str.to_lowercase().as_str() {
            "write-through" | "write_through" | "writethrough" => StarWritePolicy::WriteThrough,
            "optimistic" => StarWritePolicy::Optimistic,
            _ => {
                info!(
                    "Unknown star write policy '{}', defaulting to optimistic",
                    policy_str
                );
                StarWritePolicy::Optimistic
            }
        };

        Ok(SessionConfig { star_write_policy })
    }
}

impl LoggingConfig {
    fn from_env() -> Result<Self> {
        let level =
            env::var("RUST_LOG").unwrap_or_else(|_| "info,study_sessions=debug".to_string());

        let file_enabled = env::var("LOG_FILE_ENABLED")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .unwrap_or(false);

        let log_directory = env::var("LOG_DIRECTORY").unwrap_or_else(|_| "logs".to_string());

        Ok(LoggingConfig {
            level,
            file_enabled,
            log_directory,
        })
    }
}
