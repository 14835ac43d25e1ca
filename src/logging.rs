use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Initialize tracing for an embedding application: console output always,
/// plus a daily-rotated log file when enabled. The returned guard must be
/// held for the lifetime of the process or buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true);

    if config.file_enabled {
        std::fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not create log directory '{}': {}",
                config.log_directory, e
            );
        });

        let file_appender =
            tracing_appender::rolling::daily(&config.log_directory, "study-sessions.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        info!(
            log_directory = %config.log_directory,
            "Logging initialized with daily file rotation"
        );
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();

        info!("Logging initialized (console only)");
        Ok(None)
    }
}

// ============================================================================
// Session Logging Macros
// ============================================================================

/// Log the start of a controller operation with consistent fields
#[macro_export]
macro_rules! log_session_start {
    ($component:expr, $operation:expr, document_id = $document_id:expr) => {
        tracing::debug!(
            component = $component,
            operation = $operation,
            document_id = %$document_id,
            "Session operation started"
        );
    };
    ($component:expr, $operation:expr, card_id = $card_id:expr) => {
        tracing::debug!(
            component = $component,
            operation = $operation,
            card_id = %$card_id,
            "Session operation started"
        );
    };
    ($component:expr, $operation:expr) => {
        tracing::debug!(
            component = $component,
            operation = $operation,
            "Session operation started"
        );
    };
}

/// Log successful completion of a controller operation
#[macro_export]
macro_rules! log_session_success {
    ($component:expr, $operation:expr, count = $count:expr, $msg:expr) => {
        tracing::info!(
            component = $component,
            operation = $operation,
            count = $count,
            "Session operation completed: {}", $msg
        );
    };
    ($component:expr, $operation:expr, $msg:expr) => {
        tracing::info!(
            component = $component,
            operation = $operation,
            "Session operation completed: {}", $msg
        );
    };
}

/// Log gateway failures the controllers degraded from
#[macro_export]
macro_rules! log_gateway_fallback {
    ($component:expr, $operation:expr, error = $error:expr, $msg:expr) => {
        tracing::warn!(
            component = $component,
            operation = $operation,
            error = %$error,
            "Gateway call failed, using local fallback: {}", $msg
        );
    };
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    #[test]
    fn test_logging_macros_compile() {
        let document_id = Uuid::new_v4();
        let card_id = Uuid::new_v4();
        let error = anyhow::anyhow!("test error");

        log_session_start!("flashcard_session", "load", document_id = document_id);
        log_session_start!("flashcard_session", "toggle_star", card_id = card_id);
        log_session_start!("quiz_session", "submit");

        log_session_success!("quiz_session", "submit", count = 4, "questions graded");
        log_session_success!("chat_session", "send_message", "assistant reply appended");

        log_gateway_fallback!(
            "chat_session",
            "send_chat_turn",
            error = error,
            "substituted fixed assistant turn"
        );
    }
}
