use tracing::{error, warn};

/// Centralized error types for the session controllers.
///
/// `Validation` failures are rejected synchronously and never reach the
/// remote gateway. `Remote` failures are always caught at the controller
/// boundary; each controller degrades to its documented local fallback
/// instead of propagating them to the caller's render path.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote gateway error: {0}")]
    Remote(#[from] anyhow::Error),

    #[error("Empty session: {0}")]
    EmptySession(String),
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::Validation(message.into())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SessionError::Remote(_))
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Context attached to error log lines so failures can be traced back to a
/// specific controller operation.
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub resource_id: Option<String>,
    pub component: String,
}

impl ErrorContext {
    pub fn new(operation: &str, component: &str) -> Self {
        Self {
            operation: operation.to_string(),
            resource_id: None,
            component: component.to_string(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }
}

impl SessionError {
    /// Log this error with context at the severity its class warrants.
    pub fn log_with_context(&self, context: &ErrorContext) {
        match self {
            SessionError::Validation(_) | SessionError::EmptySession(_) => {
                warn!(
                    operation = %context.operation,
                    component = %context.component,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Controller input rejected"
                );
            }
            SessionError::Remote(_) => {
                error!(
                    operation = %context.operation,
                    component = %context.component,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Remote gateway call failed"
                );
            }
        }
    }
}

/// Classify a raw gateway error message into a coarse transport category
/// for logging. Every category still degrades to the same local fallback.
pub fn classify_remote_error(error: &anyhow::Error) -> &'static str {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("timed out") || error_str.contains("timeout") {
        "timeout"
    } else if error_str.contains("connect") || error_str.contains("dns") {
        "unreachable"
    } else if error_str.contains("401") || error_str.contains("403") {
        "unauthorized"
    } else if error_str.contains("404") || error_str.contains("not found") {
        "not_found"
    } else {
        "backend"
    }
}
