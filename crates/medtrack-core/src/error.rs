//! Error types for medtrack-core
//!
//! Errors are split in two classes: workflow errors that are recovered
//! locally as an inline warning (validation, confirmation, selection) and
//! errors that come from the data gateway.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::GatewayError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Dataset not fetched yet
    NotLoaded,
    /// Dataset fetch failed
    LoadFailed,
    /// Incomplete user input
    ValidationError,
    /// Confirm invoked with nothing staged
    ConfirmationError,
    /// Delete confirmed with nothing selected
    NoSelection,
    /// The other edit workflow is active
    WorkflowConflict,
    /// Text inputs are locked by a staged candidate
    InputsLocked,
    /// A mutation is already in flight
    Busy,
    /// The view was detached before the call completed
    Detached,
    /// Gateway call failed
    GatewayError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::LoadFailed => write!(f, "LOAD_FAILED"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ConfirmationError => write!(f, "CONFIRMATION_ERROR"),
            ErrorCode::NoSelection => write!(f, "NO_SELECTION"),
            ErrorCode::WorkflowConflict => write!(f, "WORKFLOW_CONFLICT"),
            ErrorCode::InputsLocked => write!(f, "INPUTS_LOCKED"),
            ErrorCode::Busy => write!(f, "BUSY"),
            ErrorCode::Detached => write!(f, "DETACHED"),
            ErrorCode::GatewayError => write!(f, "GATEWAY_ERROR"),
        }
    }
}

/// Detailed error information for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Debug,
    Info,
    /// Shown as an inline warning banner
    Warning,
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for medtrack-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Data not loaded")]
    NotLoaded,

    #[error("Failed to load data: {message}")]
    LoadFailed { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Confirmation error: {message}")]
    ConfirmationError { message: String },

    #[error("No personnel selected for deletion")]
    NoSelection,

    #[error("Cannot start {requested} while {active} is in progress")]
    WorkflowConflict { requested: String, active: String },

    #[error("Inputs are locked until the staged personnel is submitted or cancelled")]
    InputsLocked,

    #[error("A submission is already in flight")]
    Busy,

    #[error("View was detached")]
    Detached,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl CoreError {
    /// Missing personnel name or hospital
    pub fn incomplete_input() -> Self {
        CoreError::ValidationError {
            message: "Please specify both personnel and hospital.".to_string(),
        }
    }

    /// Confirm pressed before the candidate was staged
    pub fn unconfirmed_candidate() -> Self {
        CoreError::ConfirmationError {
            message: "Please confirm the new personnel.".to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::LoadFailed { .. } => ErrorCode::LoadFailed,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::ConfirmationError { .. } => ErrorCode::ConfirmationError,
            CoreError::NoSelection => ErrorCode::NoSelection,
            CoreError::WorkflowConflict { .. } => ErrorCode::WorkflowConflict,
            CoreError::InputsLocked => ErrorCode::InputsLocked,
            CoreError::Busy => ErrorCode::Busy,
            CoreError::Detached => ErrorCode::Detached,
            CoreError::Gateway(_) => ErrorCode::GatewayError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Info,
            CoreError::LoadFailed { .. } => ErrorSeverity::Error,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::ConfirmationError { .. } => ErrorSeverity::Warning,
            CoreError::NoSelection => ErrorSeverity::Warning,
            CoreError::WorkflowConflict { .. } => ErrorSeverity::Warning,
            CoreError::InputsLocked => ErrorSeverity::Info,
            CoreError::Busy => ErrorSeverity::Info,
            CoreError::Detached => ErrorSeverity::Debug,
            CoreError::Gateway(_) => ErrorSeverity::Error,
        }
    }

    /// Whether the error never reached the gateway and is recovered in the view
    pub fn is_local(&self) -> bool {
        !matches!(self, CoreError::LoadFailed { .. } | CoreError::Gateway(_))
    }

    /// Inline warning banner text, for errors the view shows as a banner
    pub fn banner(&self) -> Option<String> {
        match self {
            CoreError::ValidationError { message } | CoreError::ConfirmationError { message } => {
                Some(message.clone())
            }
            CoreError::NoSelection => Some("Please select personnel to delete.".to_string()),
            CoreError::WorkflowConflict { active, .. } => {
                Some(format!("Finish or cancel {} first.", active))
            }
            _ => None,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotLoaded => {
                details = details
                    .with_suggestion("Wait for the initial fetch to complete.".to_string());
            }
            CoreError::LoadFailed { message } => {
                details = details.with_detail(serde_json::json!({ "gateway_message": message }));
                details = details.with_suggestion("Reload the view to fetch again.".to_string());
            }
            CoreError::ValidationError { .. } => {
                details = details.with_suggestion(
                    "Enter a personnel name and a hospital before confirming.".to_string(),
                );
            }
            CoreError::ConfirmationError { .. } => {
                details = details.with_suggestion(
                    "Confirm the new personnel before adding it.".to_string(),
                );
            }
            CoreError::NoSelection => {
                details = details.with_suggestion(
                    "Choose a personnel entry from the register first.".to_string(),
                );
            }
            CoreError::Gateway(err) => {
                details = details
                    .with_detail(serde_json::json!({ "gateway_message": err.to_string() }));
                details = details.with_suggestion("Try the submission again.".to_string());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// View the error happened in
    pub view: String,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(view: &str, operation: &str) -> Self {
        Self {
            view: view.to_string(),
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl From<ErrorSeverity> for log::Level {
    fn from(severity: ErrorSeverity) -> Self {
        match severity {
            ErrorSeverity::Debug => log::Level::Debug,
            ErrorSeverity::Info => log::Level::Info,
            ErrorSeverity::Warning => log::Level::Warn,
            ErrorSeverity::Error => log::Level::Error,
        }
    }
}

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::log!(
            target: "medtrack::error",
            log::Level::from(error.severity()),
            "{} [{}] {} - View: {} - Operation: {} - Data: {}",
            error.severity().to_string().to_uppercase(),
            error.code(),
            error,
            context.view,
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "medtrack::error",
            "WARNING: {} - View: {} - Operation: {} - Data: {}",
            message,
            context.view,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================
