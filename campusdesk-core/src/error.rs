//! Unified error handling system
//!
//! Structured error types with context and recovery suggestions, shared by
//! every CampusDesk crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{error, warn};

pub type CampusResult<T> = Result<T, CampusError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: BTreeMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: BTreeMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Per-field validation failures, keyed by form field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Main error type for the CampusDesk client
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The backend answered, but with `success: false` or a non-2xx status.
    #[error("Backend error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: FieldErrors,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl CampusError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CampusError::Network { context, .. } => Some(context),
            CampusError::Api { context, .. } => Some(context),
            CampusError::Authentication { context, .. } => Some(context),
            CampusError::Validation { context, .. } => Some(context),
            CampusError::Storage { context, .. } => Some(context),
            CampusError::Config { context, .. } => Some(context),
            CampusError::NotFound { context, .. } => Some(context),
            CampusError::Internal { context, .. } => Some(context),
            CampusError::Io(_) | CampusError::Serialization(_) => None,
        }
    }

    /// Check if the user can recover by simply trying again
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampusError::Network { .. } => true,
            CampusError::Api { status, .. } => matches!(status, Some(s) if *s >= 500),
            CampusError::Validation { .. } => true,
            CampusError::Authentication { .. }
            | CampusError::Config { .. }
            | CampusError::NotFound { .. } => false,
            _ => false,
        }
    }

    /// Field errors carried by a validation failure, if any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            CampusError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        let error_id = self.context().map(|c| c.error_id.as_str());
        match self {
            CampusError::Internal { .. } | CampusError::Storage { .. } => {
                error!(error_id = ?error_id, error = %self, "Internal or storage error");
            }
            CampusError::Config { .. } => {
                error!(error_id = ?error_id, error = %self, "Configuration error");
            }
            CampusError::Network { .. } | CampusError::Validation { .. } => {
                warn!(error_id = ?error_id, error = %self, "Recoverable error");
            }
            _ => {
                error!(error_id = ?error_id, error = %self, "Error occurred");
            }
        }
    }

    pub fn network<E>(message: impl Into<String>, source: E, component: &str) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CampusError::Network {
            message: message.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(component)
                .with_suggestion("Check network connectivity and the backend URL"),
        }
    }

    pub fn api(message: impl Into<String>, status: Option<u16>, component: &str) -> Self {
        CampusError::Api {
            message: message.into(),
            status,
            context: ErrorContext::new(component),
        }
    }

    pub fn storage(message: impl Into<String>, component: &str) -> Self {
        CampusError::Storage {
            message: message.into(),
            source: None,
            context: ErrorContext::new(component),
        }
    }

    pub fn validation(fields: FieldErrors, component: &str) -> Self {
        let message = fields
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join("; ");
        CampusError::Validation {
            message,
            fields,
            context: ErrorContext::new(component)
                .with_suggestion("Correct the highlighted fields and submit again"),
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::CampusError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'campusdesk config --init' to create a default config"),
        }
    };
}

#[macro_export]
macro_rules! auth_error {
    ($msg:expr, $component:expr) => {
        $crate::CampusError::Authentication {
            message: $msg.to_string(),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Sign in again to obtain a fresh access token"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::CampusError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Verify the record id or refresh the list"),
        }
    };
}
