//! Error types for the support case workflow.
//!
//! This module defines `SupportError`, the unified error type used throughout
//! the crate. Every variant is terminal: the workflow stops at the first one.

use thiserror::Error;

/// Common AWS Support API error codes.
pub mod codes {
    /// The case id passed to a case operation does not exist.
    pub const CASE_ID_NOT_FOUND: &str = "CaseIdNotFound";
    /// A create-case call hit the account's case creation limit.
    pub const CASE_CREATION_LIMIT_EXCEEDED: &str = "CaseCreationLimitExceeded";
}

/// Unified error type for all support case operations.
#[derive(Error, Debug)]
pub enum SupportError {
    /// Configuration error - credentials or region could not be resolved,
    /// or an environment value is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A remote AWS Support API call failed.
    #[error("cannot {operation}: {message}")]
    Api {
        /// The operation that failed (e.g. "create case").
        operation: String,
        /// Service error code, when the API returned one.
        code: Option<String>,
        /// Human-readable failure description.
        message: String,
    },

    /// No service with the requested code was returned by the API.
    #[error("service not found: {code}")]
    ServiceNotFound {
        /// The service code that was looked up.
        code: String,
    },

    /// The selected category does not exist in the service.
    #[error("category {selector} not found in service {service}")]
    CategoryNotFound {
        /// Code of the service that was searched.
        service: String,
        /// Description of the selector (code or position).
        selector: String,
    },

    /// The API returned no case for the requested id.
    #[error("case not found: {id}")]
    CaseNotFound {
        /// The case id that was looked up.
        id: String,
    },

    /// Local validation of a case request failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Writing the console report failed.
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON serialization of a response dump failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SupportError {
    /// Creates a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SupportError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SupportError::Validation(message.into())
    }

    /// Creates an API error for the given operation.
    pub fn api(
        operation: impl Into<String>,
        code: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        SupportError::Api {
            operation: operation.into(),
            code,
            message: message.into(),
        }
    }

    /// Creates a service not found error.
    pub fn service_not_found(code: impl Into<String>) -> Self {
        SupportError::ServiceNotFound { code: code.into() }
    }

    /// Creates a category not found error.
    pub fn category_not_found(service: impl Into<String>, selector: impl Into<String>) -> Self {
        SupportError::CategoryNotFound {
            service: service.into(),
            selector: selector.into(),
        }
    }

    /// Creates a case not found error.
    pub fn case_not_found(id: impl Into<String>) -> Self {
        SupportError::CaseNotFound { id: id.into() }
    }

    /// Returns true if this error was raised while resolving configuration.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, SupportError::Config(_))
    }

    /// Returns true if this error reports a missing service, category or case.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SupportError::ServiceNotFound { .. }
                | SupportError::CategoryNotFound { .. }
                | SupportError::CaseNotFound { .. }
        )
    }

    /// Returns the AWS service error code, if this is an API error that carried one.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            SupportError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
