// ABOUTME: Unified error handling with standard codes and the HTTP error envelope
// ABOUTME: Defines AppError, ErrorCode, and conversions from domain-specific errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every fallible operation in the service eventually produces an [`AppError`].
//! Domain modules raise their own typed errors ([`CookingProcessError`],
//! [`ConsumptionError`]) which convert into `AppError` at the boundary, where
//! the code decides the HTTP status and the envelope shape:
//!
//! ```json
//! {"success": false, "error": {"message": "...", "code": "INVALID_TRANSITION",
//!  "type": "conflict", "timestamp": "...", "requestId": "req_..."}}
//! ```

/// Cooking session errors
pub mod cooking;
/// Consumption tracking errors
pub mod consumption;

pub use consumption::ConsumptionError;
pub use cooking::CookingProcessError;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Malformed or semantically invalid input
    InvalidInput = 3000,
    /// A required field is absent
    MissingRequiredField = 3001,
    /// A numeric value falls outside its accepted range
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Unknown session, profile, recipe or ingredient
    ResourceNotFound = 4000,

    // Workflow (5000-5999)
    /// Cooking session state machine violation
    InvalidTransition = 5000,
    /// Portion adjustment needs explicit user approval
    ConsultationRequired = 5001,
    /// Automation hook rejected a sensor reading
    AutomationFailed = 5002,

    // Rate Limiting (2000-2999)
    /// Too many requests from one client
    RateLimitExceeded = 2000,

    // Hardware (7000-7999)
    /// Hardware capability exists only as a stub
    NotImplemented = 7000,
    /// Hardware did not answer in time
    HardwareTimeout = 7001,

    // Configuration (6000-6999)
    /// Configuration is invalid
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected failure
    InternalError = 9000,
    /// Data serialization/deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::InvalidTransition | Self::ConsultationRequired => 409,

            // 422 Unprocessable Entity
            Self::AutomationFailed => 422,

            // 429 Too Many Requests
            Self::RateLimitExceeded => 429,

            // 501 Not Implemented
            Self::NotImplemented => 501,

            // 504 Gateway Timeout
            Self::HardwareTimeout => 504,

            // 500 Internal Server Error
            Self::ConfigInvalid | Self::InternalError | Self::SerializationError => 500,
        }
    }

    /// Coarse error category reported as `type` in the error envelope
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => {
                "validation"
            }
            Self::ResourceNotFound => "not_found",
            Self::InvalidTransition | Self::ConsultationRequired => "conflict",
            Self::AutomationFailed => "automation",
            Self::RateLimitExceeded => "rate_limit",
            Self::NotImplemented | Self::HardwareTimeout => "hardware",
            Self::ConfigInvalid | Self::InternalError | Self::SerializationError => "internal",
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InvalidTransition => "The operation is not allowed in the current state",
            Self::ConsultationRequired => "User approval is required before applying this change",
            Self::AutomationFailed => "The automation hook could not process the request",
            Self::RateLimitExceeded => "Rate limit exceeded. Please slow down your requests",
            Self::NotImplemented => "This hardware capability is not implemented",
            Self::HardwareTimeout => "The hardware did not respond in time",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            request_id: None,
            resource_id: None,
            details: serde_json::Value::Null,
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for common errors
impl AppError {
    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Missing required field
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Value out of range
    #[must_use]
    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
            .with_details(serde_json::json!({ "field": field }))
    }

    /// Rate limit exceeded
    #[must_use]
    pub fn rate_limit_exceeded(limit: u32, retry_after_secs: u64) -> Self {
        Self::new(
            ErrorCode::RateLimitExceeded,
            format!("Rate limit of {limit} requests exceeded"),
        )
        .with_details(serde_json::json!({
            "limit": limit,
            "retry_after_seconds": retry_after_secs,
        }))
    }

    /// Hardware capability not implemented
    #[must_use]
    pub fn not_implemented(capability: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotImplemented,
            format!("{} is not implemented", capability.into()),
        )
    }

    /// Hardware call timed out
    #[must_use]
    pub fn hardware_timeout(device: impl Into<String>, timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::HardwareTimeout,
            format!("{} did not respond within {timeout_ms}ms", device.into()),
        )
    }

    /// Configuration is invalid
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// HTTP error response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false` for error responses
    pub success: bool,
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of the `error` field of [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseDetails {
    /// Human-readable message
    pub message: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Error category
    #[serde(rename = "type")]
    pub error_type: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
    /// RFC 3339 timestamp of the failure
    pub timestamp: String,
    /// Correlation ID of the failed request
    pub request_id: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let request_id = error
            .context
            .request_id
            .unwrap_or_else(|| format!("req_{}", Uuid::new_v4().simple()));
        Self {
            success: false,
            error: ErrorResponseDetails {
                message: error.message,
                code: error.code,
                error_type: error.code.category().to_owned(),
                details: error.context.details,
                timestamp: Utc::now().to_rfc3339(),
                request_id,
            },
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self.message, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, error = %self.message, "Request rejected");
        }

        let body = ErrorResponse::from(self);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InvalidTransition.http_status(), 409);
        assert_eq!(ErrorCode::ConsultationRequired.http_status(), 409);
        assert_eq!(ErrorCode::AutomationFailed.http_status(), 422);
        assert_eq!(ErrorCode::RateLimitExceeded.http_status(), 429);
        assert_eq!(ErrorCode::NotImplemented.http_status(), 501);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_response_envelope() {
        let error = AppError::not_found("Cooking session abc").with_request_id("req-123");
        let json = serde_json::to_value(ErrorResponse::from(error)).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "RESOURCE_NOT_FOUND");
        assert_eq!(json["error"]["type"], "not_found");
        assert_eq!(json["error"]["requestId"], "req-123");
        assert!(json["error"].get("details").is_none());
        assert!(json["error"]["timestamp"].is_string());
    }

    #[test]
    fn test_missing_request_id_is_generated() {
        let response = ErrorResponse::from(AppError::internal("boom"));
        assert!(response.error.request_id.starts_with("req_"));
    }
}
