// ABOUTME: Cooking session error types raised by the session state machine
// ABOUTME: Provides InvalidTransition and automation failures with AppError conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use crate::models::SessionStatus;

/// Errors raised by the cooking session state machine
///
/// These are recoverable: the caller may retry once it has reconciled its
/// view of the session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookingProcessError {
    /// Operation not allowed in the current state
    #[error("cannot {operation} a session that is {state}")]
    InvalidTransition {
        /// Attempted operation
        operation: &'static str,
        /// State the session was in
        state: SessionStatus,
    },

    /// The automation hook refused a reading
    #[error("automation hook failed: {reason}")]
    Automation {
        /// Reason reported by the hook
        reason: String,
    },
}

impl CookingProcessError {
    /// Create an invalid transition error
    #[must_use]
    pub const fn invalid_transition(operation: &'static str, state: SessionStatus) -> Self {
        Self::InvalidTransition { operation, state }
    }

    /// Create an automation error
    #[must_use]
    pub fn automation(reason: impl Into<String>) -> Self {
        Self::Automation {
            reason: reason.into(),
        }
    }
}

impl From<CookingProcessError> for AppError {
    fn from(error: CookingProcessError) -> Self {
        match &error {
            CookingProcessError::InvalidTransition { operation, state } => {
                let details = serde_json::json!({
                    "operation": operation,
                    "currentState": state.as_str(),
                });
                Self::new(ErrorCode::InvalidTransition, error.to_string()).with_details(details)
            }
            CookingProcessError::Automation { .. } => {
                Self::new(ErrorCode::AutomationFailed, error.to_string())
            }
        }
    }
}
