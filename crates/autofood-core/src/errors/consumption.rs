// ABOUTME: Consumption tracking error types for profiles, records, and portion adjustments
// ABOUTME: Provides structured errors that integrate with the main AppError system
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};

/// Errors specific to consumption tracking
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsumptionError {
    /// No profile exists for the user
    #[error("consumption profile for user '{user_id}' not found")]
    ProfileNotFound {
        /// User the lookup was made for
        user_id: String,
    },

    /// The profile holds no data for the ingredient
    #[error("no consumption history for ingredient '{ingredient}'")]
    IngredientNotFound {
        /// Ingredient name
        ingredient: String,
    },

    /// Profile requires approval and the caller did not give it
    #[error("portion change for '{ingredient}' requires user consultation")]
    ConsultationRequired {
        /// Ingredient whose portion was to change
        ingredient: String,
        /// Portion currently in effect
        current_portion: Option<f64>,
        /// Portion the caller asked for
        requested_portion: f64,
    },

    /// Record failed validation
    #[error("invalid consumption record: {reason}")]
    InvalidRecord {
        /// Field at fault
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConsumptionError {
    /// Create a "profile not found" error
    #[must_use]
    pub fn profile_not_found(user_id: impl Into<String>) -> Self {
        Self::ProfileNotFound {
            user_id: user_id.into(),
        }
    }

    /// Create an "ingredient not found" error
    #[must_use]
    pub fn ingredient_not_found(ingredient: impl Into<String>) -> Self {
        Self::IngredientNotFound {
            ingredient: ingredient.into(),
        }
    }

    /// Create an "invalid record" error
    #[must_use]
    pub fn invalid_record(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            field,
            reason: reason.into(),
        }
    }
}

impl From<ConsumptionError> for AppError {
    fn from(error: ConsumptionError) -> Self {
        let message = error.to_string();
        match error {
            ConsumptionError::ProfileNotFound { user_id } => {
                Self::new(ErrorCode::ResourceNotFound, message).with_resource_id(user_id)
            }
            ConsumptionError::IngredientNotFound { ingredient } => {
                Self::new(ErrorCode::ResourceNotFound, message).with_resource_id(ingredient)
            }
            ConsumptionError::ConsultationRequired {
                ingredient,
                current_portion,
                requested_portion,
            } => Self::new(ErrorCode::ConsultationRequired, message).with_details(
                serde_json::json!({
                    "ingredient": ingredient,
                    "currentPortion": current_portion,
                    "requestedPortion": requested_portion,
                }),
            ),
            ConsumptionError::InvalidRecord { field, .. } => {
                Self::new(ErrorCode::InvalidInput, message)
                    .with_details(serde_json::json!({ "field": field }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consultation_required_maps_to_conflict() {
        let err: AppError = ConsumptionError::ConsultationRequired {
            ingredient: "lettuce".into(),
            current_portion: Some(100.0),
            requested_portion: 80.0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ConsultationRequired);
        assert_eq!(err.context.details["requestedPortion"], 80.0);
    }

    #[test]
    fn test_profile_not_found_maps_to_404() {
        let err: AppError = ConsumptionError::profile_not_found("u-1").into();
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.context.resource_id.as_deref(), Some("u-1"));
    }
}
