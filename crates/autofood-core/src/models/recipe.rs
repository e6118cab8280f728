// ABOUTME: Recipe catalog models with ordered cooking instructions
// ABOUTME: Defines Recipe and Instruction along with their validation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::constants::recipes::MAX_STEP_TIMING_MINUTES;
use crate::errors::{AppError, AppResult};

/// A single cooking instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// What the cook (or the machine) does in this step
    pub step: String,
    /// Expected duration in minutes, if the recipe specifies one
    #[serde(default, alias = "timing", skip_serializing_if = "Option::is_none")]
    pub timing_minutes: Option<f64>,
}

impl Instruction {
    /// Create an instruction with an expected duration in minutes
    #[must_use]
    pub fn timed(step: impl Into<String>, minutes: f64) -> Self {
        Self {
            step: step.into(),
            timing_minutes: Some(minutes),
        }
    }

    /// Expected duration as a `Duration`, `None` when absent or unrepresentable
    #[must_use]
    pub fn expected_duration(&self) -> Option<Duration> {
        self.timing_minutes
            .and_then(|m| Duration::try_from_secs_f64(m * 60.0).ok())
    }
}

/// Recipe with an ordered instruction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Number of servings the quantities are written for
    pub servings: u32,
    /// Instructions in execution order
    pub instructions: Vec<Instruction>,
    /// When the recipe was added to the catalog
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a recipe, validating name and instructions
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank, there are no
    /// instructions, an instruction is blank, or a timing is negative or
    /// longer than [`MAX_STEP_TIMING_MINUTES`].
    pub fn new(
        name: impl Into<String>,
        servings: u32,
        instructions: Vec<Instruction>,
    ) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }
        if servings == 0 {
            return Err(AppError::out_of_range(
                "servings",
                "servings must be at least 1",
            ));
        }
        if instructions.is_empty() {
            return Err(AppError::invalid_input(
                "recipe must contain at least one instruction",
            ));
        }
        for (index, instruction) in instructions.iter().enumerate() {
            if instruction.step.trim().is_empty() {
                return Err(AppError::invalid_input(format!(
                    "instruction {index} has an empty step"
                )));
            }
            if let Some(minutes) = instruction.timing_minutes {
                if !(0.0..=MAX_STEP_TIMING_MINUTES).contains(&minutes) {
                    return Err(AppError::out_of_range(
                        "timing",
                        format!("instruction {index} has an invalid timing of {minutes}"),
                    ));
                }
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            servings,
            instructions,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_requires_instructions() {
        let err = Recipe::new("Toast", 1, Vec::new()).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidInput);
    }

    #[test]
    fn test_recipe_rejects_negative_timing() {
        let err = Recipe::new("Toast", 1, vec![Instruction::timed("toast", -1.0)]).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_recipe_rejects_timing_beyond_limit() {
        for minutes in [MAX_STEP_TIMING_MINUTES + 1.0, 1e300, f64::INFINITY, f64::NAN] {
            let err =
                Recipe::new("Stew", 1, vec![Instruction::timed("simmer", minutes)]).unwrap_err();
            assert_eq!(err.code, crate::errors::ErrorCode::ValueOutOfRange);
        }
        assert!(Recipe::new(
            "Stew",
            1,
            vec![Instruction::timed("simmer", MAX_STEP_TIMING_MINUTES)]
        )
        .is_ok());
    }

    #[test]
    fn test_expected_duration_of_huge_timing_is_none() {
        assert_eq!(Instruction::timed("wait", 1e300).expected_duration(), None);
        assert_eq!(Instruction::timed("wait", -1.0).expected_duration(), None);
        assert_eq!(
            Instruction::timed("wait", 2.0).expected_duration(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_instruction_accepts_timing_alias() {
        let parsed: Instruction = serde_json::from_str(r#"{"step":"a","timing":5}"#).unwrap();
        assert_eq!(parsed.timing_minutes, Some(5.0));
    }
}
