// ABOUTME: Core data models shared across the Autofood service
// ABOUTME: Re-exports recipe, cooking status, and sensor types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `Recipe` / `Instruction`: the catalog entries cooking sessions execute
//! - `SessionStatus`: lifecycle states of a cooking session
//! - `AutomationLevel`: how much a session delegates to kitchen hardware
//! - `SensorKind`: known sensor types plus an open `Custom` variant

mod cooking;
mod recipe;

pub use cooking::{AutomationLevel, SensorKind, SessionStatus};
pub use recipe::{Instruction, Recipe};
