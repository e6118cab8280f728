// ABOUTME: Error types for the Autofood server
// ABOUTME: Re-exports the unified error system from autofood-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error handling lives in `autofood-core` so every crate in the workspace
//! shares one `AppError`; this module keeps `crate::errors` paths stable.

pub use autofood_core::errors::{
    AppError, AppResult, ConsumptionError, CookingProcessError, ErrorCode, ErrorContext,
    ErrorResponse, ErrorResponseDetails,
};
