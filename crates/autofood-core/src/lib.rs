// ABOUTME: Core types and constants for the Autofood kitchen service
// ABOUTME: Foundation crate with error handling, shared models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Autofood Core
//!
//! Foundation crate providing shared types and constants for the Autofood
//! kitchen service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and domain-specific errors
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Recipes, session status, automation levels and sensor kinds

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants and configuration defaults organized by domain
pub mod constants;

/// Core data models shared between the server and its tests
pub mod models;
