// ABOUTME: Storage constants for bounded in-memory repositories
// ABOUTME: Capacity and idle-expiry defaults for sessions and consumption profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Maximum cooking sessions kept in memory
pub const DEFAULT_SESSION_CAPACITY: usize = 10_000;

/// Idle time after which a cooking session is evicted (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Maximum consumption profiles kept in memory
pub const DEFAULT_PROFILE_CAPACITY: usize = 10_000;

/// Idle time after which a consumption profile is evicted (30 days)
pub const DEFAULT_PROFILE_TTL_SECS: u64 = 2_592_000;

/// How often expired entries are swept
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300; // 5 minutes
