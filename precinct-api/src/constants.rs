//! Constants for Precinct API
//!
//! Defaults for every setting read by [`ApiConfig`](crate::config::ApiConfig).

// ============================================================================
// SERVER
// ============================================================================

/// Default bind host
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

// ============================================================================
// CORS
// ============================================================================

/// Default CORS max age in seconds (24 hours)
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 86400;

// ============================================================================
// SEEDING
// ============================================================================

/// Agents generated at startup
pub const DEFAULT_SEED_AGENTS: usize = 1000;

/// Cases generated at startup
pub const DEFAULT_SEED_CASES: usize = 25;

// ============================================================================
// LOGGING
// ============================================================================

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "precinct_api=debug,tower_http=debug,info";
