//! Rate limiting configuration for API endpoints.
//!
//! Limits are token buckets keyed by client IP, built with the `governor` crate.
//!
//! # Configuration
//!
//! - `RATE_LIMIT_ENABLED`: Turn limiting on or off (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: Requests per second for general endpoints (default: 20)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: Burst size for general endpoints (default: 60)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: Requests per second for auth endpoints (default: 2)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: Burst size for auth endpoints (default: 5)
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::RateLimitConfig;
//!
//! let config = RateLimitConfig::from_env();
//! let limiter = governor::RateLimiter::keyed(config.auth_quota());
//! ```

use governor::Quota;
use std::num::NonZeroU32;

use crate::{env_flag, env_parse};

/// Rate limit configuration for the API.
///
/// Authentication endpoints get their own, stricter bucket so password
/// guessing is throttled independently of normal traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Tokens replenished per second for general endpoints.
    pub general_per_second: u32,

    /// Maximum tokens that can accumulate for general endpoints.
    pub general_burst_size: u32,

    /// Tokens replenished per second for auth endpoints.
    pub auth_per_second: u32,

    /// Maximum tokens that can accumulate for auth endpoints.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            general_per_second: 20,
            general_burst_size: 60,
            auth_per_second: 2,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// Creates a new `RateLimitConfig` from environment variables.
    ///
    /// Falls back to default values if environment variables are not set
    /// or cannot be parsed. Limiting is enabled unless `RATE_LIMIT_ENABLED`
    /// says otherwise.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", true),
            general_per_second: env_parse(
                "RATE_LIMIT_GENERAL_PER_SECOND",
                defaults.general_per_second,
            ),
            general_burst_size: env_parse(
                "RATE_LIMIT_GENERAL_BURST_SIZE",
                defaults.general_burst_size,
            ),
            auth_per_second: env_parse("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_parse("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Quota for general API endpoints.
    #[must_use]
    pub fn general_quota(&self) -> Quota {
        quota(self.general_per_second, self.general_burst_size)
    }

    /// Quota for authentication endpoints.
    #[must_use]
    pub fn auth_quota(&self) -> Quota {
        quota(self.auth_per_second, self.auth_burst_size)
    }
}

fn quota(per_second: u32, burst: u32) -> Quota {
    let per_second = NonZeroU32::new(per_second).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(burst).unwrap_or(per_second);
    Quota::per_second(per_second).allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.general_per_second, 20);
        assert_eq!(config.general_burst_size, 60);
        assert_eq!(config.auth_per_second, 2);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_quota_burst() {
        let config = RateLimitConfig::default();
        assert_eq!(config.auth_quota().burst_size().get(), 5);
        assert_eq!(config.general_quota().burst_size().get(), 60);
    }

    #[test]
    fn test_zero_values_fall_back_to_one() {
        let config = RateLimitConfig {
            enabled: true,
            general_per_second: 0,
            general_burst_size: 0,
            auth_per_second: 0,
            auth_burst_size: 0,
        };
        assert_eq!(config.auth_quota().burst_size().get(), 1);
    }
}
