use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConfigError;

/// How repeated marks for the same (student, class, date) are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendancePolicy {
    /// Every mark is a new record; earlier marks stay as history.
    Append,
    /// A later mark replaces the earlier one.
    #[default]
    Upsert,
}

impl FromStr for AttendancePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "upsert" => Ok(Self::Upsert),
            _ => Err(ConfigError::InvalidValue {
                name: "ATTENDANCE_POLICY",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AttendanceConfig {
    pub policy: AttendancePolicy,
}

impl AttendanceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let policy = match std::env::var("ATTENDANCE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => AttendancePolicy::default(),
        };
        Ok(Self { policy })
    }
}
