use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}
