use crate::task::TaskName;
use thiserror::Error;

/// The one way a unit task can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{task} error")]
pub struct TaskError {
    pub task: TaskName,
}

impl TaskError {
    pub fn new(task: TaskName) -> Self {
        Self { task }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Value {value} for field '{field}' is out of range (max: {max})")]
    OutOfRange {
        field: String,
        value: u64,
        max: u64,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
