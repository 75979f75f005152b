use crate::draw::{Draw, RandomDraw};
use crate::error::ConfigError;
use crate::task::{TaskName, UnitTask, DRAW_RANGE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Knobs of a [`crate::Joiner`] run. The defaults reproduce the classic
/// demo: 500ms per task and a 20% failure rate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JoinerConfig {
    pub delay_ms: u64,
    /// Draws strictly above this value fail.
    pub failure_threshold: u32,
    /// Fixed seed for reproducible runs; OS entropy when absent.
    pub seed: Option<u64>,
    /// Per-task replacement for `delay_ms`.
    pub task_delays: BTreeMap<TaskName, u64>,
}

impl Default for JoinerConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            failure_threshold: 80,
            seed: None,
            task_delays: BTreeMap::new(),
        }
    }
}

impl JoinerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: JoinerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold > DRAW_RANGE {
            return Err(ConfigError::OutOfRange {
                field: "failure_threshold".into(),
                value: u64::from(self.failure_threshold),
                max: u64::from(DRAW_RANGE),
            });
        }
        Ok(())
    }

    pub fn delay_for(&self, task: TaskName) -> Duration {
        let ms = self.task_delays.get(&task).copied().unwrap_or(self.delay_ms);
        Duration::from_millis(ms)
    }

    pub fn unit_task(&self, task: TaskName) -> UnitTask {
        UnitTask::new(task, self.delay_for(task), self.failure_threshold)
    }

    pub fn build_draw(&self) -> Arc<dyn Draw> {
        match self.seed {
            Some(seed) => Arc::new(RandomDraw::seeded(seed)),
            None => Arc::new(RandomDraw::from_entropy()),
        }
    }
}
