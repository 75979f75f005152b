use crate::draw::Draw;
use crate::error::TaskError;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const SUCCESS_MARKER: &str = "success";

/// Upper bound (exclusive) of every draw.
pub const DRAW_RANGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskName {
    Foo,
    Bar,
    Baz,
}

impl TaskName {
    pub const ALL: [TaskName; 3] = [TaskName::Foo, TaskName::Bar, TaskName::Baz];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Foo => "foo",
            TaskName::Bar => "bar",
            TaskName::Baz => "baz",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success(String),
    Failure(TaskError),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<String, TaskError> {
        match self {
            TaskOutcome::Success(value) => Ok(value),
            TaskOutcome::Failure(err) => Err(err),
        }
    }
}

/// One simulated long-running operation.
///
/// After `delay` it asks the [`Draw`] for a value in `0..100`. Anything
/// strictly above `threshold` is a failure.
#[derive(Debug, Clone)]
pub struct UnitTask {
    pub name: TaskName,
    pub delay: Duration,
    pub threshold: u32,
}

impl UnitTask {
    pub fn new(name: TaskName, delay: Duration, threshold: u32) -> Self {
        Self {
            name,
            delay,
            threshold,
        }
    }

    pub async fn run(&self, draw: &dyn Draw) -> TaskOutcome {
        tokio::time::sleep(self.delay).await;
        self.decide(draw.draw(self.name))
    }

    fn decide(&self, value: u32) -> TaskOutcome {
        if value > self.threshold {
            TaskOutcome::Failure(TaskError::new(self.name))
        } else {
            TaskOutcome::Success(SUCCESS_MARKER.to_string())
        }
    }
}
