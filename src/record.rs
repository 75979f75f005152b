use crate::task::TaskName;
use std::fmt;

/// The merged output of one run: one field per task.
///
/// Empty strings mean "not written yet".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRecord {
    pub foo: String,
    pub bar: String,
    pub baz: String,
}

impl ResultRecord {
    pub fn set(&mut self, task: TaskName, value: String) {
        match task {
            TaskName::Foo => self.foo = value,
            TaskName::Bar => self.bar = value,
            TaskName::Baz => self.baz = value,
        }
    }

    pub fn get(&self, task: TaskName) -> &str {
        match task {
            TaskName::Foo => &self.foo,
            TaskName::Bar => &self.bar,
            TaskName::Baz => &self.baz,
        }
    }

    pub fn is_complete(&self) -> bool {
        TaskName::ALL.iter().all(|task| !self.get(*task).is_empty())
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Foo: {}, Bar: {}, Baz: {}", self.foo, self.bar, self.baz)
    }
}
