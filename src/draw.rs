use crate::task::{TaskName, DRAW_RANGE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Source of the per-task number that decides success or failure.
///
/// Shared by all tasks of a run, so it must be usable from several
/// threads at once.
pub trait Draw: Send + Sync {
    /// A value in `0..100` for one invocation of `task`.
    fn draw(&self, task: TaskName) -> u32;
}

/// Uniform draws from one generator that is seeded once.
///
/// Reseeding from the clock on every call is the classic mistake here:
/// three tasks waking up in the same instant get the same seed and
/// therefore the same outcome. This type seeds once and lets every task
/// pull from the same stream instead.
pub struct RandomDraw {
    rng: Mutex<StdRng>,
}

impl RandomDraw {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Draw for RandomDraw {
    fn draw(&self, _task: TaskName) -> u32 {
        // The generator has no invariant a panic could break.
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        rng.gen_range(0..DRAW_RANGE)
    }
}

/// Fixed values per task, for forcing outcomes.
///
/// Counts every call so callers can check how many tasks actually
/// reached their draw.
pub struct ScriptedDraw {
    values: HashMap<TaskName, u32>,
    fallback: u32,
    calls: AtomicUsize,
}

impl ScriptedDraw {
    const PASS: u32 = 0;
    const FAIL: u32 = DRAW_RANGE - 1;

    /// Every task draws the lowest value and succeeds for any threshold.
    pub fn succeed_all() -> Self {
        Self {
            values: HashMap::new(),
            fallback: Self::PASS,
            calls: AtomicUsize::new(0),
        }
    }

    /// Every task draws the highest value and fails for any threshold below 99.
    pub fn fail_all() -> Self {
        Self {
            values: HashMap::new(),
            fallback: Self::FAIL,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, task: TaskName, value: u32) -> Self {
        self.values.insert(task, value);
        self
    }

    pub fn fail(self, task: TaskName) -> Self {
        self.with(task, Self::FAIL)
    }

    pub fn succeed(self, task: TaskName) -> Self {
        self.with(task, Self::PASS)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Draw for ScriptedDraw {
    fn draw(&self, task: TaskName) -> u32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.values.get(&task).copied().unwrap_or(self.fallback)
    }
}
