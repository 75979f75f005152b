use crate::config::JoinerConfig;
use crate::draw::Draw;
use crate::error::TaskError;
use crate::record::ResultRecord;
use crate::task::{TaskName, TaskOutcome};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, trace, warn};

/// Runs foo, bar and baz at the same time and merges their results.
///
/// The first failure wins. Tasks are never cancelled: after an early
/// return they keep running in the background and whatever they write
/// is dropped along with the record.
pub struct Joiner {
    config: JoinerConfig,
    draw: Arc<dyn Draw>,
}

impl Joiner {
    pub fn new(config: JoinerConfig) -> Self {
        let draw = config.build_draw();
        Self { config, draw }
    }

    pub fn with_draw(config: JoinerConfig, draw: Arc<dyn Draw>) -> Self {
        Self { config, draw }
    }

    pub fn config(&self) -> &JoinerConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<ResultRecord, TaskError> {
        let record = Arc::new(Mutex::new(ResultRecord::default()));
        // One slot per task: a failing task never waits on the receiver,
        // even after the receiver is gone.
        let (err_tx, mut err_rx) = mpsc::channel::<TaskError>(TaskName::ALL.len());
        let (done_tx, done_rx) = oneshot::channel::<()>();

        let mut handles = Vec::with_capacity(TaskName::ALL.len());
        for name in TaskName::ALL {
            let task = self.config.unit_task(name);
            let draw = Arc::clone(&self.draw);
            let record = Arc::clone(&record);
            let err_tx = err_tx.clone();

            handles.push(tokio::spawn(async move {
                debug!(task = %name, "task started");
                match task.run(draw.as_ref()).await {
                    TaskOutcome::Success(value) => {
                        record.lock().await.set(name, value);
                        debug!(task = %name, "task succeeded");
                    }
                    TaskOutcome::Failure(err) => {
                        debug!(task = %name, "task failed");
                        if err_tx.try_send(err).is_err() {
                            debug!(task = %name, "failure dropped, result already decided");
                        }
                    }
                }
            }));
        }
        // Only the wrappers hold senders now, so `recv` yields `None` once
        // they are all finished without error.
        drop(err_tx);

        tokio::spawn(async move {
            for joined in join_all(handles).await {
                if let Err(err) = joined {
                    warn!(error = %err, "task wrapper did not finish cleanly");
                }
            }
            trace!("all tasks finished");
            let _ = done_tx.send(());
        });

        // Biased towards errors: every failure is queued before its wrapper
        // finishes, so when both branches are ready the error must win.
        tokio::select! {
            biased;

            Some(err) = err_rx.recv() => Err(err),
            _ = done_rx => {
                let record = std::mem::take(&mut *record.lock().await);
                Ok(record)
            }
        }
    }
}

/// Runs a [`Joiner`] with the default configuration.
pub async fn call_foo_bar_baz() -> Result<ResultRecord, TaskError> {
    Joiner::new(JoinerConfig::default()).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ScriptedDraw;
    use crate::task::SUCCESS_MARKER;
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    fn config(delay_ms: u64) -> JoinerConfig {
        JoinerConfig {
            delay_ms,
            ..JoinerConfig::default()
        }
    }

    fn joiner(delay_ms: u64, draw: ScriptedDraw) -> Joiner {
        Joiner::with_draw(config(delay_ms), Arc::new(draw))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_all_succeed() {
        let record = joiner(20, ScriptedDraw::succeed_all()).run().await.unwrap();
        assert_eq!(record.foo, SUCCESS_MARKER);
        assert_eq!(record.bar, SUCCESS_MARKER);
        assert_eq!(record.baz, SUCCESS_MARKER);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_failure_names_task() {
        for failing in TaskName::ALL {
            let draw = ScriptedDraw::succeed_all().fail(failing);
            let err = joiner(10, draw).run().await.unwrap_err();
            assert_eq!(err, TaskError::new(failing));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_multiple_failures_report_one_of_them() {
        let draw = ScriptedDraw::fail_all().succeed(TaskName::Bar);
        let err = joiner(10, draw).run().await.unwrap_err();
        assert!(err.task == TaskName::Foo || err.task == TaskName::Baz);

        let err = joiner(10, ScriptedDraw::fail_all()).run().await.unwrap_err();
        assert!(TaskName::ALL.contains(&err.task));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tasks_run_in_parallel() {
        let delay = 200;
        let start = Instant::now();
        joiner(delay, ScriptedDraw::succeed_all()).run().await.unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(delay));
        assert!(elapsed < Duration::from_millis(delay * 2), "took {:?}", elapsed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_repeated_failure_bursts_do_not_hang() {
        let joiner = joiner(5, ScriptedDraw::fail_all());
        for _ in 0..25 {
            let result = tokio::time::timeout(Duration::from_secs(2), joiner.run()).await;
            let err = result.expect("joiner hung").unwrap_err();
            assert!(TaskName::ALL.contains(&err.task));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_are_never_torn() {
        let joiner = joiner(1, ScriptedDraw::succeed_all());
        for _ in 0..50 {
            let record = joiner.run().await.unwrap();
            for task in TaskName::ALL {
                assert_eq!(record.get(task), SUCCESS_MARKER);
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_error_returns_without_waiting_for_slow_tasks() {
        let mut task_delays = BTreeMap::new();
        task_delays.insert(TaskName::Foo, 10);
        let config = JoinerConfig {
            delay_ms: 300,
            task_delays,
            ..JoinerConfig::default()
        };
        let draw = Arc::new(ScriptedDraw::succeed_all().fail(TaskName::Foo));
        let joiner = Joiner::with_draw(config, draw.clone());

        let start = Instant::now();
        let err = joiner.run().await.unwrap_err();
        assert_eq!(err.task, TaskName::Foo);
        assert!(start.elapsed() < Duration::from_millis(200));
        assert_eq!(draw.calls(), 1);

        // The slow tasks were not cancelled.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(draw.calls(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_late_failures_after_return_are_dropped() {
        let mut task_delays = BTreeMap::new();
        task_delays.insert(TaskName::Foo, 10);
        let config = JoinerConfig {
            delay_ms: 100,
            task_delays,
            ..JoinerConfig::default()
        };
        let draw = Arc::new(ScriptedDraw::fail_all());
        let joiner = Joiner::with_draw(config, draw.clone());

        let err = joiner.run().await.unwrap_err();
        assert_eq!(err.task, TaskName::Foo);

        // bar and baz fail after the receiver is gone; nothing panics or blocks.
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(draw.calls(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_seeded_joiner_always_settles() {
        let config = JoinerConfig {
            delay_ms: 1,
            seed: Some(1234),
            ..JoinerConfig::default()
        };
        assert_eq!(Joiner::new(config.clone()).config().seed, Some(1234));

        // Every run returns either a complete record or one task's error.
        for _ in 0..10 {
            match Joiner::new(config.clone()).run().await {
                Ok(record) => assert!(record.is_complete()),
                Err(err) => assert!(TaskName::ALL.contains(&err.task)),
            }
        }
    }
}
