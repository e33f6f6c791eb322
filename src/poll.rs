//! Bounded polling of vendor tasks
//!
//! A task is queried at a fixed interval until it reaches a terminal state or
//! the attempt budget runs out. The sleep between queries is injectable so
//! tests can observe the schedule without waiting on the clock.

use crate::ai::{TaskStatus, VideoGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Non-blocking sleep on the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately.
#[derive(Clone, Default)]
pub struct MockSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for MockSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub struct JobPoller {
    interval: Duration,
    max_attempts: u32,
    sleeper: Arc<dyn Sleeper>,
}

impl JobPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Poll `task_id` until it finishes and return the output video URL.
    pub async fn wait_for_video(
        &self,
        video: &dyn VideoGenerationService,
        task_id: &str,
    ) -> Result<String> {
        // One delay between each pair of queries.
        let mut delays =
            FixedInterval::new(self.interval).take(self.max_attempts.saturating_sub(1) as usize);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let snapshot = video.task_status(task_id).await?;
            debug!(
                "Task {} status {:?} (attempt {}/{})",
                task_id, snapshot.status, attempts, self.max_attempts
            );

            match snapshot.status {
                TaskStatus::Succeeded => {
                    return snapshot.video_url.ok_or_else(|| Error::MissingOutput {
                        task_id: task_id.to_string(),
                    });
                }
                TaskStatus::Failed | TaskStatus::Cancelled => {
                    let message = snapshot
                        .failure
                        .unwrap_or_else(|| format!("task ended with status {:?}", snapshot.status));
                    warn!("Task {} failed: {}", task_id, message);
                    return Err(Error::JobFailed {
                        task_id: task_id.to_string(),
                        message,
                        details: snapshot.raw,
                    });
                }
                TaskStatus::Unknown => {
                    warn!("Task {} reported an unrecognized status, still waiting", task_id);
                }
                TaskStatus::Pending | TaskStatus::Throttled | TaskStatus::Running => {}
            }

            match delays.next() {
                Some(delay) => self.sleeper.sleep(delay).await,
                None => {
                    info!("Task {} still running after {} checks", task_id, attempts);
                    return Err(Error::PollTimeout {
                        task_id: task_id.to_string(),
                        attempts,
                    });
                }
            }
        }
    }
}
