use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Result;

/// A periodic background job. The first tick fires immediately after
/// `start`, the rest on the job's interval.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &str;
    fn interval(&self) -> Duration;
    async fn run(&self) -> Result<()>;
}

pub struct Scheduler {
    jobs: Vec<Arc<dyn ScheduledJob>>,
    handles: Vec<JoinHandle<()>>,
    stop: Option<watch::Sender<bool>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            stop: None,
        }
    }

    pub fn register_job(&mut self, job: Arc<dyn ScheduledJob>) {
        self.jobs.push(job);
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_some()
    }

    pub fn start(&mut self) {
        if self.stop.is_some() {
            return;
        }
        let (tx, rx) = watch::channel(false);
        self.stop = Some(tx);

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut tick = tokio::time::interval(job.interval());
            let mut rx = rx.clone();
            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = tick.tick() => {
                            if let Err(err) = job.run().await {
                                tracing::warn!(job = job.name(), error = %err, "scheduled job failed");
                            }
                        }
                        _ = rx.changed() => {
                            if *rx.borrow() {
                                break;
                            }
                        }
                    }
                }
            });
            self.handles.push(handle);
        }
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(true);
        }
        let handles = std::mem::take(&mut self.handles);
        for handle in handles {
            let _ = handle.await;
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        ticks: AtomicUsize,
    }

    #[async_trait]
    impl ScheduledJob for CountingJob {
        fn name(&self) -> &str {
            "counting"
        }

        fn interval(&self) -> Duration {
            Duration::from_millis(10)
        }

        async fn run(&self) -> Result<()> {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn first_tick_fires_immediately_and_stop_joins() {
        let job = Arc::new(CountingJob {
            ticks: AtomicUsize::new(0),
        });
        let mut scheduler = Scheduler::new();
        scheduler.register_job(Arc::clone(&job) as Arc<dyn ScheduledJob>);
        assert!(!scheduler.is_running());

        scheduler.start();
        assert!(scheduler.is_running());
        tokio::time::sleep(Duration::from_millis(35)).await;
        scheduler.stop().await;

        let ticks = job.ticks.load(Ordering::SeqCst);
        assert!(ticks >= 2, "expected several ticks, got {ticks}");
        assert!(!scheduler.is_running());
    }
}
