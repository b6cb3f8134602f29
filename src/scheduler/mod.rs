use async_trait::async_trait;
use log::{error, info};
use std::future::Future;
use std::time::Duration;

/// Source of the pause between iterations
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real time through tokio
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Runs a task repeatedly with a fixed pause between runs
pub struct Scheduler<C: Clock> {
    clock: C,
    interval: Duration,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self { clock, interval }
    }

    /// Run `tick` until `max_iterations` is reached, or forever with `None`.
    ///
    /// An error from one iteration is logged and the loop keeps going.
    /// Returns the number of iterations run.
    pub async fn run<F, Fut>(&self, max_iterations: Option<u64>, mut tick: F) -> u64
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        let mut iteration = 0u64;
        loop {
            iteration += 1;
            info!("Starting iteration {}", iteration);
            if let Err(e) = tick(iteration).await {
                error!("Iteration {} failed: {:#}", iteration, e);
            }

            if max_iterations.is_some_and(|max| iteration >= max) {
                return iteration;
            }

            info!("Next iteration in {}s", self.interval.as_secs());
            self.clock.sleep(self.interval).await;
        }
    }
}
