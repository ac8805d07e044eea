use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Spawned timer that runs until cancelled or dropped.
///
/// Cancelling stops future callbacks; a callback already running is left to
/// finish.
pub struct ScheduledTask {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    /// Call `tick` every `period`, first call one period from now
    pub fn every<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!("{} started, every {:?}", name, period);

            loop {
                tokio::select! {
                    _ = interval.tick() => tick().await,
                    _ = stop.changed() => break,
                }
            }

            debug!("{} stopped", name);
        });

        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Call `task` once after `delay` unless cancelled first
    pub fn after<F, Fut>(name: &'static str, delay: Duration, task: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown, mut stop) = watch::channel(false);

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = time::sleep(delay) => task().await,
                _ = stop.changed() => debug!("{} cancelled before firing", name),
            }
        });

        Self {
            name,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        if self.handle.take().is_some() {
            let _ = self.shutdown.send(true);
            debug!("{} cancelled", self.name);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_none()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
