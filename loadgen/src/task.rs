use crate::errors::LoadGenError;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

///Fixed-interval driver with explicit cancellation. The tick closure runs
///once per interval until the token is cancelled; an in-flight tick finishes,
///no new tick starts once cancellation is observed.
pub struct PeriodicTask;

impl PeriodicTask {
    pub fn spawn<F>(
        interval: Duration,
        token: CancellationToken,
        mut tick: F,
    ) -> Result<JoinHandle<()>, LoadGenError>
    where
        F: FnMut() + Send + 'static,
    {
        if interval.is_zero() {
            return Err(LoadGenError::InvalidInterval);
        }

        Ok(tokio::spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => tick(),
                }
            }

            debug!("periodic task cancelled");
        }))
    }
}
