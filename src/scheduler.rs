use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::watchlist::WatchList;

/// Time between scheduled cycles.
pub const CYCLE_PERIOD: Duration = Duration::from_secs(4 * 60 * 60);

/// Drives the watch list: one cycle right away, then one every `period`.
///
/// Cycles run on the scheduler's own task, so they never overlap. Triggers
/// sit on a fixed grid starting one period after the initial cycle. A trigger
/// that comes due while a cycle is still running is dropped, with a warning,
/// and the next cycle waits for the following grid point.
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Run until `cancel` fires. Cancellation is only observed between
    /// cycles; a cycle in progress always runs to completion.
    pub async fn run(&self, watch_list: &WatchList, cancel: CancellationToken) {
        info!("Performing initial watch list check");
        watch_list.run_cycle().await;

        if cancel.is_cancelled() {
            info!("scheduler cancelled during initial cycle");
            return;
        }

        let mut next = Instant::now() + self.period;

        info!(
            period_secs = self.period.as_secs(),
            "Application started. Waiting for scheduled checks..."
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep_until(next) => {}
            }

            info!("running scheduled watch list check");
            watch_list.run_cycle().await;

            let (following, skipped) = next_trigger(next, Instant::now(), self.period);
            if skipped > 0 {
                warn!(
                    skipped,
                    overrun_secs = (Instant::now() - next).as_secs(),
                    "cycle overran the schedule, dropped triggers that came due while it ran"
                );
            }
            next = following;
        }

        info!("scheduler stopped");
    }
}

/// Advance `fired` along the period grid to the first trigger not already in
/// the past at `now`. Also returns how many grid points were passed over.
fn next_trigger(fired: Instant, now: Instant, period: Duration) -> (Instant, u32) {
    let mut next = fired + period;
    let mut skipped = 0;
    while next < now {
        next += period;
        skipped += 1;
    }
    (next, skipped)
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(CYCLE_PERIOD)
    }
}
