use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::indicator::IndicatorSource;
use crate::model::Alert;
use crate::notifier::Notifier;

/// Pause after every symbol, including the last one. The indicator API
/// rate-limits free keys, and this spacing keeps a cycle under that limit.
pub const REQUEST_SPACING: Duration = Duration::from_secs(300);

/// Counters for one pass over the watch list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub symbols: usize,
    pub readings: usize,
    pub failures: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

/// Walks the watch list in order, one fetch per symbol, alerting on breaches.
pub struct WatchList {
    symbols: Vec<String>,
    source: Arc<dyn IndicatorSource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    spacing: Duration,
}

impl WatchList {
    pub fn new(
        symbols: Vec<String>,
        source: Arc<dyn IndicatorSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            symbols,
            source,
            notifier,
            clock,
            spacing: REQUEST_SPACING,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Run one full cycle. Never fails: fetch and delivery errors are logged
    /// and counted, and the cycle moves on to the next symbol.
    pub async fn run_cycle(&self) -> CycleSummary {
        info!(
            symbols = self.symbols.len(),
            "Checking watch list at {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let mut summary = CycleSummary {
            symbols: self.symbols.len(),
            ..CycleSummary::default()
        };

        for symbol in &self.symbols {
            self.check_symbol(symbol, &mut summary).await;

            info!(
                wait_secs = self.spacing.as_secs(),
                "Waiting {}s before next API request",
                self.spacing.as_secs()
            );
            self.clock.sleep(self.spacing).await;
        }

        info!(
            symbols = summary.symbols,
            readings = summary.readings,
            failures = summary.failures,
            alerts_sent = summary.alerts_sent,
            alerts_failed = summary.alerts_failed,
            "watch list cycle complete"
        );

        summary
    }

    async fn check_symbol(&self, symbol: &str, summary: &mut CycleSummary) {
        let value = match self.source.fetch(symbol).await {
            Ok(v) => v,
            Err(e) => {
                warn!(symbol, error = ?e, "skipping symbol: indicator fetch failed");
                summary.failures += 1;
                return;
            }
        };
        summary.readings += 1;

        let Some(alert) = Alert::from_reading(symbol, value) else {
            return;
        };

        match self.notifier.send(&alert.message()).await {
            Ok(()) => summary.alerts_sent += 1,
            Err(e) => {
                warn!(symbol, kind = %alert.kind, error = ?e, "failed to send alert");
                summary.alerts_failed += 1;
            }
        }
    }
}
