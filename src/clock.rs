use std::time::Duration;

use futures::future::BoxFuture;

/// Source of delays for request pacing.
///
/// Uses `BoxFuture` so the evaluator can hold a `dyn Clock` and tests can
/// swap in a clock that returns immediately.
pub trait Clock: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Clock backed by the tokio timer.
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
