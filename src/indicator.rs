pub mod taapi;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::IndicatorError;

/// Remote provider of a single oscillator reading per symbol.
///
/// Uses `BoxFuture` (from `futures` crate) instead of `async fn` in trait
/// to keep the trait object-safe (`dyn IndicatorSource`).
pub trait IndicatorSource: Send + Sync {
    /// Fetch the latest reading for `symbol`.
    ///
    /// Makes exactly one request attempt. Every failure is returned as an
    /// `IndicatorError`; the caller decides whether to skip the symbol.
    fn fetch(&self, symbol: &str) -> BoxFuture<'_, Result<f64, Report<IndicatorError>>>;
}
