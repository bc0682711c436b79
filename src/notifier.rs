pub mod telegram;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::NotifyError;

/// Sink for alert notifications.
pub trait Notifier: Send + Sync {
    /// Deliver `text` once. No retry on failure.
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifyError>>>;
}
