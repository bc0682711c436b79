//! In-memory fakes for the evaluator's collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use error_stack::Report;
use futures::future::BoxFuture;
use tokio::time::Instant;

use crate::clock::Clock;
use crate::error::{IndicatorError, NotifyError};
use crate::indicator::IndicatorSource;
use crate::notifier::Notifier;

/// Everything the fakes observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Fetch(String),
    Notify(String),
    Sleep(Duration),
}

#[derive(Default)]
pub struct Journal {
    events: Mutex<Vec<Event>>,
    fetched_at: Mutex<Vec<Instant>>,
}

impl Journal {
    pub fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    /// Tokio time of every fetch, in call order.
    pub fn fetch_times(&self) -> Vec<Instant> {
        self.fetched_at.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Fetch(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Notify(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn total_sleep(&self) -> Duration {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(d),
                _ => None,
            })
            .sum()
    }
}

/// Returns a fixed reading per symbol; unknown symbols fail as missing values.
pub struct ScriptedSource {
    readings: HashMap<String, f64>,
    journal: Arc<Journal>,
}

impl ScriptedSource {
    pub fn new(journal: Arc<Journal>, readings: &[(&str, f64)]) -> Self {
        Self {
            readings: readings
                .iter()
                .map(|(s, v)| ((*s).to_owned(), *v))
                .collect(),
            journal,
        }
    }
}

impl IndicatorSource for ScriptedSource {
    fn fetch(&self, symbol: &str) -> BoxFuture<'_, Result<f64, Report<IndicatorError>>> {
        self.journal.fetched_at.lock().unwrap().push(Instant::now());
        self.journal.record(Event::Fetch(symbol.to_owned()));
        let result = self.readings.get(symbol).copied().ok_or_else(|| {
            Report::new(IndicatorError::MissingValue {
                symbol: symbol.to_owned(),
            })
        });
        Box::pin(async move { result })
    }
}

/// Records messages; fails every delivery when `failing` is set.
pub struct RecordingNotifier {
    journal: Arc<Journal>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self {
            journal,
            failing: false,
        }
    }

    pub fn failing(journal: Arc<Journal>) -> Self {
        Self {
            journal,
            failing: true,
        }
    }
}

impl Notifier for RecordingNotifier {
    fn send<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifyError>>> {
        self.journal.record(Event::Notify(text.to_owned()));
        let failing = self.failing;
        Box::pin(async move {
            if failing {
                Err(Report::new(NotifyError::Status))
            } else {
                Ok(())
            }
        })
    }
}

/// Records requested delays and returns immediately.
pub struct RecordingClock {
    journal: Arc<Journal>,
}

impl RecordingClock {
    pub fn new(journal: Arc<Journal>) -> Self {
        Self { journal }
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        self.journal.record(Event::Sleep(duration));
        Box::pin(async {})
    }
}
