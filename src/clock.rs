use chrono::{Local, NaiveDate};
use std::sync::{Arc, Mutex};

/// Source of the local calendar date as `YYYY-MM-DD`.
pub trait Clock: Send + Sync {
    fn today(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        date_key(Local::now().date_naive())
    }
}

/// Clock pinned to a date that tests can move forward.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Arc<Mutex<String>>,
}

impl FixedClock {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: Arc::new(Mutex::new(date.into())),
        }
    }

    pub fn set(&self, date: impl Into<String>) {
        if let Ok(mut current) = self.date.lock() {
            *current = date.into();
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.date.lock().map(|date| date.clone()).unwrap_or_default()
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// True when `stored` is an earlier day than `today`.
///
/// Plain string comparison is only sound for zero-padded `YYYY-MM-DD`.
pub fn is_new_day(stored: &str, today: &str) -> bool {
    stored < today
}
