use chrono::{Local, NaiveDate};

/// Source of "today" for date-relative views such as the due-soon filter.
pub trait Clock {
    /// The current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Reads the local date from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stopped on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
