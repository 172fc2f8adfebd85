//! Month sequence generation for the projection horizon

use chrono::{Datelike, Days, Months, NaiveDate};

/// A single month of the projection: its 0-based index and first-of-month date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSlot {
    pub index: u32,
    pub date: NaiveDate,
}

impl MonthSlot {
    /// Label used in tables and exports, e.g. `2025-03`
    pub fn label(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// True when `other` falls in the same calendar month
    pub fn same_month(&self, other: NaiveDate) -> bool {
        self.date.year() == other.year() && self.date.month() == other.month()
    }

    /// True when this month is `other`'s month or any later one
    pub fn on_or_after(&self, other: NaiveDate) -> bool {
        (self.date.year(), self.date.month()) >= (other.year(), other.month())
    }
}

/// Truncate a date to the first day of its month
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Whole calendar months from `from` to `to`, ignoring the day of month
pub fn month_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()))
}

/// Coerce a raw (possibly fractional) horizon into a month count
///
/// NaN, infinities, negatives and anything below one month give zero.
pub fn horizon_from_f64(months: f64) -> u32 {
    if !months.is_finite() || months < 1.0 {
        return 0;
    }
    months.floor().min(f64::from(u32::MAX)) as u32
}

/// Ordered, finite sequence of first-of-month dates
///
/// Consumed once; build a new one to iterate again.
#[derive(Debug)]
pub struct MonthSequence {
    start: NaiveDate,
    index: u32,
    len: u32,
}

impl MonthSequence {
    /// `months` consecutive months beginning with `start`'s month
    pub fn with_horizon(start: NaiveDate, months: u32) -> Self {
        Self {
            start: first_of_month(start),
            index: 0,
            len: months,
        }
    }

    /// Every month from `start` to `end`, both inclusive
    ///
    /// Empty when `end` falls in an earlier month than `start`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        let span = month_offset(start, end);
        let len = if span < 0 {
            0
        } else {
            u32::try_from(span + 1).unwrap_or(u32::MAX)
        };
        Self::with_horizon(start, len)
    }

    /// First month of the sequence
    pub fn start(&self) -> NaiveDate {
        self.start
    }
}

impl Iterator for MonthSequence {
    type Item = MonthSlot;

    fn next(&mut self) -> Option<MonthSlot> {
        if self.index >= self.len {
            return None;
        }
        // Out-of-range dates end the sequence early
        let date = match self.start.checked_add_months(Months::new(self.index)) {
            Some(date) => date,
            None => {
                self.index = self.len;
                return None;
            }
        };
        let slot = MonthSlot {
            index: self.index,
            date,
        };
        self.index += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthSequence {}
