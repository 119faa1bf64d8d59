//! Simulation calendar and the daily series aligned to it.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, VegError};

/// Number of days in `year` (365 or 366).
pub fn year_length(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31).map_or(365, |d| d.ordinal())
}

/// The part of one calendar year that falls inside the simulation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    pub year: i32,
    pub length: u32,    // 365 or 366
    pub first_doy: u32, // first simulated day-of-year (1 unless the period starts mid-year)
    pub last_doy: u32,  // last simulated day-of-year (length unless the period ends mid-year)
}

impl YearSpan {
    pub fn days(&self) -> usize {
        (self.last_doy - self.first_doy + 1) as usize
    }
}

// Inclusive date range of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    start: NaiveDate,
    end: NaiveDate,
}

impl Calendar {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(VegError::domain(format!(
                "calendar end {end} is before start {start}"
            )));
        }
        Ok(Calendar { start, end })
    }

    /// Whole calendar years `first..=last`.
    pub fn from_years(first: i32, last: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(first, 1, 1)
            .ok_or_else(|| VegError::domain(format!("year {first} is out of range")))?;
        let end = NaiveDate::from_ymd_opt(last, 12, 31)
            .ok_or_else(|| VegError::domain(format!("year {last} is out of range")))?;
        Calendar::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the period.
    pub fn len(&self) -> usize {
        self.end.signed_duration_since(self.start).num_days() as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn n_years(&self) -> usize {
        (self.end.year() - self.start.year() + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start.year()..=self.end.year()
    }

    pub fn year_spans(&self) -> Vec<YearSpan> {
        self.years()
            .map(|year| {
                let length = year_length(year);
                let first_doy = if year == self.start.year() {
                    self.start.ordinal()
                } else {
                    1
                };
                let last_doy = if year == self.end.year() {
                    self.end.ordinal()
                } else {
                    length
                };
                YearSpan {
                    year,
                    length,
                    first_doy,
                    last_doy,
                }
            })
            .collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.len())
    }

    /// 0-based position of `date` in the period, if it is inside.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some(date.signed_duration_since(self.start).num_days() as usize)
    }
}

/// One value per calendar day, starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    pub(crate) fn new(calendar: &Calendar, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), calendar.len());
        DailySeries {
            start: calendar.start(),
            values,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        if date < self.start {
            return None;
        }
        let idx = date.signed_duration_since(self.start).num_days() as usize;
        self.values.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.start.iter_days().zip(self.values.iter().copied())
    }
}
