//! Daily stand properties (height, stem area index, canopy density) from
//! annual anchor values.
//!
//! The anchor of year `k` is the value reached at the end of that year. The
//! pre-period value `y0` (or the first anchor when none is given) holds at the
//! end of the year before the period.

use log::debug;
use serde::Deserialize;

use crate::annual::AnnualParam;
use crate::calendar::{Calendar, DailySeries, YearSpan};
use crate::error::{Result, VegError};

#[derive(Debug, Clone, PartialEq)]
pub enum StandInterpolation {
    /// Year `k` carries the value reached at the end of year `k - 1`.
    Step,
    /// Straight line from the previous year-end anchor to this year's.
    Linear,
    /// Flat before `start_doy`, ramp inside `[start_doy, end_doy]`, flat after.
    GrowthPeriod {
        start_doy: AnnualParam<u32>,
        end_doy: AnnualParam<u32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandPropertyInterpolator {
    method: StandInterpolation,
}

impl StandPropertyInterpolator {
    pub fn new(method: StandInterpolation) -> Self {
        StandPropertyInterpolator { method }
    }

    pub fn method(&self) -> &StandInterpolation {
        &self.method
    }

    /// Daily series over `calendar` for one property.
    pub fn interpolate(
        &self,
        calendar: &Calendar,
        anchors: &AnnualParam<f64>,
        initial: Option<f64>,
    ) -> Result<DailySeries> {
        let spans = calendar.year_spans();
        let n_years = spans.len();
        let anchors = anchors.resolve(n_years, "annual anchors")?;
        let y0 = initial.unwrap_or(anchors[0]);

        let windows = match &self.method {
            StandInterpolation::GrowthPeriod { start_doy, end_doy } => {
                let starts = start_doy.resolve(n_years, "growth period start_doy")?;
                let ends = end_doy.resolve(n_years, "growth period end_doy")?;
                let mut windows = Vec::with_capacity(n_years);
                for ((&s, &e), span) in starts.iter().zip(&ends).zip(&spans) {
                    if s < 1 || s >= e || e > span.length {
                        return Err(VegError::domain(format!(
                            "growth period [{s}, {e}] of {} must satisfy 1 <= start < end <= {}",
                            span.year, span.length
                        )));
                    }
                    windows.push((s, e));
                }
                Some(windows)
            }
            _ => None,
        };

        let mut values = Vec::with_capacity(calendar.len());
        let mut previous = y0;
        for (k, span) in spans.iter().enumerate() {
            let target = anchors[k];
            let window = windows.as_ref().map(|w| w[k]);
            values.extend(
                (span.first_doy..=span.last_doy)
                    .map(|doy| self.value_in_year(span, doy, previous, target, window)),
            );
            previous = target;
        }

        debug!(
            "interpolated {} stand anchors into {} daily values ({:?})",
            n_years,
            values.len(),
            self.method
        );
        Ok(DailySeries::new(calendar, values))
    }

    fn value_in_year(
        &self,
        span: &YearSpan,
        doy: u32,
        previous: f64,
        target: f64,
        window: Option<(u32, u32)>,
    ) -> f64 {
        match (&self.method, window) {
            (StandInterpolation::Step, _) => previous,
            (StandInterpolation::GrowthPeriod { .. }, Some((start, end))) => {
                if doy <= start {
                    previous
                } else if doy >= end {
                    target
                } else {
                    ramp(previous, target, (doy - start) as f64 / (end - start) as f64)
                }
            }
            // linear over the whole year: day 0 is the previous year-end
            _ => {
                if doy == span.length {
                    target
                } else {
                    ramp(previous, target, doy as f64 / span.length as f64)
                }
            }
        }
    }
}

fn ramp(from: f64, to: f64, frac: f64) -> f64 {
    from + (to - from) * frac
}

/// Columns of a stand property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandField {
    Height,
    MaxLai,
    StemAreaIndex,
    CanopyDensity,
    Age,
}

// One row per year of a stand inventory
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StandRow {
    pub year: i32,
    pub height: f64,          // [m]
    pub max_lai: f64,         // [m2/m2]
    pub stem_area_index: f64, // [m2/m2]
    pub canopy_density: f64,  // [-]
    pub age: f64,             // [years]
}

impl StandRow {
    pub fn get(&self, field: StandField) -> f64 {
        match field {
            StandField::Height => self.height,
            StandField::MaxLai => self.max_lai,
            StandField::StemAreaIndex => self.stem_area_index,
            StandField::CanopyDensity => self.canopy_density,
            StandField::Age => self.age,
        }
    }
}

/// Year-indexed stand inventory that supersedes scalar annual parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StandPropertyTable {
    rows: Vec<StandRow>,
}

impl StandPropertyTable {
    pub fn new(mut rows: Vec<StandRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(VegError::validation("stand property table has no rows"));
        }
        rows.sort_by_key(|r| r.year);
        if let Some(w) = rows.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(VegError::validation(format!(
                "stand property table lists year {} twice",
                w[0].year
            )));
        }
        Ok(StandPropertyTable { rows })
    }

    pub fn rows(&self) -> &[StandRow] {
        &self.rows
    }

    pub fn row(&self, year: i32) -> Option<&StandRow> {
        self.rows
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|i| &self.rows[i])
    }

    /// One value per simulated year of `calendar`; every year must be listed.
    pub fn annual(&self, field: StandField, calendar: &Calendar) -> Result<AnnualParam<f64>> {
        calendar
            .years()
            .map(|year| {
                self.row(year).map(|r| r.get(field)).ok_or_else(|| {
                    VegError::validation(format!("stand property table has no row for {year}"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(AnnualParam::PerYear)
    }
}
