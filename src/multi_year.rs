//! Multi-year LAI expansion: one seasonal curve per simulated year, joined
//! into a single series aligned to the calendar.

use log::debug;

use crate::annual::AnnualParam;
use crate::calendar::{Calendar, DailySeries};
use crate::error::Result;
use crate::seasonal_lai::SeasonalLai;

/// LAI model whose parameters may vary from year to year.
#[derive(Debug, Clone, PartialEq)]
pub enum LaiModel {
    FixedPhase {
        budburst_doy: AnnualParam<u32>,
        emergence_days: AnnualParam<u32>,
        leaffall_doy: AnnualParam<u32>,
        shedding_days: AnnualParam<u32>,
        max_lai: AnnualParam<f64>,
        winter_fraction: AnnualParam<f64>,
    },
    Table {
        points: Vec<(u32, f64)>,
        max_lai: AnnualParam<f64>,
    },
    SigmoidBlend {
        incr_start_doy: AnnualParam<u32>,
        peak_doy: AnnualParam<u32>,
        decline_end_doy: AnnualParam<u32>,
        shape_incr: AnnualParam<f64>,
        shape_decr: AnnualParam<f64>,
        min_lai: AnnualParam<f64>,
        max_lai: AnnualParam<f64>,
    },
}

impl LaiModel {
    /// Replace the maximum LAI, e.g. with a stand table column.
    pub fn with_max_lai(mut self, values: AnnualParam<f64>) -> Self {
        match &mut self {
            LaiModel::FixedPhase { max_lai, .. }
            | LaiModel::Table { max_lai, .. }
            | LaiModel::SigmoidBlend { max_lai, .. } => *max_lai = values,
        }
        self
    }

    /// Check every annual vector against `n_years`.
    pub fn validate_lengths(&self, n_years: usize) -> Result<()> {
        match self {
            LaiModel::FixedPhase {
                budburst_doy,
                emergence_days,
                leaffall_doy,
                shedding_days,
                max_lai,
                winter_fraction,
            } => {
                budburst_doy.resolve(n_years, "budburst_doy")?;
                emergence_days.resolve(n_years, "emergence_days")?;
                leaffall_doy.resolve(n_years, "leaffall_doy")?;
                shedding_days.resolve(n_years, "shedding_days")?;
                max_lai.resolve(n_years, "max_lai")?;
                winter_fraction.resolve(n_years, "winter_fraction")?;
            }
            LaiModel::Table { max_lai, .. } => {
                max_lai.resolve(n_years, "max_lai")?;
            }
            LaiModel::SigmoidBlend {
                incr_start_doy,
                peak_doy,
                decline_end_doy,
                shape_incr,
                shape_decr,
                min_lai,
                max_lai,
            } => {
                incr_start_doy.resolve(n_years, "incr_start_doy")?;
                peak_doy.resolve(n_years, "peak_doy")?;
                decline_end_doy.resolve(n_years, "decline_end_doy")?;
                shape_incr.resolve(n_years, "shape_incr")?;
                shape_decr.resolve(n_years, "shape_decr")?;
                min_lai.resolve(n_years, "min_lai")?;
                max_lai.resolve(n_years, "max_lai")?;
            }
        }
        Ok(())
    }

    /// Parameters of the `k`-th simulated year (0-based).
    pub fn for_year(&self, k: usize) -> SeasonalLai {
        match self {
            LaiModel::FixedPhase {
                budburst_doy,
                emergence_days,
                leaffall_doy,
                shedding_days,
                max_lai,
                winter_fraction,
            } => SeasonalLai::FixedPhase {
                budburst_doy: budburst_doy.at(k),
                emergence_days: emergence_days.at(k),
                leaffall_doy: leaffall_doy.at(k),
                shedding_days: shedding_days.at(k),
                max_lai: max_lai.at(k),
                winter_fraction: winter_fraction.at(k),
            },
            LaiModel::Table { points, max_lai } => SeasonalLai::Table {
                points: points.clone(),
                max_lai: max_lai.at(k),
            },
            LaiModel::SigmoidBlend {
                incr_start_doy,
                peak_doy,
                decline_end_doy,
                shape_incr,
                shape_decr,
                min_lai,
                max_lai,
            } => SeasonalLai::SigmoidBlend {
                incr_start_doy: incr_start_doy.at(k),
                peak_doy: peak_doy.at(k),
                decline_end_doy: decline_end_doy.at(k),
                shape_incr: shape_incr.at(k),
                shape_decr: shape_decr.at(k),
                min_lai: min_lai.at(k),
                max_lai: max_lai.at(k),
            },
        }
    }
}

/// Daily LAI over the whole calendar.
///
/// Every year is generated in full at its own length (365 or 366) and the
/// joined sequence is cut to the calendar's first and last date. Day-of-year
/// markers are used literally in leap years, not rescaled.
pub fn expand_lai(calendar: &Calendar, model: &LaiModel) -> Result<DailySeries> {
    let spans = calendar.year_spans();
    model.validate_lengths(spans.len())?;

    // build every curve before producing output so a bad year fails the whole call
    let curves = spans
        .iter()
        .enumerate()
        .map(|(k, span)| model.for_year(k).curve(span.length))
        .collect::<Result<Vec<_>>>()?;

    let full_days: usize = spans.iter().map(|s| s.length as usize).sum();
    let mut joined = Vec::with_capacity(full_days);
    for (curve, span) in curves.iter().zip(&spans) {
        joined.extend(curve.daily(span.length));
    }

    let offset = (spans[0].first_doy - 1) as usize;
    let values: Vec<f64> = joined.into_iter().skip(offset).take(calendar.len()).collect();
    debug!(
        "expanded LAI over {} years into {} days starting {}",
        spans.len(),
        values.len(),
        calendar.start()
    );
    Ok(DailySeries::new(calendar, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VegError;
    use chrono::NaiveDate;

    fn b90(max_lai: AnnualParam<f64>) -> LaiModel {
        LaiModel::FixedPhase {
            budburst_doy: AnnualParam::Scalar(121),
            emergence_days: AnnualParam::Scalar(28),
            leaffall_doy: AnnualParam::Scalar(280),
            shedding_days: AnnualParam::Scalar(58),
            max_lai,
            winter_fraction: AnnualParam::Scalar(0.0),
        }
    }

    #[test]
    fn three_years_three_peaks() {
        let cal = Calendar::from_years(2003, 2005).unwrap();
        let lai = expand_lai(&cal, &b90(AnnualParam::PerYear(vec![4.0, 6.0, 5.0]))).unwrap();
        assert_eq!(lai.len(), 365 + 366 + 365);

        let mut peaks = Vec::new();
        for year in 2003..=2005 {
            let peak = lai
                .iter()
                .filter(|(d, _)| chrono::Datelike::year(d) == year)
                .map(|(_, v)| v)
                .fold(f64::MIN, f64::max);
            peaks.push(peak);
        }
        assert_eq!(peaks, vec![4.0, 6.0, 5.0]);
    }

    #[test]
    fn leap_year_uses_literal_doy() {
        let cal = Calendar::from_years(2004, 2004).unwrap();
        let lai = expand_lai(&cal, &b90(AnnualParam::Scalar(5.0))).unwrap();
        // doy 149 in 2004 is May 28
        let may28 = NaiveDate::from_ymd_opt(2004, 5, 28).unwrap();
        assert_eq!(lai.value_on(may28), Some(5.0));
        let may27 = NaiveDate::from_ymd_opt(2004, 5, 27).unwrap();
        assert!(lai.value_on(may27).unwrap() < 5.0);
    }

    #[test]
    fn partial_years_are_truncated() {
        let start = NaiveDate::from_ymd_opt(2003, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2004, 3, 31).unwrap();
        let cal = Calendar::new(start, end).unwrap();
        let whole = Calendar::from_years(2003, 2004).unwrap();
        let full = expand_lai(&whole, &b90(AnnualParam::Scalar(5.0))).unwrap();
        let part = expand_lai(&cal, &b90(AnnualParam::Scalar(5.0))).unwrap();

        assert_eq!(part.len(), cal.len());
        for (date, v) in part.iter() {
            assert_eq!(full.value_on(date), Some(v));
        }
    }

    #[test]
    fn wrong_vector_length_fails_fast() {
        let cal = Calendar::from_years(2003, 2005).unwrap();
        let err = expand_lai(&cal, &b90(AnnualParam::PerYear(vec![4.0, 6.0]))).unwrap_err();
        assert!(matches!(err, VegError::Validation(_)));
    }

    #[test]
    fn invalid_year_fails_whole_call() {
        let cal = Calendar::from_years(2003, 2004).unwrap();
        let model = LaiModel::FixedPhase {
            budburst_doy: AnnualParam::PerYear(vec![121, 300]),
            emergence_days: AnnualParam::Scalar(28),
            leaffall_doy: AnnualParam::Scalar(280),
            shedding_days: AnnualParam::Scalar(58),
            max_lai: AnnualParam::Scalar(5.0),
            winter_fraction: AnnualParam::Scalar(0.0),
        };
        assert!(matches!(expand_lai(&cal, &model), Err(VegError::Domain(_))));
    }

    #[test]
    fn max_lai_override() {
        let cal = Calendar::from_years(2010, 2011).unwrap();
        let model = LaiModel::Table {
            points: vec![(1, 1.0)],
            max_lai: AnnualParam::Scalar(1.0),
        }
        .with_max_lai(AnnualParam::PerYear(vec![2.0, 3.0]));
        let lai = expand_lai(&cal, &model).unwrap();
        assert_eq!(lai.values()[0], 2.0);
        assert_eq!(lai.values()[lai.len() - 1], 3.0);
    }

    #[test]
    fn sigmoid_per_year_shapes() {
        let cal = Calendar::from_years(2001, 2002).unwrap();
        let model = LaiModel::SigmoidBlend {
            incr_start_doy: AnnualParam::Scalar(100),
            peak_doy: AnnualParam::PerYear(vec![180, 220]),
            decline_end_doy: AnnualParam::Scalar(300),
            shape_incr: AnnualParam::Scalar(1.0),
            shape_decr: AnnualParam::Scalar(1.0),
            min_lai: AnnualParam::Scalar(0.5),
            max_lai: AnnualParam::Scalar(4.0),
        };
        let lai = expand_lai(&cal, &model).unwrap();
        assert_eq!(lai.values()[179], 4.0);
        assert_eq!(lai.values()[365 + 219], 4.0);
        assert!(lai.values()[365 + 179] < 4.0);
    }
}
