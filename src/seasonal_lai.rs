//! One year of daily leaf area index under one of three shape models.

use log::trace;

use crate::error::{Result, VegError};
use crate::shape_curve::{Easing, ShapeCurve};

/// Concrete LAI parameters for a single year.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonalLai {
    /// Linear rise after budburst, plateau, linear fall after leaf-fall,
    /// flat at `winter_fraction * max_lai` outside the season.
    FixedPhase {
        budburst_doy: u32,
        emergence_days: u32,
        leaffall_doy: u32,
        shedding_days: u32,
        max_lai: f64,
        winter_fraction: f64,
    },
    /// Caller-supplied `(doy, fraction of max_lai)` pairs, clamped outside their range.
    Table {
        points: Vec<(u32, f64)>,
        max_lai: f64,
    },
    /// Sine-eased rise from `incr_start_doy` to `peak_doy` and fall to `decline_end_doy`.
    SigmoidBlend {
        incr_start_doy: u32,
        peak_doy: u32,
        decline_end_doy: u32,
        shape_incr: f64,
        shape_decr: f64,
        min_lai: f64,
        max_lai: f64,
    },
}

impl SeasonalLai {
    /// Validate against `year_length` and build the curve.
    pub fn curve(&self, year_length: u32) -> Result<ShapeCurve> {
        match self {
            SeasonalLai::FixedPhase {
                budburst_doy,
                emergence_days,
                leaffall_doy,
                shedding_days,
                max_lai,
                winter_fraction,
            } => {
                let marks = [
                    *budburst_doy,
                    phase_end(*budburst_doy, *emergence_days, "emergence")?,
                    *leaffall_doy,
                    phase_end(*leaffall_doy, *shedding_days, "shedding")?,
                ];
                check_strictly_increasing(&marks, year_length)?;
                let winter = winter_fraction * max_lai;
                ShapeCurve::linear(
                    marks.iter().map(|&d| d as f64).collect(),
                    vec![winter, *max_lai, *max_lai, winter],
                )
            }
            SeasonalLai::Table { points, max_lai } => {
                if points.is_empty() {
                    return Err(VegError::validation("LAI table has no (doy, fraction) pairs"));
                }
                let doys: Vec<u32> = points.iter().map(|p| p.0).collect();
                check_strictly_increasing(&doys, year_length)?;
                let scaled: Vec<(f64, f64)> = points
                    .iter()
                    .map(|&(doy, frac)| (doy as f64, frac * max_lai))
                    .collect();
                ShapeCurve::from_table(&scaled)
            }
            SeasonalLai::SigmoidBlend {
                incr_start_doy,
                peak_doy,
                decline_end_doy,
                shape_incr,
                shape_decr,
                min_lai,
                max_lai,
            } => {
                let marks = [1, *incr_start_doy, *peak_doy, *decline_end_doy, year_length];
                if let Some(w) = marks.windows(2).find(|w| w[1] < w[0]) {
                    return Err(VegError::domain(format!(
                        "sigmoid breakpoints must satisfy 1 <= start <= peak <= end <= {year_length}, \
                         got {} before {}",
                        w[0], w[1]
                    )));
                }
                ShapeCurve::new(
                    marks.iter().map(|&d| d as f64).collect(),
                    vec![*min_lai, *min_lai, *max_lai, *min_lai, *min_lai],
                    Easing::Sine(vec![1.0, *shape_incr, *shape_decr, 1.0]),
                )
            }
        }
    }

    /// Exactly `year_length` daily values, day-of-year 1 first.
    pub fn generate(&self, year_length: u32) -> Result<Vec<f64>> {
        let curve = self.curve(year_length)?;
        trace!("seasonal LAI for a {year_length}-day year: {self:?}");
        Ok(curve.daily(year_length))
    }
}

fn phase_end(start_doy: u32, days: u32, phase: &str) -> Result<u32> {
    start_doy.checked_add(days).ok_or_else(|| {
        VegError::domain(format!(
            "{phase} phase of {days} days starting on day {start_doy} overflows the day count"
        ))
    })
}

fn check_strictly_increasing(marks: &[u32], year_length: u32) -> Result<()> {
    if let Some(&first) = marks.first() {
        if first < 1 {
            return Err(VegError::domain(format!("day-of-year {first} is before day 1")));
        }
    }
    if let Some(w) = marks.windows(2).find(|w| w[1] <= w[0]) {
        return Err(VegError::domain(format!(
            "day-of-year markers must be strictly increasing ({} followed by {})",
            w[0], w[1]
        )));
    }
    if let Some(&last) = marks.last() {
        if last > year_length {
            return Err(VegError::domain(format!(
                "day-of-year {last} exceeds the year length {year_length}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn b90() -> SeasonalLai {
        SeasonalLai::FixedPhase {
            budburst_doy: 121,
            emergence_days: 28,
            leaffall_doy: 280,
            shedding_days: 58,
            max_lai: 5.0,
            winter_fraction: 0.1,
        }
    }

    fn coupmodel(shape_incr: f64, shape_decr: f64) -> SeasonalLai {
        SeasonalLai::SigmoidBlend {
            incr_start_doy: 100,
            peak_doy: 200,
            decline_end_doy: 300,
            shape_incr,
            shape_decr,
            min_lai: 0.5,
            max_lai: 4.0,
        }
    }

    #[test]
    fn fixed_phase_breakpoint_values() {
        let lai = b90().generate(365).unwrap();
        assert_eq!(lai.len(), 365);
        assert_relative_eq!(lai[120], 0.5); // doy 121
        assert_relative_eq!(lai[148], 5.0); // doy 149
        assert_relative_eq!(lai[279], 5.0); // doy 280
        assert_relative_eq!(lai[337], 0.5); // doy 338
        assert_relative_eq!(lai[0], 0.5);
        assert_relative_eq!(lai[364], 0.5);
        assert_relative_eq!(lai[134], 0.5 + 4.5 * 14.0 / 28.0);
    }

    #[test]
    fn fixed_phase_leap_year_keeps_literal_days() {
        let lai = b90().generate(366).unwrap();
        assert_eq!(lai.len(), 366);
        assert_relative_eq!(lai[148], 5.0);
    }

    #[test]
    fn fixed_phase_rejects_overlapping_phases() {
        let bad = SeasonalLai::FixedPhase {
            budburst_doy: 200,
            emergence_days: 100,
            leaffall_doy: 250,
            shedding_days: 30,
            max_lai: 5.0,
            winter_fraction: 0.0,
        };
        assert!(matches!(bad.generate(365), Err(VegError::Domain(_))));
    }

    #[test]
    fn fixed_phase_rejects_shedding_past_year_end() {
        let bad = SeasonalLai::FixedPhase {
            budburst_doy: 100,
            emergence_days: 20,
            leaffall_doy: 340,
            shedding_days: 30,
            max_lai: 5.0,
            winter_fraction: 0.0,
        };
        assert!(matches!(bad.generate(365), Err(VegError::Domain(_))));
    }

    #[test]
    fn fixed_phase_rejects_oversized_durations() {
        let long_emergence = SeasonalLai::FixedPhase {
            budburst_doy: 100,
            emergence_days: u32::MAX,
            leaffall_doy: 280,
            shedding_days: 58,
            max_lai: 5.0,
            winter_fraction: 0.0,
        };
        assert!(matches!(long_emergence.generate(365), Err(VegError::Domain(_))));

        let long_shedding = SeasonalLai::FixedPhase {
            budburst_doy: 100,
            emergence_days: 28,
            leaffall_doy: 280,
            shedding_days: u32::MAX - 100,
            max_lai: 5.0,
            winter_fraction: 0.0,
        };
        assert!(matches!(long_shedding.generate(365), Err(VegError::Domain(_))));
    }

    #[test]
    fn table_round_trips_supplied_days() {
        let points = vec![(1, 0.0), (130, 0.2), (160, 1.0), (290, 0.9), (330, 0.0)];
        let model = SeasonalLai::Table {
            points: points.clone(),
            max_lai: 6.0,
        };
        let lai = model.generate(365).unwrap();
        for (doy, frac) in points {
            assert_eq!(lai[doy as usize - 1], frac * 6.0);
        }
        assert_eq!(lai[364], 0.0);
    }

    #[test]
    fn table_clamps_outside_range() {
        let model = SeasonalLai::Table {
            points: vec![(100, 0.25), (200, 1.0)],
            max_lai: 4.0,
        };
        let lai = model.generate(365).unwrap();
        assert_eq!(lai[0], 1.0);
        assert_eq!(lai[364], 4.0);
    }

    #[test]
    fn empty_table_is_validation_error() {
        let model = SeasonalLai::Table {
            points: vec![],
            max_lai: 4.0,
        };
        assert!(matches!(model.generate(365), Err(VegError::Validation(_))));
    }

    #[test]
    fn sigmoid_anchor_values() {
        let lai = coupmodel(2.0, 0.5).generate(365).unwrap();
        assert_eq!(lai[0], 0.5);
        assert_eq!(lai[199], 4.0);
        assert_eq!(lai[364], 0.5);
        assert_eq!(lai[99], 0.5);
    }

    #[test]
    fn sigmoid_unit_exponent_is_sine_ease() {
        let lai = coupmodel(1.0, 1.0).generate(366).unwrap();
        for doy in 100..200 {
            let alpha = ((doy - 100) as f64 / 100.0 * FRAC_PI_2).sin();
            assert_relative_eq!(lai[doy - 1], 0.5 + 3.5 * alpha, epsilon = 1e-12);
        }
        for doy in 200..300 {
            let alpha = ((doy - 200) as f64 / 100.0 * FRAC_PI_2).sin();
            assert_relative_eq!(lai[doy - 1], 4.0 - 3.5 * alpha, epsilon = 1e-12);
        }
    }

    #[test]
    fn sigmoid_coincident_start_and_peak_jumps() {
        let model = SeasonalLai::SigmoidBlend {
            incr_start_doy: 150,
            peak_doy: 150,
            decline_end_doy: 300,
            shape_incr: 1.0,
            shape_decr: 1.0,
            min_lai: 0.0,
            max_lai: 3.0,
        };
        let lai = model.generate(365).unwrap();
        assert_eq!(lai[148], 0.0);
        assert_eq!(lai[149], 3.0);
        assert!(lai.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sigmoid_rejects_peak_after_decline() {
        let model = SeasonalLai::SigmoidBlend {
            incr_start_doy: 100,
            peak_doy: 310,
            decline_end_doy: 300,
            shape_incr: 1.0,
            shape_decr: 1.0,
            min_lai: 0.0,
            max_lai: 3.0,
        };
        assert!(matches!(model.generate(365), Err(VegError::Domain(_))));
    }

    #[test]
    fn regeneration_is_bit_identical() {
        let m = coupmodel(3.0, 0.7);
        assert_eq!(m.generate(365).unwrap(), m.generate(365).unwrap());
    }
}
