/*!
Piecewise shape curves over an ordered set of breakpoints.

A curve holds breakpoints `x`, values `y` at those breakpoints and an easing
rule per segment. Before the first breakpoint the first value is held, after
the last breakpoint the last value is held. Coincident breakpoints form a
zero-length segment which is skipped, so the curve jumps straight to the
later value.

Two easing rules are supported:
* `Easing::Linear` - straight lines between breakpoints.
* `Easing::Sine(exponents)` - `alpha = sin(frac * pi/2)^exponent` per segment,
  result `(1 - alpha) * y[i] + alpha * y[i + 1]`.
*/
use std::f64::consts::FRAC_PI_2;

use crate::error::{Result, VegError};

#[derive(Debug, Clone, PartialEq)]
pub enum Easing {
    Linear,
    Sine(Vec<f64>), // one shape exponent per segment
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeCurve {
    x: Vec<f64>,
    y: Vec<f64>,
    easing: Easing,
}

impl ShapeCurve {
    /// Build a curve. Breakpoints must be non-decreasing and as many as values;
    /// sine easing needs one positive exponent per segment.
    pub fn new(x: Vec<f64>, y: Vec<f64>, easing: Easing) -> Result<Self> {
        if x.is_empty() {
            return Err(VegError::validation("shape curve needs at least one breakpoint"));
        }
        if x.len() != y.len() {
            return Err(VegError::validation(format!(
                "{} breakpoints but {} values",
                x.len(),
                y.len()
            )));
        }
        if let Some(w) = x.windows(2).find(|w| w[1] < w[0]) {
            return Err(VegError::domain(format!(
                "breakpoints must not decrease ({} followed by {})",
                w[0], w[1]
            )));
        }
        if let Easing::Sine(exponents) = &easing {
            if exponents.len() != x.len() - 1 {
                return Err(VegError::validation(format!(
                    "{} segments but {} shape exponents",
                    x.len() - 1,
                    exponents.len()
                )));
            }
            if let Some(e) = exponents.iter().find(|e| !(**e > 0.0 && e.is_finite())) {
                return Err(VegError::domain(format!("shape exponent {e} must be positive")));
            }
        }
        Ok(ShapeCurve { x, y, easing })
    }

    /// Linear curve with clamped ends.
    pub fn linear(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        ShapeCurve::new(x, y, Easing::Linear)
    }

    /// Linear curve from `(x, y)` pairs that must be strictly increasing in `x`.
    pub fn from_table(points: &[(f64, f64)]) -> Result<Self> {
        if let Some(w) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(VegError::domain(format!(
                "table positions must be strictly increasing ({} followed by {})",
                w[0].0, w[1].0
            )));
        }
        let (x, y) = points.iter().copied().unzip();
        ShapeCurve::linear(x, y)
    }

    pub fn first_x(&self) -> f64 {
        self.x[0]
    }

    pub fn last_x(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    pub fn eval(&self, t: f64) -> f64 {
        // index of the last breakpoint <= t; the next one is strictly > t
        let upper = self.x.partition_point(|&b| b <= t);
        if upper == 0 {
            return self.y[0];
        }
        let i = upper - 1;
        if i >= self.x.len() - 1 {
            return self.y[self.y.len() - 1];
        }
        let frac = (t - self.x[i]) / (self.x[i + 1] - self.x[i]);
        let alpha = match &self.easing {
            Easing::Linear => frac,
            Easing::Sine(exponents) => (frac * FRAC_PI_2).sin().powf(exponents[i]),
        };
        if alpha == 0.0 {
            return self.y[i];
        }
        (1.0 - alpha) * self.y[i] + alpha * self.y[i + 1]
    }

    /// Evaluate at day-of-year `1..=year_length`.
    pub fn daily(&self, year_length: u32) -> Vec<f64> {
        (1..=year_length).map(|doy| self.eval(doy as f64)).collect()
    }
}
