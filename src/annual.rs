use serde::Deserialize;

use crate::error::{Result, VegError};

// A parameter that is either the same every simulated year or given year by year
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnnualParam<T> {
    Scalar(T),
    PerYear(Vec<T>),
}

impl<T: Copy> AnnualParam<T> {
    /// Expand to exactly `n_years` values in chronological order.
    ///
    /// A scalar, or a sequence of length one, is broadcast. Any other length
    /// that differs from `n_years` is rejected rather than recycled.
    pub fn resolve(&self, n_years: usize, name: &str) -> Result<Vec<T>> {
        match self {
            AnnualParam::Scalar(v) => Ok(vec![*v; n_years]),
            AnnualParam::PerYear(values) => match values.len() {
                0 => Err(VegError::validation(format!("'{name}' has no values"))),
                1 => Ok(vec![values[0]; n_years]),
                len if len == n_years => Ok(values.clone()),
                len => Err(VegError::validation(format!(
                    "'{name}' has {len} values but the period covers {n_years} years"
                ))),
            },
        }
    }

    /// Value for the 0-based year `k` without allocating. Call `resolve` first
    /// to validate the length.
    pub(crate) fn at(&self, k: usize) -> T {
        match self {
            AnnualParam::Scalar(v) => *v,
            AnnualParam::PerYear(values) if values.len() == 1 => values[0],
            AnnualParam::PerYear(values) => values[k],
        }
    }
}

impl<T> From<T> for AnnualParam<T> {
    fn from(v: T) -> Self {
        AnnualParam::Scalar(v)
    }
}

impl<T> From<Vec<T>> for AnnualParam<T> {
    fn from(values: Vec<T>) -> Self {
        AnnualParam::PerYear(values)
    }
}
