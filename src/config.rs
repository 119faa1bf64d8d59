/*!
Configuration of a vegetation setup, read from TOML text.

Method selectors are plain strings in the text and are turned into typed
models once, when the config is built. Optional parameters fall back to the
defaults below.

```toml
[lai]
method = "b90"            # "b90" | "linear" | "coupmodel"
max_lai = [4.0, 6.0, 5.0]
budburst_doy = 121
leaffall_doy = 280

[stand]
method = "linear"         # "constant" | "linear"
growth_period = true
height = [20.0, 22.0, 23.0]
height_initial = 19.0
stem_area_index = 1.0
canopy_density = 0.9

[roots]
method = "betamodel"      # "betamodel" | "table" | "linear" | "constant"
max_root_depth = -1.2
beta = 0.97
```
*/
use serde::Deserialize;

use crate::annual::AnnualParam;
use crate::calendar::Calendar;
use crate::error::{Result, VegError};
use crate::multi_year::LaiModel;
use crate::root_density::RootMethod;
use crate::stand::{
    StandField, StandInterpolation, StandPropertyInterpolator, StandPropertyTable, StandRow,
};

pub const DEFAULT_EMERGENCE_DAYS: u32 = 28;
pub const DEFAULT_SHEDDING_DAYS: u32 = 58;
pub const DEFAULT_WINTER_FRACTION: f64 = 0.0;
pub const DEFAULT_SHAPE_EXPONENT: f64 = 1.0;
pub const DEFAULT_MIN_LAI: f64 = 0.0;
pub const DEFAULT_BETA: f64 = 0.97;
pub const DEFAULT_MAX_ROOT_DENSITY: f64 = 1.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VegetationConfig {
    pub lai: LaiConfig,
    pub stand: StandConfig,
    pub roots: RootConfig,
}

impl VegetationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaiConfig {
    pub method: String,
    pub max_lai: Option<AnnualParam<f64>>,
    // b90
    pub budburst_doy: Option<AnnualParam<u32>>,
    pub emergence_days: Option<AnnualParam<u32>>,
    pub leaffall_doy: Option<AnnualParam<u32>>,
    pub shedding_days: Option<AnnualParam<u32>>,
    pub winter_fraction: Option<AnnualParam<f64>>,
    // linear
    pub table: Option<Vec<(u32, f64)>>, // (doy, fraction of max_lai)
    // coupmodel
    pub incr_start_doy: Option<AnnualParam<u32>>,
    pub peak_doy: Option<AnnualParam<u32>>,
    pub decline_end_doy: Option<AnnualParam<u32>>,
    pub shape_incr: Option<AnnualParam<f64>>,
    pub shape_decr: Option<AnnualParam<f64>>,
    pub min_lai: Option<AnnualParam<f64>>,
}

impl LaiConfig {
    /// Build the typed model. `max_lai_override`, when given (from a stand
    /// table), replaces `max_lai` and makes the `[lai]` entry optional.
    pub fn build(&self, max_lai_override: Option<AnnualParam<f64>>) -> Result<LaiModel> {
        let max_lai = || match &max_lai_override {
            Some(values) => Ok(values.clone()),
            None => required(&self.max_lai, "lai", "max_lai"),
        };
        match self.method.to_lowercase().as_str() {
            "b90" | "fixed-phase" => Ok(LaiModel::FixedPhase {
                budburst_doy: required(&self.budburst_doy, "lai", "budburst_doy")?,
                emergence_days: or_default(&self.emergence_days, DEFAULT_EMERGENCE_DAYS),
                leaffall_doy: required(&self.leaffall_doy, "lai", "leaffall_doy")?,
                shedding_days: or_default(&self.shedding_days, DEFAULT_SHEDDING_DAYS),
                max_lai: max_lai()?,
                winter_fraction: or_default(&self.winter_fraction, DEFAULT_WINTER_FRACTION),
            }),
            "linear" | "table" | "table-interpolated" => Ok(LaiModel::Table {
                points: self
                    .table
                    .clone()
                    .ok_or_else(|| missing("lai", "table"))?,
                max_lai: max_lai()?,
            }),
            "coupmodel" | "sigmoid-blend" => Ok(LaiModel::SigmoidBlend {
                incr_start_doy: required(&self.incr_start_doy, "lai", "incr_start_doy")?,
                peak_doy: required(&self.peak_doy, "lai", "peak_doy")?,
                decline_end_doy: required(&self.decline_end_doy, "lai", "decline_end_doy")?,
                shape_incr: or_default(&self.shape_incr, DEFAULT_SHAPE_EXPONENT),
                shape_decr: or_default(&self.shape_decr, DEFAULT_SHAPE_EXPONENT),
                min_lai: or_default(&self.min_lai, DEFAULT_MIN_LAI),
                max_lai: max_lai()?,
            }),
            other => Err(VegError::config(format!("unknown LAI method '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandConfig {
    pub method: String,
    #[serde(default)]
    pub growth_period: bool,
    pub start_doy: Option<AnnualParam<u32>>,
    pub end_doy: Option<AnnualParam<u32>>,
    pub height: Option<AnnualParam<f64>>,
    pub height_initial: Option<f64>,
    pub stem_area_index: Option<AnnualParam<f64>>,
    pub sai_initial: Option<f64>,
    pub canopy_density: Option<AnnualParam<f64>>,
    pub density_initial: Option<f64>,
    pub table: Option<Vec<StandRow>>,
}

impl StandConfig {
    /// Build the interpolator. With `growth_period` and no explicit window the
    /// budburst and leaf-fall days of a fixed-phase LAI model are used.
    pub fn build(&self, lai: Option<&LaiModel>) -> Result<StandPropertyInterpolator> {
        let method = match (self.method.to_lowercase().as_str(), self.growth_period) {
            ("constant" | "step", false) => StandInterpolation::Step,
            ("constant" | "step", true) => {
                return Err(VegError::config(
                    "[stand] growth_period requires method = \"linear\"",
                ));
            }
            ("linear", false) => StandInterpolation::Linear,
            ("linear", true) => {
                let fallback = match lai {
                    Some(LaiModel::FixedPhase {
                        budburst_doy,
                        leaffall_doy,
                        ..
                    }) => Some((budburst_doy, leaffall_doy)),
                    _ => None,
                };
                let start_doy = self
                    .start_doy
                    .clone()
                    .or_else(|| fallback.map(|f| f.0.clone()))
                    .ok_or_else(|| missing("stand", "start_doy"))?;
                let end_doy = self
                    .end_doy
                    .clone()
                    .or_else(|| fallback.map(|f| f.1.clone()))
                    .ok_or_else(|| missing("stand", "end_doy"))?;
                StandInterpolation::GrowthPeriod { start_doy, end_doy }
            }
            (other, _) => {
                return Err(VegError::config(format!(
                    "unknown stand interpolation method '{other}'"
                )));
            }
        };
        Ok(StandPropertyInterpolator::new(method))
    }

    pub fn property_table(&self) -> Result<Option<StandPropertyTable>> {
        self.table
            .clone()
            .map(StandPropertyTable::new)
            .transpose()
    }

    /// Annual anchors and pre-period value for one property. A stand table,
    /// when present, takes precedence over the scalar/vector entry.
    pub fn anchors(
        &self,
        field: StandField,
        table: Option<&StandPropertyTable>,
        calendar: &Calendar,
    ) -> Result<(AnnualParam<f64>, Option<f64>)> {
        let (value, initial, name) = match field {
            StandField::Height => (&self.height, self.height_initial, "height"),
            StandField::StemAreaIndex => (&self.stem_area_index, self.sai_initial, "stem_area_index"),
            StandField::CanopyDensity => (&self.canopy_density, self.density_initial, "canopy_density"),
            StandField::MaxLai | StandField::Age => {
                return Err(VegError::config(format!(
                    "{field:?} is not an interpolated stand property"
                )));
            }
        };
        let anchors = match table {
            Some(table) => table.annual(field, calendar)?,
            None => required(value, "stand", name)?,
        };
        Ok((anchors, initial))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RootConfig {
    pub method: String,
    pub max_root_depth: Option<AnnualParam<f64>>, // [m], negative downward
    pub beta: Option<f64>,
    pub table: Option<Vec<(f64, f64)>>, // (depth [m], relative density)
    pub max_density: Option<f64>,
}

impl RootConfig {
    pub fn build(&self) -> Result<(RootMethod, AnnualParam<f64>)> {
        let method = match self.method.to_lowercase().as_str() {
            "betamodel" | "beta" => RootMethod::BetaModel {
                beta: self.beta.unwrap_or(DEFAULT_BETA),
            },
            "table" => RootMethod::Table {
                points: self.table.clone().ok_or_else(|| missing("roots", "table"))?,
            },
            "linear" => RootMethod::Linear {
                max_density: self.max_density.unwrap_or(DEFAULT_MAX_ROOT_DENSITY),
            },
            "constant" => RootMethod::Constant {
                density: self.max_density.unwrap_or(DEFAULT_MAX_ROOT_DENSITY),
            },
            other => {
                return Err(VegError::config(format!("unknown root density method '{other}'")));
            }
        };
        let depth = required(&self.max_root_depth, "roots", "max_root_depth")?;
        Ok((method, depth))
    }
}

fn missing(section: &str, name: &str) -> VegError {
    VegError::config(format!("[{section}] is missing required parameter '{name}'"))
}

fn required<T: Clone>(value: &Option<T>, section: &str, name: &str) -> Result<T> {
    value.clone().ok_or_else(|| missing(section, name))
}

fn or_default<T: Clone>(value: &Option<AnnualParam<T>>, default: T) -> AnnualParam<T> {
    value.clone().unwrap_or(AnnualParam::Scalar(default))
}
