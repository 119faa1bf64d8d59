//! Daily vegetation forcing for a soil water balance solver.
//!
//! Turns sparse phenology and stand parameters into gap-free daily series
//! (leaf area index, canopy height, stem area index, canopy density) and
//! turns rooting parameters into a relative root density per soil layer.

mod annual;
mod calendar;
pub mod config;
mod error;
mod forcing;
mod multi_year;
mod root_density;
mod seasonal_lai;
mod shape_curve;
mod stand;

pub use annual::AnnualParam;
pub use calendar::{Calendar, DailySeries, YearSpan, year_length};
pub use config::VegetationConfig;
pub use error::{Result, VegError};
pub use forcing::{VegetationForcing, synthesize};
pub use multi_year::{LaiModel, expand_lai};
pub use root_density::{
    RootMethod, RootProfile, RootProfileGenerator, SoilLayerGeometry, beta_cumulative,
    linear_density_at,
};
pub use seasonal_lai::SeasonalLai;
pub use shape_curve::{Easing, ShapeCurve};
pub use stand::{
    StandField, StandInterpolation, StandPropertyInterpolator, StandPropertyTable, StandRow,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let calendar = Calendar::from_years(2003, 2005).unwrap();
        let model = LaiModel::FixedPhase {
            budburst_doy: AnnualParam::Scalar(121),
            emergence_days: AnnualParam::Scalar(28),
            leaffall_doy: AnnualParam::Scalar(280),
            shedding_days: AnnualParam::Scalar(58),
            max_lai: AnnualParam::PerYear(vec![4.0, 6.0, 5.0]),
            winter_fraction: AnnualParam::Scalar(0.0),
        };
        let lai = expand_lai(&calendar, &model).unwrap();
        assert_eq!(lai.len(), calendar.len());

        let geometry = SoilLayerGeometry::new(vec![-0.1, -0.2, -0.5, -1.0]).unwrap();
        let roots = RootProfileGenerator::new(RootMethod::BetaModel { beta: 0.97 }, -0.8)
            .unwrap()
            .generate(&geometry)
            .unwrap();
        assert_eq!(roots.len(), geometry.len());
    }
}
