use chrono::{Datelike, NaiveDate};
use log::info;

use crate::calendar::{Calendar, DailySeries};
use crate::config::VegetationConfig;
use crate::error::Result;
use crate::multi_year::expand_lai;
use crate::root_density::{RootProfile, RootProfileGenerator, SoilLayerGeometry};
use crate::stand::StandField;

// Daily vegetation forcing for the solver: LAI, stand properties and root distribution
#[derive(Debug, Clone, PartialEq)]
pub struct VegetationForcing {
    pub lai: DailySeries,             // Leaf area index [m2/m2]
    pub height: DailySeries,          // Canopy height [m]
    pub stem_area_index: DailySeries, // Stem area index [m2/m2]
    pub canopy_density: DailySeries,  // Canopy density [-]
    pub geometry: SoilLayerGeometry,  // Layers the root profiles refer to
    pub root_profiles: Vec<RootProfile>, // One relative root density profile per simulated year
    first_year: i32,
}

impl VegetationForcing {
    pub fn root_profile(&self, year: i32) -> Option<&RootProfile> {
        let k = usize::try_from(year - self.first_year).ok()?;
        self.root_profiles.get(k)
    }

    // Root density of the layer containing depth z [m, negative downward] on `date`
    pub fn get_root_density(&self, date: NaiveDate, z: f64) -> Option<f64> {
        let profile = self.root_profile(date.year())?;
        if z > 0.0 {
            return None;
        }
        let layer = self
            .geometry
            .lower_boundaries()
            .iter()
            .position(|&lower| z >= lower)?;
        profile.values().get(layer).copied()
    }
}

/// Run every generator once for `calendar` and `geometry`.
pub fn synthesize(
    config: &VegetationConfig,
    calendar: &Calendar,
    geometry: &SoilLayerGeometry,
) -> Result<VegetationForcing> {
    let table = config.stand.property_table()?;

    let table_max_lai = table
        .as_ref()
        .map(|t| t.annual(StandField::MaxLai, calendar))
        .transpose()?;
    let lai_model = config.lai.build(table_max_lai)?;
    let interpolator = config.stand.build(Some(&lai_model))?;
    let (root_method, max_root_depth) = config.roots.build()?;

    let stand_series = |field| -> Result<DailySeries> {
        let (anchors, initial) = config.stand.anchors(field, table.as_ref(), calendar)?;
        interpolator.interpolate(calendar, &anchors, initial)
    };

    let forcing = VegetationForcing {
        lai: expand_lai(calendar, &lai_model)?,
        height: stand_series(StandField::Height)?,
        stem_area_index: stand_series(StandField::StemAreaIndex)?,
        canopy_density: stand_series(StandField::CanopyDensity)?,
        root_profiles: RootProfileGenerator::profiles_by_year(
            &root_method,
            &max_root_depth,
            geometry,
            calendar.n_years(),
        )?,
        geometry: geometry.clone(),
        first_year: calendar.start().year(),
    };
    info!(
        "vegetation forcing ready: {} days from {}, {} soil layers",
        calendar.len(),
        calendar.start(),
        geometry.len()
    );
    Ok(forcing)
}
