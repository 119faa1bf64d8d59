use log::debug;

use crate::annual::AnnualParam;
use crate::error::{Result, VegError};
use crate::shape_curve::ShapeCurve;

// Soil layers given by their lower boundaries [m], negative downward
#[derive(Debug, Clone, PartialEq)]
pub struct SoilLayerGeometry {
    lower: Vec<f64>,
}

impl SoilLayerGeometry {
    pub fn new(lower: Vec<f64>) -> Result<Self> {
        if lower.is_empty() {
            return Err(VegError::domain("soil layer geometry has no layers"));
        }
        if let Some(&z) = lower.iter().find(|z| !(**z < 0.0)) {
            return Err(VegError::domain(format!(
                "layer lower boundary {z} m is not below the surface"
            )));
        }
        if let Some(w) = lower.windows(2).find(|w| w[1] >= w[0]) {
            return Err(VegError::domain(format!(
                "layer boundaries must get deeper ({} m followed by {} m)",
                w[0], w[1]
            )));
        }
        Ok(SoilLayerGeometry { lower })
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower_boundaries(&self) -> &[f64] {
        &self.lower
    }

    /// Upper boundary of layer `i` [m]; the surface for the first layer.
    pub fn upper(&self, i: usize) -> f64 {
        if i == 0 { 0.0 } else { self.lower[i - 1] }
    }

    /// Layer midpoints as positive depths [m].
    pub fn mid_depths(&self) -> Vec<f64> {
        (0..self.lower.len())
            .map(|i| -0.5 * (self.upper(i) + self.lower[i]))
            .collect()
    }

    /// Deepest boundary as a positive depth [m].
    pub fn total_depth(&self) -> f64 {
        -self.lower[self.lower.len() - 1]
    }
}

/// Relative root length density, one value per soil layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RootProfile {
    densities: Vec<f64>,
}

impl RootProfile {
    pub fn values(&self) -> &[f64] {
        &self.densities
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.densities.iter().sum()
    }

    /// Pair each layer's lower boundary [m] with its density.
    pub fn with_depths<'a>(
        &'a self,
        geometry: &'a SoilLayerGeometry,
    ) -> impl Iterator<Item = (f64, f64)> + 'a {
        geometry
            .lower_boundaries()
            .iter()
            .copied()
            .zip(self.densities.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RootMethod {
    /// Gale & Grigal asymptotic model, cumulative fraction `1 - beta^d` with `d` in cm.
    BetaModel { beta: f64 },
    /// `(depth [m], relative density)` pairs, interpolated at layer midpoints.
    Table { points: Vec<(f64, f64)> },
    /// Falls linearly from `max_density` at the surface to 0 at the rooting depth.
    Linear { max_density: f64 },
    /// `density` in every layer whose midpoint is above the rooting depth.
    Constant { density: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootProfileGenerator {
    method: RootMethod,
    max_root_depth: f64, // [m], negative downward
}

impl RootProfileGenerator {
    pub fn new(method: RootMethod, max_root_depth: f64) -> Result<Self> {
        if !(max_root_depth < 0.0) {
            return Err(VegError::domain(format!(
                "maximum rooting depth {max_root_depth} m is not below the surface"
            )));
        }
        match &method {
            RootMethod::BetaModel { beta } if !(*beta > 0.0 && *beta < 1.0) => {
                return Err(VegError::domain(format!("beta {beta} must lie in (0, 1)")));
            }
            RootMethod::Table { points } if points.is_empty() => {
                return Err(VegError::validation("root density table has no rows"));
            }
            RootMethod::Table { points } => {
                if let Some(&(z, _)) = points.iter().find(|(z, _)| *z > 0.0) {
                    return Err(VegError::domain(format!(
                        "root table depth {z} m is above the surface"
                    )));
                }
            }
            RootMethod::Linear { max_density: d } | RootMethod::Constant { density: d }
                if *d < 0.0 =>
            {
                return Err(VegError::domain(format!("root density {d} is negative")));
            }
            _ => {}
        }
        Ok(RootProfileGenerator {
            method,
            max_root_depth,
        })
    }

    pub fn method(&self) -> &RootMethod {
        &self.method
    }

    pub fn max_root_depth(&self) -> f64 {
        self.max_root_depth
    }

    pub fn generate(&self, geometry: &SoilLayerGeometry) -> Result<RootProfile> {
        let max_depth = -self.max_root_depth;
        if max_depth > geometry.total_depth() {
            return Err(VegError::domain(format!(
                "maximum rooting depth {} m is below the deepest soil layer ({} m)",
                self.max_root_depth,
                -geometry.total_depth()
            )));
        }

        let densities = match &self.method {
            RootMethod::BetaModel { beta } => {
                let max_cm = max_depth * 100.0;
                let mut above = 0.0;
                geometry
                    .lower_boundaries()
                    .iter()
                    .map(|z| {
                        let cum = beta_cumulative((-z * 100.0).min(max_cm), *beta);
                        let density = cum - above;
                        above = cum;
                        density
                    })
                    .collect()
            }
            RootMethod::Table { points } => {
                let mut by_depth: Vec<(f64, f64)> = points.iter().map(|&(z, d)| (-z, d)).collect();
                by_depth.sort_by(|a, b| a.0.total_cmp(&b.0));
                let curve = ShapeCurve::from_table(&by_depth)?;
                geometry
                    .mid_depths()
                    .into_iter()
                    .map(|m| if m > curve.last_x() { 0.0 } else { curve.eval(m) })
                    .collect()
            }
            RootMethod::Linear { max_density } => geometry
                .mid_depths()
                .into_iter()
                .map(|m| linear_density_at(m, *max_density, max_depth))
                .collect(),
            RootMethod::Constant { density } => geometry
                .mid_depths()
                .into_iter()
                .map(|m| if m < max_depth { *density } else { 0.0 })
                .collect(),
        };

        debug!(
            "root profile for {} layers with {:?} down to {} m",
            geometry.len(),
            self.method,
            self.max_root_depth
        );
        Ok(RootProfile { densities })
    }

    /// One profile per simulated year when the rooting depth changes over time.
    pub fn profiles_by_year(
        method: &RootMethod,
        max_root_depth: &AnnualParam<f64>,
        geometry: &SoilLayerGeometry,
        n_years: usize,
    ) -> Result<Vec<RootProfile>> {
        let generators = max_root_depth
            .resolve(n_years, "max_root_depth")?
            .into_iter()
            .map(|depth| RootProfileGenerator::new(method.clone(), depth))
            .collect::<Result<Vec<_>>>()?;
        generators.iter().map(|g| g.generate(geometry)).collect()
    }
}

/// Cumulative root fraction above `depth_cm` (positive, cm) for the beta model.
pub fn beta_cumulative(depth_cm: f64, beta: f64) -> f64 {
    1.0 - beta.powf(depth_cm)
}

/// Linear model density at positive depth `depth` [m] for rooting depth `max_depth` [m].
pub fn linear_density_at(depth: f64, max_density: f64, max_depth: f64) -> f64 {
    if depth >= max_depth {
        0.0
    } else {
        max_density * (1.0 - depth / max_depth)
    }
}
