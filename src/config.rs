use crate::error::{FieldError, FieldResult};
use crate::solver::{CoulombConstant, SamplingRegion};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Keeps the streamline mask at no more than 600 x 600 cells.
pub const MAX_DENSITY: f64 = 20.0;
pub const MAX_STEPS: usize = 100_000;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub region: RegionParams,
    #[command(flatten)]
    pub solver: SolverParams,
    #[command(flatten)]
    pub render: RenderParams,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionParams {
    #[arg(long, default_value_t = -6.0, allow_negative_numbers = true)]
    pub x1: f64,
    #[arg(long, default_value_t = -6.0, allow_negative_numbers = true)]
    pub y1: f64,
    #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
    pub x2: f64,
    #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
    pub y2: f64,
    /// Samples per unit length
    #[arg(long, default_value_t = 10.0)]
    pub lres: f64,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            x1: -6.0,
            y1: -6.0,
            x2: 6.0,
            y2: 6.0,
            lres: 10.0,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// `rounded` (9e9) or `precise` (8.9875517923e9)
    #[arg(long, default_value_t = CoulombConstant::Rounded)]
    pub coulomb: CoulombConstant,
    #[arg(long, default_value_t = 4_000_000)]
    pub max_grid_points: usize,
    #[arg(long, default_value_t = 10_000)]
    pub max_charges: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            coulomb: CoulombConstant::Rounded,
            max_grid_points: 4_000_000,
            max_charges: 10_000,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    #[arg(long, default_value_t = 480)]
    pub height: u32,
    /// Streamline density; 1.0 gives a 30x30 seeding mask
    #[arg(long, default_value_t = 1.5)]
    pub density: f64,
    #[arg(long, default_value_t = 1.0)]
    pub line_width: f64,
    /// Marker area in pt² per unit of |q|
    #[arg(long, default_value_t = 50.0)]
    pub marker_scale: f64,
    /// Integration steps per streamline direction
    #[arg(long, default_value_t = 2000)]
    pub max_steps: usize,
    #[arg(long, default_value = "Electrostatic Field Simulation")]
    pub title: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            density: 1.5,
            line_width: 1.0,
            marker_scale: 50.0,
            max_steps: 2000,
            title: "Electrostatic Field Simulation".to_string(),
        }
    }
}

impl RegionParams {
    pub fn to_region(&self) -> FieldResult<SamplingRegion> {
        SamplingRegion::new(self.x1, self.y1, self.x2, self.y2, self.lres)
    }
}

impl RenderParams {
    pub fn validate(&self) -> FieldResult<()> {
        if self.width < 16 || self.height < 16 {
            return Err(FieldError::Config(format!(
                "image must be at least 16x16 px, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.density.is_finite() && self.density > 0.0 && self.density <= MAX_DENSITY) {
            return Err(FieldError::Config(format!(
                "density must be in (0, {}], got {}",
                MAX_DENSITY, self.density
            )));
        }
        if self.max_steps > MAX_STEPS {
            return Err(FieldError::Config(format!(
                "max_steps must be at most {}, got {}",
                MAX_STEPS, self.max_steps
            )));
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return Err(FieldError::Config(format!(
                "line_width must be non-negative, got {}",
                self.line_width
            )));
        }
        if !(self.marker_scale.is_finite() && self.marker_scale >= 0.0) {
            return Err(FieldError::Config(format!(
                "marker_scale must be non-negative, got {}",
                self.marker_scale
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FieldResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FieldError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every value the user typed on the command line over `self`,
    /// leaving file-provided values where only clap defaults exist.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(region.x1);
        update_if_present!(region.y1);
        update_if_present!(region.x2);
        update_if_present!(region.y2);
        update_if_present!(region.lres);

        update_if_present!(solver.coulomb);
        update_if_present!(solver.max_grid_points);
        update_if_present!(solver.max_charges);

        update_if_present!(render.width);
        update_if_present!(render.height);
        update_if_present!(render.density);
        update_if_present!(render.line_width);
        update_if_present!(render.marker_scale);
        update_if_present!(render.max_steps);
        update_if_present!(render.title);
    }
}
