use crate::charge::{parse_charge_form, validate_charges, Charge};
use crate::config::Config;
use crate::error::{FieldError, FieldResult};
use crate::render::{render_plot, RenderedImage};
use crate::solver::{
    format_field_values, ChargeFieldReport, FieldSolver, GridField, SamplingRegion,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Everything one request produces. Owns its arrays; nothing is shared
/// between runs.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub charges: Vec<Charge>,
    pub region: SamplingRegion,
    pub grid: GridField,
    pub reports: Vec<ChargeFieldReport>,
    pub field_values: Vec<String>,
    pub image: RenderedImage,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub charge_count: usize,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub peak_grid_field: f64,
    pub reports: Vec<ChargeFieldReport>,
    pub field_values: Vec<String>,
    pub image_mime: String,
    pub image_base64: String,
}

impl Simulation {
    pub fn summary(&self) -> SimulationSummary {
        let (rows, cols) = self.grid.dims();
        SimulationSummary {
            charge_count: self.charges.len(),
            grid_rows: rows,
            grid_cols: cols,
            peak_grid_field: self.grid.max_magnitude(),
            reports: self.reports.clone(),
            field_values: self.field_values.clone(),
            image_mime: self.image.format.mime().to_string(),
            image_base64: self.image.to_base64(),
        }
    }
}

/// Input and size checks that must pass before any work starts.
pub fn check_limits(
    charges: &[Charge],
    region: &SamplingRegion,
    config: &Config,
) -> FieldResult<()> {
    validate_charges(charges)?;
    if charges.len() > config.solver.max_charges {
        return Err(FieldError::InvalidInput(format!(
            "{} charges exceed the limit of {}",
            charges.len(),
            config.solver.max_charges
        )));
    }
    let points = region.point_count();
    if points > config.solver.max_grid_points {
        let (m, n) = region.dims();
        return Err(FieldError::InvalidRegion(format!(
            "{}x{} grid ({} points) exceeds the limit of {}",
            m, n, points, config.solver.max_grid_points
        )));
    }
    config.render.validate()
}

/// Solves the grid and per-charge fields, formats the report lines and
/// renders the plot.
pub fn simulate(charges: &[Charge], config: &Config) -> FieldResult<Simulation> {
    let region = config.region.to_region()?;
    check_limits(charges, &region, config)?;

    let solver = FieldSolver::new(config.solver.coulomb);
    let (m, n) = region.dims();
    info!(
        "Solving {} charges on a {}x{} grid (k = {})",
        charges.len(),
        m,
        n,
        solver.constant
    );

    let grid = solver.grid(charges, &region)?;
    let reports = solver.self_fields(charges)?;
    let field_values = format_field_values(&reports);
    debug!("Peak grid field {:.3e} N/C", grid.max_magnitude());

    let image = render_plot(charges, &region, &grid, &config.render)?;

    Ok(Simulation {
        charges: charges.to_vec(),
        region,
        grid,
        reports,
        field_values,
        image,
    })
}

/// [`simulate`] fed from form fields (`num_charges`, `x0`, `y0`, `q0`, ...).
pub fn simulate_form(fields: &HashMap<String, String>, config: &Config) -> FieldResult<Simulation> {
    let charges = parse_charge_form(fields)?;
    simulate(&charges, config)
}
