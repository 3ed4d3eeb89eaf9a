//! Direct-summation electrostatics over a sampling grid and over the charges
//! themselves.

pub mod coulomb;
pub mod grid;
pub mod interaction;

use crate::charge::Charge;
use crate::error::FieldResult;

pub use coulomb::{CoulombConstant, COULOMB_K_PRECISE, COULOMB_K_ROUNDED};
pub use grid::{linspace, GridField, SamplingRegion};
pub use interaction::{format_field_values, ChargeFieldReport};

/// Both evaluators bound to one choice of Coulomb's constant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldSolver {
    pub constant: CoulombConstant,
}

impl FieldSolver {
    pub fn new(constant: CoulombConstant) -> Self {
        Self { constant }
    }

    pub fn k(&self) -> f64 {
        self.constant.value()
    }

    pub fn grid(&self, charges: &[Charge], region: &SamplingRegion) -> FieldResult<GridField> {
        grid::superpose_grid(charges, region, self.k())
    }

    pub fn self_fields(&self, charges: &[Charge]) -> FieldResult<Vec<ChargeFieldReport>> {
        interaction::superpose_at_charges(charges, self.k())
    }
}

/// `(Ex, Ey)` on every sample of `region`, rounded Coulomb constant.
pub fn evaluate_grid(charges: &[Charge], region: &SamplingRegion) -> FieldResult<GridField> {
    FieldSolver::default().grid(charges, region)
}

/// Same as [`evaluate_grid`] with the region given as raw bounds.
pub fn evaluate_grid_bounds(
    charges: &[Charge],
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    lres: f64,
) -> FieldResult<GridField> {
    let region = SamplingRegion::new(x1, y1, x2, y2, lres)?;
    evaluate_grid(charges, &region)
}

/// Net `|E|` at each charge from all other charges, input order.
pub fn evaluate_self_fields(charges: &[Charge]) -> FieldResult<Vec<ChargeFieldReport>> {
    FieldSolver::default().self_fields(charges)
}
