use crate::charge::{validate_charges, Charge};
use crate::error::FieldResult;
use crate::util::{fmt_float, fmt_sci};
use serde::Serialize;

use super::coulomb::contribution;

/// Net field strength felt by one charge from all the others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargeFieldReport {
    pub index: usize,
    pub charge: Charge,
    pub magnitude: f64,
}

impl ChargeFieldReport {
    /// `Charge at (x, y): |E| = 9.00e+09 N/C`
    pub fn describe(&self) -> String {
        format!(
            "Charge at ({}, {}): |E| = {} N/C",
            fmt_float(self.charge.x),
            fmt_float(self.charge.y),
            fmt_sci(self.magnitude, 2)
        )
    }
}

/// Sources enter with `|q|`, so the result is an unsigned strength figure
/// rather than the signed superposition used on the grid.
pub(crate) fn superpose_at_charges(
    charges: &[Charge],
    k: f64,
) -> FieldResult<Vec<ChargeFieldReport>> {
    validate_charges(charges)?;

    let reports = charges
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut total_x = 0.0;
            let mut total_y = 0.0;
            for (j, other) in charges.iter().enumerate() {
                if j == i {
                    continue;
                }
                let source = k * other.q.abs();
                if let Some((ex, ey)) = contribution(c.x - other.x, c.y - other.y, source) {
                    total_x += ex;
                    total_y += ey;
                }
            }
            ChargeFieldReport {
                index: i,
                charge: *c,
                magnitude: (total_x * total_x + total_y * total_y).sqrt(),
            }
        })
        .collect();

    Ok(reports)
}

/// One display line per report, input order.
pub fn format_field_values(reports: &[ChargeFieldReport]) -> Vec<String> {
    reports.iter().map(ChargeFieldReport::describe).collect()
}
