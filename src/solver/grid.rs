use crate::charge::{validate_charges, Charge};
use crate::error::{FieldError, FieldResult};
use nalgebra::DMatrix;
use serde::Serialize;

use super::coulomb::contribution;

/// Rectangular sampling window plus a linear resolution (samples per unit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingRegion {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    lres: f64,
}

impl Default for SamplingRegion {
    /// `[-6, 6] x [-6, 6]` at 10 samples per unit: a 120 x 120 grid.
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

impl SamplingRegion {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, lres: f64) -> FieldResult<Self> {
        for (name, v) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2), ("lres", lres)] {
            if !v.is_finite() {
                return Err(FieldError::InvalidRegion(format!(
                    "{} must be finite, got {}",
                    name, v
                )));
            }
        }
        if x2 <= x1 || y2 <= y1 {
            return Err(FieldError::InvalidRegion(format!(
                "bounds must satisfy x1 < x2 and y1 < y2, got ({}, {}) .. ({}, {})",
                x1, y1, x2, y2
            )));
        }
        if lres <= 0.0 {
            return Err(FieldError::InvalidRegion(format!(
                "lres must be positive, got {}",
                lres
            )));
        }

        let region = Self {
            x1,
            y1,
            x2,
            y2,
            lres,
        };
        let (rows, cols) = region.dims();
        if rows == 0 || cols == 0 {
            return Err(FieldError::InvalidRegion(format!(
                "resolution {} yields an empty {}x{} grid",
                lres, rows, cols
            )));
        }
        Ok(region)
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    pub fn lres(&self) -> f64 {
        self.lres
    }

    /// `(m, n)`: rows follow y, columns follow x.
    pub fn dims(&self) -> (usize, usize) {
        let rows = (self.lres * (self.y2 - self.y1)).round() as usize;
        let cols = (self.lres * (self.x2 - self.x1)).round() as usize;
        (rows, cols)
    }

    pub fn point_count(&self) -> usize {
        let (m, n) = self.dims();
        m.saturating_mul(n)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    pub fn x_values(&self) -> Vec<f64> {
        linspace(self.x1, self.x2, self.dims().1)
    }

    pub fn y_values(&self) -> Vec<f64> {
        linspace(self.y1, self.y2, self.dims().0)
    }
}

/// Evenly spaced samples over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// Meshgrid-style coordinates and field components, all shaped `(m, n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
    pub ex: DMatrix<f64>,
    pub ey: DMatrix<f64>,
}

impl GridField {
    pub fn dims(&self) -> (usize, usize) {
        self.ex.shape()
    }

    pub fn magnitude(&self, row: usize, col: usize) -> f64 {
        self.ex[(row, col)].hypot(self.ey[(row, col)])
    }

    /// Largest `|E|` over all samples; `0.0` for an empty or field-free grid.
    pub fn max_magnitude(&self) -> f64 {
        let (m, n) = self.dims();
        let mut peak = 0.0_f64;
        for j in 0..m {
            for i in 0..n {
                peak = peak.max(self.magnitude(j, i));
            }
        }
        peak
    }

    pub fn is_finite(&self) -> bool {
        self.ex.iter().chain(self.ey.iter()).all(|v| v.is_finite())
    }
}

/// Direct superposition of every charge's Coulomb field at every sample.
pub(crate) fn superpose_grid(
    charges: &[Charge],
    region: &SamplingRegion,
    k: f64,
) -> FieldResult<GridField> {
    validate_charges(charges)?;

    let xs = region.x_values();
    let ys = region.y_values();
    let (m, n) = (ys.len(), xs.len());

    let x = DMatrix::from_fn(m, n, |_, i| xs[i]);
    let y = DMatrix::from_fn(m, n, |j, _| ys[j]);
    let mut ex = DMatrix::zeros(m, n);
    let mut ey = DMatrix::zeros(m, n);

    for j in 0..m {
        for i in 0..n {
            let (px, py) = (xs[i], ys[j]);
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for c in charges {
                if let Some((cx, cy)) = contribution(px - c.x, py - c.y, k * c.q) {
                    sum_x += cx;
                    sum_y += cy;
                }
            }
            ex[(j, i)] = sum_x;
            ey[(j, i)] = sum_y;
        }
    }

    Ok(GridField { x, y, ex, ey })
}
