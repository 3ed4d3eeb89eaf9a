//! Streamline tracing over a computed [`GridField`].
//!
//! Seeds are laid out on a coarse occupancy mask (30 cells per axis at
//! density 1.0) and visited from the boundary inward. Each seed is traced in
//! both directions with RK4 on the normalized, bilinearly interpolated field.
//! A trace ends when it leaves the grid, meets a zero field, gets within one
//! grid spacing of a charge, runs into a mask cell owned by an earlier line,
//! or exhausts its step budget.

use crate::charge::Charge;
use crate::config::MAX_DENSITY;
use crate::solver::GridField;

const MASK_CELLS_PER_DENSITY: f64 = 30.0;
const STEP_PER_SPACING: f64 = 0.25;
const MIN_LENGTH_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Streamline {
    /// Ordered along the field direction.
    pub points: Vec<(f64, f64)>,
}

impl Streamline {
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
            .sum()
    }

    /// Point and unit direction halfway along the line, for an arrowhead.
    pub fn midpoint_direction(&self) -> Option<((f64, f64), (f64, f64))> {
        if self.points.len() < 2 {
            return None;
        }
        let k = (self.points.len() / 2).min(self.points.len() - 2);
        let (a, b) = (self.points[k], self.points[k + 1]);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let len = dx.hypot(dy);
        if len == 0.0 {
            return None;
        }
        Some((a, (dx / len, dy / len)))
    }
}

/// Bilinear view of the grid in data coordinates.
struct FieldSampler<'a> {
    grid: &'a GridField,
    rows: usize,
    cols: usize,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl<'a> FieldSampler<'a> {
    fn new(grid: &'a GridField) -> Option<Self> {
        let (rows, cols) = grid.dims();
        if rows < 2 || cols < 2 {
            return None;
        }
        Some(Self {
            grid,
            rows,
            cols,
            x1: grid.x[(0, 0)],
            y1: grid.y[(0, 0)],
            x2: grid.x[(0, cols - 1)],
            y2: grid.y[(rows - 1, 0)],
        })
    }

    fn spacing(&self) -> f64 {
        let dx = (self.x2 - self.x1) / (self.cols - 1) as f64;
        let dy = (self.y2 - self.y1) / (self.rows - 1) as f64;
        dx.max(dy)
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    fn sample(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = ((x - self.x1) / (self.x2 - self.x1) * (self.cols - 1) as f64)
            .clamp(0.0, (self.cols - 1) as f64);
        let fy = ((y - self.y1) / (self.y2 - self.y1) * (self.rows - 1) as f64)
            .clamp(0.0, (self.rows - 1) as f64);

        let i0 = (fx.floor() as usize).min(self.cols - 2);
        let j0 = (fy.floor() as usize).min(self.rows - 2);
        let tx = fx - i0 as f64;
        let ty = fy - j0 as f64;

        let lerp = |m: &nalgebra::DMatrix<f64>| {
            let a = m[(j0, i0)] * (1.0 - tx) + m[(j0, i0 + 1)] * tx;
            let b = m[(j0 + 1, i0)] * (1.0 - tx) + m[(j0 + 1, i0 + 1)] * tx;
            a * (1.0 - ty) + b * ty
        };
        (lerp(&self.grid.ex), lerp(&self.grid.ey))
    }

    /// Unit field direction, `None` where the field vanishes.
    fn direction(&self, x: f64, y: f64, sign: f64) -> Option<(f64, f64)> {
        let (ex, ey) = self.sample(x, y);
        let mag = ex.hypot(ey);
        if mag == 0.0 || !mag.is_finite() {
            return None;
        }
        Some((sign * ex / mag, sign * ey / mag))
    }

    fn rk4_step(&self, x: f64, y: f64, h: f64, sign: f64) -> Option<(f64, f64)> {
        let (k1x, k1y) = self.direction(x, y, sign)?;
        let (k2x, k2y) = self.direction(x + 0.5 * h * k1x, y + 0.5 * h * k1y, sign)?;
        let (k3x, k3y) = self.direction(x + 0.5 * h * k2x, y + 0.5 * h * k2y, sign)?;
        let (k4x, k4y) = self.direction(x + h * k3x, y + h * k3y, sign)?;
        let dx = (k1x + 2.0 * k2x + 2.0 * k3x + k4x) / 6.0;
        let dy = (k1y + 2.0 * k2y + 2.0 * k3y + k4y) / 6.0;
        Some((x + h * dx, y + h * dy))
    }
}

/// Coarse occupancy grid that keeps streamlines apart.
struct StreamMask {
    nx: usize,
    ny: usize,
    owned: Vec<bool>,
}

impl StreamMask {
    fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            owned: vec![false; nx * ny],
        }
    }

    fn cell_of(&self, s: &FieldSampler, x: f64, y: f64) -> usize {
        let cx = ((x - s.x1) / (s.x2 - s.x1) * self.nx as f64) as usize;
        let cy = ((y - s.y1) / (s.y2 - s.y1) * self.ny as f64) as usize;
        cy.min(self.ny - 1) * self.nx + cx.min(self.nx - 1)
    }

    fn center(&self, s: &FieldSampler, cx: usize, cy: usize) -> (f64, f64) {
        (
            s.x1 + (cx as f64 + 0.5) / self.nx as f64 * (s.x2 - s.x1),
            s.y1 + (cy as f64 + 0.5) / self.ny as f64 * (s.y2 - s.y1),
        )
    }
}

/// Mask cells ordered from the outer ring inward.
fn spiral_order(nx: usize, ny: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(nx * ny);
    let (mut left, mut right) = (0_i64, nx as i64 - 1);
    let (mut bottom, mut top) = (0_i64, ny as i64 - 1);

    while left <= right && bottom <= top {
        for x in left..=right {
            out.push((x, bottom));
        }
        for y in bottom + 1..=top {
            out.push((right, y));
        }
        if bottom < top {
            for x in (left..right).rev() {
                out.push((x, top));
            }
        }
        if left < right {
            for y in (bottom + 1..top).rev() {
                out.push((left, y));
            }
        }
        left += 1;
        right -= 1;
        bottom += 1;
        top -= 1;
    }

    out.into_iter()
        .map(|(x, y)| (x as usize, y as usize))
        .collect()
}

pub fn trace_streamlines(
    grid: &GridField,
    charges: &[Charge],
    density: f64,
    max_steps: usize,
) -> Vec<Streamline> {
    let Some(sampler) = FieldSampler::new(grid) else {
        return Vec::new();
    };

    let cells = (MASK_CELLS_PER_DENSITY * density.min(MAX_DENSITY)).round().max(1.0) as usize;
    let mut mask = StreamMask::new(cells, cells);
    let spacing = sampler.spacing();
    let h = STEP_PER_SPACING * spacing;
    let min_length =
        MIN_LENGTH_FRACTION * (sampler.x2 - sampler.x1).min(sampler.y2 - sampler.y1);

    let near_charge = |x: f64, y: f64| {
        charges
            .iter()
            .any(|c| (x - c.x).hypot(y - c.y) < spacing)
    };

    let mut lines = Vec::new();
    for (cx, cy) in spiral_order(mask.nx, mask.ny) {
        let seed_cell = cy * mask.nx + cx;
        if mask.owned[seed_cell] {
            continue;
        }
        let seed = mask.center(&sampler, cx, cy);
        if near_charge(seed.0, seed.1) {
            continue;
        }

        let mut claimed = vec![seed_cell];
        let mut walk = |sign: f64| {
            let mut pts = Vec::new();
            let (mut x, mut y) = seed;
            let mut current = seed_cell;
            for _ in 0..max_steps {
                let Some((nx, ny)) = sampler.rk4_step(x, y, h, sign) else {
                    break;
                };
                if !sampler.contains(nx, ny) || near_charge(nx, ny) {
                    break;
                }
                let cell = mask.cell_of(&sampler, nx, ny);
                if cell != current {
                    if mask.owned[cell] || claimed.contains(&cell) {
                        break;
                    }
                    claimed.push(cell);
                    current = cell;
                }
                x = nx;
                y = ny;
                pts.push((x, y));
            }
            pts
        };

        let backward = walk(-1.0);
        let forward = walk(1.0);

        let mut points: Vec<(f64, f64)> = backward.into_iter().rev().collect();
        points.push(seed);
        points.extend(forward);

        let line = Streamline { points };
        if line.points.len() >= 2 && line.length() >= min_length {
            for cell in claimed {
                mask.owned[cell] = true;
            }
            lines.push(line);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spiral_visits_every_cell_once() {
        for (nx, ny) in [(1, 1), (2, 2), (3, 5), (6, 4)] {
            let mut order = spiral_order(nx, ny);
            assert_eq!(order.len(), nx * ny);
            order.sort();
            order.dedup();
            assert_eq!(order.len(), nx * ny);
        }
    }

    #[test]
    fn spiral_starts_on_the_boundary() {
        let order = spiral_order(4, 4);
        assert_eq!(order[0], (0, 0));
        assert_eq!(order.last(), Some(&(1, 2)));
    }
}
