//! Coulomb's law and the zero-distance policy shared by both evaluators.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Rounded constant used by the reference output (N·m²/C²).
pub const COULOMB_K_ROUNDED: f64 = 9.0e9;
/// CODATA value of 1/(4πε₀) (N·m²/C²).
pub const COULOMB_K_PRECISE: f64 = 8.987_551_792_3e9;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CoulombConstant {
    #[default]
    Rounded,
    Precise,
}

impl CoulombConstant {
    pub fn value(self) -> f64 {
        match self {
            Self::Rounded => COULOMB_K_ROUNDED,
            Self::Precise => COULOMB_K_PRECISE,
        }
    }
}

/// Field components at offset `(dx, dy)` from a source of strength `kq`
/// (Coulomb's constant already folded in).
///
/// Returns `None` at zero distance: a source contributes nothing at its own
/// coordinates.
#[inline]
pub fn contribution(dx: f64, dy: f64, kq: f64) -> Option<(f64, f64)> {
    let r = (dx * dx + dy * dy).sqrt();
    if r == 0.0 {
        return None;
    }
    let e = kq / (r * r);
    Some((e * (dx / r), e * (dy / r)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_distance_is_skipped() {
        assert_eq!(contribution(0.0, 0.0, 1.0), None);
        assert_eq!(contribution(-0.0, 0.0, 1.0), None);
    }

    #[test]
    fn unit_distance_gives_kq() {
        let (ex, ey) = contribution(1.0, 0.0, COULOMB_K_ROUNDED).unwrap();
        assert_relative_eq!(ex, 9.0e9, max_relative = 1e-12);
        assert_eq!(ey, 0.0);
    }

    #[test]
    fn constant_round_trips_through_its_name() {
        let parsed: CoulombConstant = "precise".parse().unwrap();
        assert_eq!(parsed, CoulombConstant::Precise);
        assert_eq!(CoulombConstant::Rounded.to_string(), "rounded");
    }
}
