use crate::error::{FieldError, FieldResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// A planar point charge. Magnitude is signed, in arbitrary charge units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub x: f64,
    pub y: f64,
    pub q: f64,
}

impl Charge {
    pub const fn new(x: f64, y: f64, q: f64) -> Self {
        Self { x, y, q }
    }

    /// Marker colour rule: zero counts as non-positive.
    pub fn is_positive(&self) -> bool {
        self.q > 0.0
    }

    fn check(&self, index: usize) -> FieldResult<()> {
        for (name, value) in [("x", self.x), ("y", self.y), ("q", self.q)] {
            if !value.is_finite() {
                return Err(FieldError::InvalidInput(format!(
                    "charge {}: field '{}' is not a finite number ({})",
                    index, name, value
                )));
            }
        }
        Ok(())
    }
}

/// `"x,y,q"` as used by `--charge` on the command line.
impl FromStr for Charge {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return Err(FieldError::InvalidInput(format!(
                "expected 'x,y,q' but got '{}'",
                s
            )));
        }
        let mut values = [0.0; 3];
        for (slot, (name, raw)) in values.iter_mut().zip(["x", "y", "q"].iter().zip(parts)) {
            *slot = parse_number(raw, || format!("'{}' in '{}'", name, s))?;
        }
        let charge = Charge::new(values[0], values[1], values[2]);
        charge.check(0)?;
        Ok(charge)
    }
}

/// Rejects non-finite coordinates or magnitudes, naming the first offender.
pub fn validate_charges(charges: &[Charge]) -> FieldResult<()> {
    charges
        .iter()
        .enumerate()
        .try_for_each(|(i, c)| c.check(i))
}

/// Zips parallel coordinate/magnitude columns into charges.
///
/// `count` is the number of charges the caller claims to supply; every column
/// must hold exactly that many values.
pub fn charges_from_columns(
    count: usize,
    xs: &[f64],
    ys: &[f64],
    qs: &[f64],
) -> FieldResult<Vec<Charge>> {
    for (name, column) in [("x", xs), ("y", ys), ("q", qs)] {
        if column.len() != count {
            return Err(FieldError::InvalidInput(format!(
                "charge count is {} but {} '{}' values were supplied",
                count,
                column.len(),
                name
            )));
        }
    }

    let charges: Vec<Charge> = (0..count)
        .map(|i| Charge::new(xs[i], ys[i], qs[i]))
        .collect();
    validate_charges(&charges)?;
    Ok(charges)
}

/// Reads the form layout `num_charges`, `x0`, `y0`, `q0`, `x1`, ...
pub fn parse_charge_form(fields: &HashMap<String, String>) -> FieldResult<Vec<Charge>> {
    let raw_count = fields
        .get("num_charges")
        .ok_or_else(|| FieldError::InvalidInput("missing field 'num_charges'".to_string()))?;

    let count: usize = raw_count.trim().parse().map_err(|_| {
        FieldError::InvalidInput(format!(
            "'num_charges' must be a non-negative integer, got '{}'",
            raw_count
        ))
    })?;

    let mut charges = Vec::with_capacity(count);
    for i in 0..count {
        let mut values = [0.0; 3];
        for (slot, name) in values.iter_mut().zip(["x", "y", "q"]) {
            let key = format!("{}{}", name, i);
            let raw = fields.get(&key).ok_or_else(|| {
                FieldError::InvalidInput(format!("charge {}: missing field '{}'", i, key))
            })?;
            *slot = parse_number(raw, || format!("charge {}: field '{}'", i, key))?;
        }
        let charge = Charge::new(values[0], values[1], values[2]);
        charge.check(i)?;
        charges.push(charge);
    }

    Ok(charges)
}

fn parse_number(raw: &str, context: impl Fn() -> String) -> FieldResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        FieldError::InvalidInput(format!("{} is not numeric ('{}')", context(), raw))
    })?;
    if !value.is_finite() {
        return Err(FieldError::InvalidInput(format!(
            "{} is not a finite number ('{}')",
            context(),
            raw
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_triple() {
        let c: Charge = " 1.5, -2 ,3e-1".parse().unwrap();
        assert_eq!(c, Charge::new(1.5, -2.0, 0.3));
    }

    #[test]
    fn rejects_short_triple() {
        let err = "1,2".parse::<Charge>().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn zero_charge_is_not_positive() {
        assert!(!Charge::new(0.0, 0.0, 0.0).is_positive());
        assert!(Charge::new(0.0, 0.0, 1e-9).is_positive());
    }
}
