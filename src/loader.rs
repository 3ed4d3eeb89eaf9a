use crate::charge::{parse_charge_form, validate_charges, Charge};
use crate::error::{FieldError, FieldResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Loads a charge set, choosing the format from the file extension.
///
/// * `.csv`: header row then `x,y,q` per charge.
/// * `.json`: an array of `{"x":..,"y":..,"q":..}` objects, or a form-style
///   object with `num_charges` and `x0`, `y0`, `q0`, ... keys.
pub fn load_charges<P: AsRef<Path>>(path: P) -> FieldResult<Vec<Charge>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let file = File::open(path).map_err(|e| {
        FieldError::Io(std::io::Error::new(
            e.kind(),
            format!("could not open charge file '{}': {}", path.display(), e),
        ))
    })?;

    let charges = match ext.as_deref() {
        Some("csv") => load_charges_csv(file)?,
        Some("json") => load_charges_json(file)?,
        _ => {
            return Err(FieldError::Config(format!(
                "unsupported charge file '{}' (expected .csv or .json)",
                path.display()
            )))
        }
    };

    debug!("Loaded {} charges from {}", charges.len(), path.display());
    Ok(charges)
}

pub fn load_charges_csv<R: Read>(reader: R) -> FieldResult<Vec<Charge>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = rdr.headers()?;
    let header_ok = header.len() == 3
        && header
            .iter()
            .zip(["x", "y", "q"])
            .all(|(got, want)| got.eq_ignore_ascii_case(want));
    if !header_ok {
        return Err(FieldError::InvalidInput(format!(
            "charge file header must be x,y,q, found '{}'",
            header.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut charges = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() != 3 {
            return Err(FieldError::InvalidInput(format!(
                "charge {}: expected 3 columns (x,y,q), found {}",
                index,
                rec.len()
            )));
        }

        let mut values = [0.0; 3];
        for (col, (slot, name)) in values.iter_mut().zip(["x", "y", "q"]).enumerate() {
            *slot = rec[col].parse().map_err(|_| {
                FieldError::InvalidInput(format!(
                    "charge {}: field '{}' is not numeric ('{}')",
                    index, name, &rec[col]
                ))
            })?;
        }
        charges.push(Charge::new(values[0], values[1], values[2]));
    }

    validate_charges(&charges)?;
    Ok(charges)
}

pub fn load_charges_json<R: Read>(reader: R) -> FieldResult<Vec<Charge>> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Array(items) => {
            let charges = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    serde_json::from_value::<Charge>(item)
                        .map_err(|e| FieldError::InvalidInput(format!("charge {}: {}", i, e)))
                })
                .collect::<FieldResult<Vec<Charge>>>()?;
            validate_charges(&charges)?;
            Ok(charges)
        }
        Value::Object(map) => {
            // Form values may arrive as strings or as bare numbers.
            let fields: HashMap<String, String> = map
                .into_iter()
                .map(|(k, v)| {
                    let s = match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, s)
                })
                .collect();
            parse_charge_form(&fields)
        }
        _ => Err(FieldError::InvalidInput(
            "charge JSON must be an array of charges or a form object".to_string(),
        )),
    }
}
