//! Number formatting shared by the field report and the plot labels.

/// Shortest round-trip form, always showing a fractional part or an exponent:
/// `1.0`, `-2.5`, `0.1`, `1e+16`, `1e-05`.
pub fn fmt_float(value: f64) -> String {
    let repr = format!("{:?}", value);
    match repr.split_once('e') {
        Some((mantissa, exp)) => join_exponent(mantissa, exp),
        None => repr,
    }
}

/// Scientific notation with `precision` decimals and a signed exponent of at
/// least two digits: `9.00e+09`, `1.23e-05`, `0.00e+00`.
pub fn fmt_sci(value: f64, precision: usize) -> String {
    let repr = format!("{:.*e}", precision, value);
    match repr.split_once('e') {
        Some((mantissa, exp)) => join_exponent(mantissa, exp),
        // inf / NaN have no exponent
        None => repr,
    }
}

fn join_exponent(mantissa: &str, exp: &str) -> String {
    match exp.parse::<i32>() {
        Ok(e) => {
            let sign = if e < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, e.unsigned_abs())
        }
        Err(_) => format!("{}e{}", mantissa, exp),
    }
}
