//! printf-compatible scientific notation.
//!
//! LHAPDF grids are written with C `%.Ne` semantics: the exponent always has
//! a sign and at least two digits (`1.000000e-09`). Rust's `{:e}` prints
//! `1.000000e-9`, so the exponent is rewritten here.

/// C `%.{precision}e`.
pub fn format_sci(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value).to_string();
    }
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
            }
            Err(_) => raw,
        },
        None => raw,
    }
}

/// C `% .{precision}e`: a blank takes the place of a plus sign.
pub fn format_sci_spaced(value: f64, precision: usize) -> String {
    let body = format_sci(value, precision);
    if body.starts_with('-') { body } else { format!(" {body}") }
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "nan"
    } else if value > 0.0 {
        "inf"
    } else {
        "-inf"
    }
}
