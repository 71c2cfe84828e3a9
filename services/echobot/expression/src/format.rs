/// Fractional digits kept when rendering a result
pub const DECIMAL_DIGITS: usize = 6;

/// Renders `v` rounded to [`DECIMAL_DIGITS`] places, without trailing
/// zeros. Whole numbers have no decimal point.
pub fn format_number(v: f64) -> String {
    let fixed = format!("{:.*}", DECIMAL_DIGITS, v);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    match trimmed {
        "-0" => "0".to_string(),
        t => t.to_string(),
    }
}
