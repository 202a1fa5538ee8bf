//! Rounding and number formatting shared by statistics and rendering

/// Round to the nearest integer, ties to even
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Round to `decimals` places, ties to even
///
/// Rounds the exact binary value of `value`, so `1.15` (stored just below
/// 1.15) becomes `1.1`. Scaling by a power of ten first would not keep that.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    format!("{:.*}", decimals as usize, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Format an integer with comma thousands separators: `1234567` -> `"1,234,567"`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
