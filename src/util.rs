// Utility helpers for parsing and formatting numbers.
//
// Spreadsheet cells arrive as loosely typed values, so every numeric read goes
// through here and the rest of the code can assume clean `f64`s.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

/// Sum of the values; an empty slice sums to zero.
pub fn total(v: &[f64]) -> Option<f64> {
    Some(v.iter().sum())
}

/// Arithmetic mean, `None` for an empty slice so callers never see NaN.
pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `num-format` thousands separators (`1,234,567.89`).
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // `-0` after rounding reads as plain zero.
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Whole-unit currency, e.g. `$1,235`.
pub fn format_currency(symbol: &str, n: f64) -> String {
    let body = format_number(n, 0);
    match body.strip_prefix('-') {
        Some(abs) => format!("-{}{}", symbol, abs),
        None => format!("{}{}", symbol, body),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Plain rendering of a cell number: integral values drop the fractional part.
pub fn display_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_safe_strips_separators() {
        assert_eq!(parse_f64_safe(Some(" 1,250.5 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn average_of_empty_is_none() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[100.0, 50.0]), Some(75.0));
    }

    #[test]
    fn currency_and_integer_formatting() {
        assert_eq!(format_currency("$", 1234567.4), "$1,234,567");
        assert_eq!(format_currency("$", -1500.0), "-$1,500");
        assert_eq!(format_currency("$", 0.0), "$0");
        assert_eq!(format_number(15.0, 0), "15");
        assert_eq!(format_number(1234.5678, 2), "1,234.57");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn display_number_drops_integral_fraction() {
        assert_eq!(display_number(10.0), "10");
        assert_eq!(display_number(2.5), "2.5");
        assert_eq!(display_number(-3.0), "-3");
    }
}
