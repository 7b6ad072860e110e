/// Digits kept after the decimal point when formatting a result.
pub const DEFAULT_MAX_FRACTION_DIGITS: usize = 10;

/// Format `value` the way results are stored and echoed back: at most
/// `max_fraction_digits` fractional digits, trailing zeros trimmed, `.` as
/// the decimal separator and no digit grouping.
///
/// The output does not depend on the host locale. Values that round to zero
/// render as `"0"`, never `"-0"`.
pub fn format_result(value: f64, max_fraction_digits: usize) -> String {
    let formatted = format!("{value:.max_fraction_digits$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64) -> String {
        format_result(value, DEFAULT_MAX_FRACTION_DIGITS)
    }

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(fmt(10.0), "10");
        assert_eq!(fmt(-4.0), "-4");
        assert_eq!(fmt(1_000_000.0), "1000000");
        assert_eq!(fmt(0.0), "0");
        assert_eq!(fmt(-0.0), "0");
    }

    #[test]
    fn fractions_are_rounded_and_trimmed() {
        assert_eq!(fmt(0.5), "0.5");
        assert_eq!(fmt(1.0 / 3.0), "0.3333333333");
        assert_eq!(fmt(2.0 / 3.0), "0.6666666667");
        assert_eq!(fmt(0.1 + 0.2), "0.3");
        assert_eq!(fmt(-1e-12), "0");
    }

    #[test]
    fn custom_precision() {
        assert_eq!(format_result(1.23456, 2), "1.23");
        assert_eq!(format_result(2.4, 0), "2");
    }

    #[test]
    fn formatted_value_parses_back() {
        for value in [10.0, 0.125, -2.75, 123456.789, 1.0 / 8.0] {
            let text = fmt(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }
}
