//! Number formatting for report text.

/// Format an integer with comma thousands separators.
///
/// ```
/// use sales_insights::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: u64) -> String {
    group_thousands(&n.to_string())
}

/// Format an amount as dollars with thousands separators and `decimals`
/// fractional digits, e.g. `$1,234` or `$1,234.5`.
pub fn format_currency(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::new();
    // "-0" after rounding is just zero
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, 0), "$0");
        assert_eq!(format_currency(1234.4, 0), "$1,234");
        assert_eq!(format_currency(1234.56, 1), "$1,234.6");
        assert_eq!(format_currency(-2500.0, 0), "-$2,500");
        assert_eq!(format_currency(-0.2, 0), "$0");
    }
}
