//! Amount text parsing and formatting.
//!
//! User input accepts both "." and "," as the decimal separator and tolerates
//! spaces used for digit grouping. The wire format is stricter: exactly two
//! fraction digits, dot separator, no grouping, regardless of locale.

/// Parses raw user input into a number.
///
/// Returns `None` for empty or unparseable text. "1 000,50" and "1000.50"
/// yield the same value.
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats an amount for the request path: two fraction digits, dot
/// separator, no grouping. Part of the wire contract.
pub fn wire_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats an amount for display: two fraction digits, spaces for digit
/// grouping, configurable decimal separator.
pub fn display_amount(value: f64, decimal_separator: char) -> String {
    group_digits(&format!("{value:.2}"), decimal_separator)
}

/// Rate display format: four fraction digits, same grouping rules.
pub fn display_rate(value: f64, decimal_separator: char) -> String {
    group_digits(&format!("{value:.4}"), decimal_separator)
}

fn group_digits(canonical: &str, decimal_separator: char) -> String {
    let (sign, rest) = match canonical.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", canonical),
    };
    let (int_part, frac_part) = rest.split_once('.').unwrap_or((rest, ""));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}{decimal_separator}{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_dot_and_comma_separators() {
        assert_eq!(parse_amount("1000.50"), Some(1000.50));
        assert_eq!(parse_amount("1000,50"), Some(1000.50));
        assert_eq!(parse_amount("1 000.50"), Some(1000.50));
        assert_eq!(parse_amount("1 000,50"), Some(1000.50));
        assert_eq!(parse_amount("  12 345 678,9 "), Some(12_345_678.9));
    }

    #[test]
    fn test_parse_equivalence_with_canonical_dot_form() {
        let cases = [
            ("1 000.50", "1000.50"),
            ("1 000,50", "1000.50"),
            ("0,01", "0.01"),
            ("999 999", "999999"),
        ];
        for (text, canonical) in cases {
            assert_eq!(
                parse_amount(text),
                parse_amount(canonical),
                "{text} vs {canonical}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("1,000.50"), None);
    }

    #[test]
    fn test_wire_amount_is_locale_independent() {
        assert_eq!(wire_amount(100.0), "100.00");
        assert_eq!(wire_amount(1000.5), "1000.50");
        assert_eq!(wire_amount(0.005), "0.01");
        assert_eq!(wire_amount(1.0), "1.00");
    }

    #[test]
    fn test_display_amount_groups_with_spaces() {
        assert_eq!(display_amount(1050.25, '.'), "1 050.25");
        assert_eq!(display_amount(1050.25, ','), "1 050,25");
        assert_eq!(display_amount(12.0, '.'), "12.00");
        assert_eq!(display_amount(1234567.891, '.'), "1 234 567.89");
        assert_eq!(display_amount(-1234.5, '.'), "-1 234.50");
    }

    #[test]
    fn test_display_rate_uses_four_fraction_digits() {
        assert_eq!(display_rate(1.0833333, '.'), "1.0833");
        assert_eq!(display_rate(10500.5, ','), "10 500,5000");
    }
}
