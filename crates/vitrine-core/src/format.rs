//! Locale-aware number formatting for counters

use crate::config::NumberConfig;

/// Largest fraction-digit count a counter may request
pub const MAX_DECIMALS: u32 = 100;

/// Separators of the display locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberLocale {
    pub group: String,
    pub decimal: String,
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self {
            group: ",".to_string(),
            decimal: ".".to_string(),
        }
    }
}

impl From<&NumberConfig> for NumberLocale {
    fn from(config: &NumberConfig) -> Self {
        Self {
            group: config.group_separator.clone(),
            decimal: config.decimal_separator.clone(),
        }
    }
}

/// Format `value` with exactly `decimals` fraction digits and grouped thousands
///
/// Rounds half away from zero on the shortest decimal form of `value`, so
/// `1.005` at two places gives `1.01`. A value that rounds to zero never
/// carries a sign.
pub fn format_count(value: f64, decimals: u32, locale: &NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let decimals = decimals.min(MAX_DECIMALS) as usize;
    let (int_part, frac_part) = round_decimal(value.abs(), decimals);

    let is_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 + decimals + 2);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, &locale.group));
    if !frac_part.is_empty() {
        out.push_str(&locale.decimal);
        out.push_str(&frac_part);
    }
    out
}

/// Round a non-negative finite value to `decimals` places
///
/// Works on the digit string of the shortest round-trip representation, never
/// on the scaled binary value. Returns the integer and fraction digits.
fn round_decimal(magnitude: f64, decimals: usize) -> (String, String) {
    let shortest = magnitude.to_string();
    let (int_part, frac_part) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    if frac_part.len() <= decimals {
        return (
            int_part.to_string(),
            format!("{:0<width$}", frac_part, width = decimals),
        );
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part[..decimals].bytes())
        .collect();
    if frac_part.as_bytes()[decimals] >= b'5' {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let int_digits: String = digits[..split].iter().map(|&b| char::from(b)).collect();
    let frac_digits: String = digits[split..].iter().map(|&b| char::from(b)).collect();
    (int_digits, frac_digits)
}

fn group_digits(int_part: &str, separator: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en(value: f64, decimals: u32) -> String {
        format_count(value, decimals, &NumberLocale::default())
    }

    #[test]
    fn test_grouping() {
        assert_eq!(en(0.0, 0), "0");
        assert_eq!(en(999.0, 0), "999");
        assert_eq!(en(1000.0, 0), "1,000");
        assert_eq!(en(1234567.0, 0), "1,234,567");
        assert_eq!(en(1234.5, 1), "1,234.5");
    }

    #[test]
    fn test_fixed_decimals() {
        assert_eq!(en(0.0, 2), "0.00");
        assert_eq!(en(3.0, 3), "3.000");
        assert_eq!(en(1234567.891, 2), "1,234,567.89");
        assert_eq!(en(0.125, 2), "0.13");
        assert_eq!(en(2.5, 0), "3");
    }

    #[test]
    fn test_rounds_on_decimal_digits() {
        // Binary values of these lie just below the written halfway point
        assert_eq!(en(1.005, 2), "1.01");
        assert_eq!(en(8.345, 2), "8.35");
        assert_eq!(en(-1.005, 2), "-1.01");
        assert_eq!(en(1.0049, 2), "1.00");
    }

    #[test]
    fn test_rounding_carries_into_integer_part() {
        assert_eq!(en(9.99, 0), "10");
        assert_eq!(en(99.995, 2), "100.00");
        assert_eq!(en(999_999.5, 0), "1,000,000");
    }

    #[test]
    fn test_large_decimal_counts() {
        let formatted = en(1.5, MAX_DECIMALS);
        assert_eq!(formatted.len(), 2 + MAX_DECIMALS as usize);
        assert!(formatted.starts_with("1.5000"));
        assert_eq!(en(1.5, 500), formatted);
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(en(-1500.0, 0), "-1,500");
        assert_eq!(en(-0.0, 0), "0");
        assert_eq!(en(-0.001, 2), "0.00");
    }

    #[test]
    fn test_custom_locale() {
        let de = NumberLocale {
            group: ".".to_string(),
            decimal: ",".to_string(),
        };
        assert_eq!(format_count(1234.5, 1, &de), "1.234,5");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(en(f64::NAN, 0), "NaN");
        assert_eq!(en(f64::INFINITY, 0), "∞");
    }
}
