use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes
/// currency symbols, percent signs and commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim()
        .trim_start_matches('$')
        .trim_end_matches('%')
        .trim()
        .replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and a leading
/// `$` or trailing `%`. Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Parses a string into a [`Decimal`], falling back to 0 for anything that
/// is not a number. Logs a warning naming `field` on fallback.
pub fn coerce_decimal(
    field: &str,
    s: &str,
) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(field, "{e}; using 0");
        Decimal::ZERO
    })
}

/// Formats a money amount with two decimals and thousands separators.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${grouped}.{fraction}", if negative { "-" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("75,000").unwrap(), dec!(75000));
    }

    #[test]
    fn parse_decimal_strips_currency_and_percent_signs() {
        assert_eq!(parse_decimal("$2,000").unwrap(), dec!(2000));
        assert_eq!(parse_decimal("15%").unwrap(), dec!(15));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("NaN").is_err());
    }

    #[test]
    fn coerce_decimal_falls_back_to_zero() {
        assert_eq!(coerce_decimal("income", "lots"), Decimal::ZERO);
        assert_eq!(coerce_decimal("income", "42"), dec!(42));
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(dec!(523.17)), "$523.17");
        assert_eq!(format_money(dec!(-500)), "-$500.00");
        assert_eq!(format_money(dec!(0)), "$0.00");
    }
}
