//! Brazilian-formatted amounts: `.` groups thousands, `,` separates decimals.

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

// Either properly grouped thousands or a plain run of digits, then an optional
// decimal part. "4.452.00" matches neither and is rejected.
static BR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:[0-9]{1,3}(?:\.[0-9]{3})+|[0-9]+)(?:,[0-9]+)?$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a Brazilian-formatted amount")]
pub struct AmountFormatError(pub String);

pub fn parse_br_decimal(raw: &str) -> Result<Decimal, AmountFormatError> {
    let trimmed = raw.trim();
    let unprefixed = trimmed
        .strip_prefix("R$")
        .map(str::trim_start)
        .unwrap_or(trimmed);

    if !BR_AMOUNT.is_match(unprefixed) {
        return Err(AmountFormatError(raw.to_string()));
    }

    let normalized = unprefixed.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| AmountFormatError(raw.to_string()))
}

/// Renders `175.851,23`: two decimals, `.` thousands groups.
pub fn format_br_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let plain = rounded.abs().to_string();
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, grouped, fraction)
}

/// Currency form, `R$ 175.851,23`; negative amounts as `-R$ 63,29`.
pub fn format_brl(value: Decimal) -> String {
    let amount = format_br_amount(value);
    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-R$ {}", magnitude),
        None => format!("R$ {}", amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse_br_decimal("165,60").unwrap(), dec("165.60"));
        assert_eq!(parse_br_decimal("10").unwrap(), dec("10"));
    }

    #[test]
    fn test_parse_with_thousands() {
        assert_eq!(parse_br_decimal("175.851,23").unwrap(), dec("175851.23"));
        assert_eq!(parse_br_decimal("1.000").unwrap(), dec("1000"));
        assert_eq!(parse_br_decimal("600.822.115,84").unwrap(), dec("600822115.84"));
    }

    #[test]
    fn test_parse_prefix_sign_and_whitespace() {
        assert_eq!(parse_br_decimal(" R$ 1.234,56 ").unwrap(), dec("1234.56"));
        assert_eq!(parse_br_decimal("-63,29").unwrap(), dec("-63.29"));
    }

    #[test]
    fn test_ambiguous_double_dot_is_rejected() {
        assert!(parse_br_decimal("4.452.00").is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        for raw in ["", "abc", "1,2,3", "12.34", "1.2345,00", ",50", "1,", "--1"] {
            assert!(parse_br_decimal(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_format_br_amount() {
        assert_eq!(format_br_amount(dec("175851.23")), "175.851,23");
        assert_eq!(format_br_amount(dec("123")), "123,00");
        assert_eq!(format_br_amount(dec("-1234.5")), "-1.234,50");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec("175851.23")), "R$ 175.851,23");
        assert_eq!(format_brl(dec("10")), "R$ 10,00");
        assert_eq!(format_brl(dec("0")), "R$ 0,00");
        assert_eq!(format_brl(dec("999.999")), "R$ 1.000,00");
        assert_eq!(format_brl(dec("1234567.005")), "R$ 1.234.567,01");
        assert_eq!(format_brl(dec("-63.29")), "-R$ 63,29");
    }
}
