//! Currency amount helpers.
//!
//! Amounts are exact decimals. Nothing in the crate converts to binary
//! floating point except percentage reporting.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from amount validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("'{0}' is not a valid amount")]
    NotANumber(String),
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),
    #[error("amount {0} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    TooLarge(Decimal),
    #[error("amount {0} has more than {max} decimal places", max = MAX_SCALE)]
    TooPrecise(Decimal),
}

/// Largest amount a single debt or request may carry (one quadrillion).
///
/// `Decimal` holds 28 significant digits, so sums of amounts capped here
/// and at [`MAX_SCALE`] stay exact for any realistic number of debts.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Most decimal places an amount may carry.
pub const MAX_SCALE: u32 = 6;

/// Check that an amount is usable on a debt or request.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge(amount));
    }
    if amount.normalize().scale() > MAX_SCALE {
        return Err(AmountError::TooPrecise(amount));
    }
    Ok(amount)
}

/// Parse user input such as `"12.50"` into a positive amount.
///
/// # Examples
///
/// ```
/// use settle_up::core::money::parse_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_amount(" 12.50 ").unwrap(), dec!(12.50));
/// assert!(parse_amount("abc").is_err());
/// assert!(parse_amount("-3").is_err());
/// ```
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
    validate_amount(amount)
}

/// Render an amount for display, e.g. `$6.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_amount("10").unwrap(), dec!(10));
        assert_eq!(parse_amount("0.01").unwrap(), dec!(0.01));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_amount("ten"),
            Err(AmountError::NotANumber("ten".to_string()))
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn test_parse_rejects_non_positive() {
        assert_eq!(parse_amount("0"), Err(AmountError::NotPositive(dec!(0))));
        assert!(parse_amount("-4.5").is_err());
    }

    #[test]
    fn test_rejects_oversized_amounts() {
        assert_eq!(MAX_AMOUNT, dec!(1_000_000_000_000_000));
        assert_eq!(validate_amount(MAX_AMOUNT), Ok(MAX_AMOUNT));
        assert_eq!(
            validate_amount(dec!(1_000_000_000_000_000.01)),
            Err(AmountError::TooLarge(dec!(1_000_000_000_000_000.01)))
        );
        assert!(matches!(
            parse_amount("50000000000000000000000000000"),
            Err(AmountError::TooLarge(_))
        ));
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert_eq!(validate_amount(dec!(0.000001)), Ok(dec!(0.000001)));
        assert_eq!(
            validate_amount(dec!(0.0000001)),
            Err(AmountError::TooPrecise(dec!(0.0000001)))
        );
        // trailing zeros do not count
        assert!(parse_amount("2.5000000000").is_ok());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_amount(dec!(6)), "$6.00");
        assert_eq!(format_amount(dec!(3.333)), "$3.33");
        assert_eq!(format_amount(dec!(-2.5)), "-$2.50");
    }
}
