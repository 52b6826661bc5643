//! Conversion between human-readable decimal amounts and base units.
//!
//! Both the native asset and the reference token use 18 decimals, so
//! `ether(1)` and `tokens(1)` are each `10^18` base units.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::constants::{NATIVE_DECIMALS, TOKEN_DECIMALS};
use crate::{Amount, ExchangeError, Result};

/// Scale a decimal amount up to base units.
///
/// # Errors
/// Returns `Serialization` if the value is negative, has more fractional
/// digits than `decimals`, or does not fit an [`Amount`].
pub fn to_base_units(value: Decimal, decimals: u32) -> Result<Amount> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ExchangeError::Serialization(format!(
            "negative amount {value}"
        )));
    }
    let mut scaled = value.normalize();
    if scaled.scale() > decimals {
        return Err(ExchangeError::Serialization(format!(
            "{value} has more than {decimals} fractional digits"
        )));
    }
    // Multiply by 10^(decimals - scale) through the mantissa so values up to
    // the full u128 range survive, which Decimal alone cannot hold.
    let exponent = decimals - scaled.scale();
    scaled.set_scale(0).map_err(|e| ExchangeError::Serialization(e.to_string()))?;
    let mantissa = scaled
        .to_u128()
        .ok_or_else(|| ExchangeError::Serialization(format!("{value} out of range")))?;
    10u128
        .checked_pow(exponent)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| ExchangeError::Serialization(format!("{value} out of range")))
}

/// Scale base units down to a decimal amount.
///
/// # Errors
/// Returns `Serialization` if the amount exceeds `Decimal`'s 96-bit mantissa.
pub fn from_base_units(amount: Amount, decimals: u32) -> Result<Decimal> {
    let mantissa = i128::try_from(amount)
        .map_err(|_| ExchangeError::Serialization(format!("{amount} out of range")))?;
    Decimal::try_from_i128_with_scale(mantissa, decimals)
        .map(|d| d.normalize())
        .map_err(|e| ExchangeError::Serialization(e.to_string()))
}

/// `value` native units with 18 decimals. Panics on invalid input, so
/// reserve it for literals.
#[must_use]
pub fn ether(value: impl Into<Decimal>) -> Amount {
    let value = value.into();
    to_base_units(value, NATIVE_DECIMALS)
        .unwrap_or_else(|e| panic!("invalid ether amount {value}: {e}"))
}

/// `value` reference-token units with 18 decimals. Panics on invalid input,
/// so reserve it for literals.
#[must_use]
pub fn tokens(value: impl Into<Decimal>) -> Amount {
    let value = value.into();
    to_base_units(value, TOKEN_DECIMALS)
        .unwrap_or_else(|e| panic!("invalid token amount {value}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: Amount = 1_000_000_000_000_000_000;

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(tokens(1), ONE);
        assert_eq!(tokens(Decimal::new(11, 1)), ONE + ONE / 10);
        assert_eq!(ether(Decimal::new(1, 2)), ONE / 100);
        assert_eq!(tokens(0), 0);
    }

    #[test]
    fn total_supply_fits() {
        assert_eq!(tokens(1_000_000_000), 1_000_000_000 * ONE);
    }

    #[test]
    fn too_many_fractional_digits_rejected() {
        let err = to_base_units(Decimal::new(1, 19), 18).unwrap_err();
        assert!(matches!(err, ExchangeError::Serialization(_)));
    }

    #[test]
    fn negative_rejected() {
        assert!(to_base_units(Decimal::new(-1, 0), 18).is_err());
    }

    #[test]
    fn from_base_units_inverts() {
        let d = from_base_units(ONE / 10, 18).unwrap();
        assert_eq!(d, Decimal::new(1, 1));
        assert_eq!(to_base_units(d, 18).unwrap(), ONE / 10);
    }
}
