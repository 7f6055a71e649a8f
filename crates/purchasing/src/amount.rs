//! Monetary amount of a purchase, normalized to whole cents.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

use ptm_core::{DomainError, DomainResult, ValueObject};

/// Number of fractional digits every stored amount carries.
pub const SCALE: u32 = 2;

/// Largest number of integer digits a stored amount may have (`NUMERIC(19, 2)`).
pub const MAX_INTEGER_DIGITS: u32 = 17;

/// A purchase amount rounded half-up (away from zero) to two decimal places.
///
/// The only way to build one is [`PurchaseAmount::new`], so every instance has a
/// scale of exactly [`SCALE`]: `150.5` is held as `150.50`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PurchaseAmount(Decimal);

impl PurchaseAmount {
    /// Round `value` to whole cents.
    ///
    /// Fails for magnitudes too large to carry two fractional digits in a
    /// 96-bit mantissa (roughly above 7.9e26).
    pub fn new(value: Decimal) -> DomainResult<Self> {
        let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        // Pads short scales (150.5 -> 150.50); never rounds again.
        rounded.rescale(SCALE);
        if rounded.scale() != SCALE {
            return Err(DomainError::out_of_range(format!(
                "purchase amount {value} cannot be held with {SCALE} decimal places"
            )));
        }
        Ok(Self(rounded))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Digits left of the decimal point, ignoring sign (`0.50` has none).
    pub fn integer_digits(&self) -> u32 {
        let mut int = self.0.abs().trunc();
        let mut digits = 0;
        while !int.is_zero() {
            int = (int / Decimal::TEN).trunc();
            digits += 1;
        }
        digits
    }

    /// Significant fractional digits (trailing zeros do not count).
    pub fn fraction_digits(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Whether the amount fits a `NUMERIC(19, 2)` column without loss.
    pub fn fits_column(&self) -> bool {
        self.integer_digits() <= MAX_INTEGER_DIGITS && self.fraction_digits() <= SCALE
    }
}

impl ValueObject for PurchaseAmount {}

impl TryFrom<Decimal> for PurchaseAmount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PurchaseAmount> for Decimal {
    fn from(value: PurchaseAmount) -> Self {
        value.0
    }
}

impl core::fmt::Display for PurchaseAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl<'de> Deserialize<'de> for PurchaseAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn cents(value: Decimal) -> Decimal {
        PurchaseAmount::new(value).unwrap().value()
    }

    #[test]
    fn rounds_half_up_to_nearest_cent() {
        assert_eq!(cents(dec!(100.126)), dec!(100.13));
        assert_eq!(cents(dec!(100.124)), dec!(100.12));
        assert_eq!(cents(dec!(100.125)), dec!(100.13));
    }

    #[test]
    fn negative_midpoints_round_away_from_zero() {
        assert_eq!(cents(dec!(-100.125)), dec!(-100.13));
        assert_eq!(cents(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn short_scales_are_padded_to_two_places() {
        let amount = PurchaseAmount::new(dec!(150.5)).unwrap();
        assert_eq!(amount.value().scale(), 2);
        assert_eq!(amount.to_string(), "150.50");

        let whole = PurchaseAmount::new(dec!(42)).unwrap();
        assert_eq!(whole.to_string(), "42.00");
    }

    #[test]
    fn magnitudes_without_room_for_cents_are_refused() {
        let huge: Decimal = "1000000000000000000000000000".parse().unwrap();
        assert!(matches!(
            PurchaseAmount::new(huge),
            Err(DomainError::OutOfRange(_))
        ));
        assert!(PurchaseAmount::new(Decimal::MAX).is_err());
        assert!(PurchaseAmount::new(Decimal::MIN).is_err());

        // Largest whole-cent value a 96-bit mantissa can carry.
        let edge = Decimal::from_i128_with_scale(Decimal::MAX.mantissa(), SCALE);
        assert_eq!(PurchaseAmount::new(edge).unwrap().value().scale(), SCALE);
    }

    #[test]
    fn counts_integer_digits() {
        let digits = |v: Decimal| PurchaseAmount::new(v).unwrap().integer_digits();
        assert_eq!(digits(dec!(0.50)), 0);
        assert_eq!(digits(dec!(7)), 1);
        assert_eq!(digits(dec!(-301.84)), 3);
        assert_eq!(digits(dec!(99999999999999999.99)), 17);
    }

    #[test]
    fn column_limits() {
        let fits = |v: Decimal| PurchaseAmount::new(v).unwrap().fits_column();
        assert!(fits(dec!(99999999999999999.99)));
        assert!(!fits(dec!(100000000000000000.00)));
        assert_eq!(PurchaseAmount::new(dec!(10.10)).unwrap().fraction_digits(), 1);
    }

    #[test]
    fn deserializing_normalizes() {
        let amount: PurchaseAmount = serde_json::from_str("\"100.125\"").unwrap();
        assert_eq!(amount.to_string(), "100.13");
        assert_eq!(amount.value().scale(), 2);
    }

    #[test]
    fn deserializing_refuses_amounts_without_room_for_cents() {
        let err = serde_json::from_str::<PurchaseAmount>("\"79228162514264337593543950335\"")
            .unwrap_err();
        assert!(err.to_string().contains("cannot be held with 2 decimal places"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Reference rounding on scaled integers: half away from zero, to cents.
        fn expected_cents(mantissa: i128, scale: u32) -> i128 {
            if scale <= SCALE {
                return mantissa * 10i128.pow(SCALE - scale);
            }
            let div = 10i128.pow(scale - SCALE);
            let mut q = mantissa / div;
            let r = mantissa % div;
            if 2 * r.abs() >= div {
                q += mantissa.signum();
            }
            q
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1024,
                ..ProptestConfig::default()
            })]

            /// Property: any 96-bit decimal is either stored with scale 2, rounded
            /// half-up, or refused because its cents overflow the mantissa.
            #[test]
            fn normalization_matches_reference_rounding(
                lo in any::<u32>(),
                mid in any::<u32>(),
                hi in any::<u32>(),
                negative in any::<bool>(),
                scale in 0u32..=28
            ) {
                let input = Decimal::from_parts(lo, mid, hi, negative, scale);
                let expected = Decimal::try_from_i128_with_scale(
                    expected_cents(input.mantissa(), input.scale()),
                    SCALE,
                );

                match (PurchaseAmount::new(input), expected) {
                    (Ok(amount), Ok(expected)) => {
                        prop_assert_eq!(amount.value().scale(), SCALE);
                        prop_assert_eq!(amount.value(), expected);
                    }
                    (Err(_), Err(_)) => {}
                    (got, want) => prop_assert!(
                        false,
                        "input {} gave {:?}, reference {:?}",
                        input,
                        got,
                        want
                    ),
                }
            }

            /// Property: small amounts always normalize (no overflow below 2^63).
            #[test]
            fn everyday_amounts_always_normalize(
                mantissa in any::<i64>(),
                scale in 0u32..=10
            ) {
                let amount = PurchaseAmount::new(Decimal::new(mantissa, scale));
                prop_assert!(amount.is_ok());
                prop_assert_eq!(amount.unwrap().value().scale(), SCALE);
            }

            /// Property: re-normalizing a normalized amount is a no-op.
            #[test]
            fn normalization_is_idempotent(
                mantissa in any::<i64>(),
                scale in 0u32..=10
            ) {
                let once = PurchaseAmount::new(Decimal::new(mantissa, scale)).unwrap();
                let twice = PurchaseAmount::new(once.value()).unwrap();

                prop_assert_eq!(once, twice);
                prop_assert_eq!(once.value().scale(), twice.value().scale());
            }
        }
    }
}
