//! Discounts

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};

/// Discount terms a coupon grants at checkout.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Discount {
    /// Take a fraction off the subtotal (e.g. 0.20 for "20% off")
    PercentageOff(Percentage),

    /// Subtract a fixed amount from the subtotal (e.g. "25 000 F off")
    AmountOff(Money<'static, Currency>),
}

impl Discount {
    /// Amount this discount takes off the given subtotal.
    ///
    /// The result always lands in `[0, subtotal]`: out-of-range terms are
    /// clamped rather than rejected, so a negative magnitude takes nothing
    /// off and one larger than the subtotal takes it to zero. Percentage
    /// discounts round down to whole minor units, in the payer's favour.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a fixed amount is denominated in a
    /// different currency than the subtotal.
    pub fn amount_off(
        &self,
        subtotal: Money<'static, Currency>,
    ) -> Result<Money<'static, Currency>, MoneyError> {
        let subtotal_minor = subtotal.to_minor_units();
        let currency = subtotal.currency();

        let minor = match self {
            Discount::PercentageOff(percent) => percent_of_minor(percent, subtotal_minor),
            Discount::AmountOff(amount) => {
                if amount.currency() != currency {
                    return Err(MoneyError::CurrencyMismatch {
                        expected: currency.iso_alpha_code,
                        actual: amount.currency().iso_alpha_code,
                    });
                }

                amount.to_minor_units().max(0).min(subtotal_minor)
            }
        };

        Ok(Money::from_minor(minor, currency))
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discount::PercentageOff(percent) => {
                let points = (((*percent) * Decimal::ONE) * Decimal::ONE_HUNDRED).normalize();

                write!(f, "{points}% off")
            }
            Discount::AmountOff(amount) => write!(f, "{amount} off"),
        }
    }
}

/// Fraction of a minor-unit amount, rounded down to whole minor units.
///
/// The fraction is clamped to `[0, 1]` before multiplying, so the result
/// stays within `[0, minor]` and the multiplication cannot overflow.
fn percent_of_minor(percent: &Percentage, minor: i64) -> i64 {
    let fraction = ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .max(Decimal::ZERO)
        .min(Decimal::ONE);

    let Some(minor) = Decimal::from_i64(minor) else {
        return 0;
    };

    fraction
        .checked_mul(minor)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::ToZero)
                .to_i64()
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{USD, XAF};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_takes_fraction_off_subtotal() -> TestResult {
        let discount = Discount::PercentageOff(Percentage::from(0.20));

        let off = discount.amount_off(Money::from_minor(90_000, XAF))?;

        assert_eq!(off, Money::from_minor(18_000, XAF));

        Ok(())
    }

    #[test]
    fn percentage_rounds_down_to_whole_minor_units() -> TestResult {
        // 15% of 99 is 14.85; the payer keeps the fraction.
        let discount = Discount::PercentageOff(Percentage::from(0.15));

        let off = discount.amount_off(Money::from_minor(99, XAF))?;

        assert_eq!(off, Money::from_minor(14, XAF));

        Ok(())
    }

    #[test]
    fn percentage_above_one_clamps_to_subtotal() -> TestResult {
        let discount = Discount::PercentageOff(Percentage::from(2.5));

        let off = discount.amount_off(Money::from_minor(90_000, XAF))?;

        assert_eq!(off, Money::from_minor(90_000, XAF));

        Ok(())
    }

    #[test]
    fn negative_percentage_takes_nothing_off() -> TestResult {
        let discount = Discount::PercentageOff(Percentage::from(-0.5));

        let off = discount.amount_off(Money::from_minor(90_000, XAF))?;

        assert_eq!(off, Money::from_minor(0, XAF));

        Ok(())
    }

    #[test]
    fn amount_caps_at_subtotal() -> TestResult {
        let discount = Discount::AmountOff(Money::from_minor(100_000, XAF));

        let off = discount.amount_off(Money::from_minor(90_000, XAF))?;

        assert_eq!(off, Money::from_minor(90_000, XAF));

        Ok(())
    }

    #[test]
    fn amount_within_subtotal_is_taken_in_full() -> TestResult {
        let discount = Discount::AmountOff(Money::from_minor(25_000, XAF));

        let off = discount.amount_off(Money::from_minor(90_000, XAF))?;

        assert_eq!(off, Money::from_minor(25_000, XAF));

        Ok(())
    }

    #[test]
    fn amount_in_other_currency_errors() {
        let discount = Discount::AmountOff(Money::from_minor(1_000, USD));

        let result = discount.amount_off(Money::from_minor(90_000, XAF));

        assert_eq!(
            result,
            Err(MoneyError::CurrencyMismatch {
                expected: XAF.iso_alpha_code,
                actual: USD.iso_alpha_code,
            })
        );
    }

    #[test]
    fn zero_subtotal_discounts_to_zero() -> TestResult {
        let percent = Discount::PercentageOff(Percentage::from(0.20));
        let amount = Discount::AmountOff(Money::from_minor(25_000, XAF));

        assert_eq!(
            percent.amount_off(Money::from_minor(0, XAF))?,
            Money::from_minor(0, XAF)
        );
        assert_eq!(
            amount.amount_off(Money::from_minor(0, XAF))?,
            Money::from_minor(0, XAF)
        );

        Ok(())
    }

    #[test]
    fn display_names_the_terms() {
        let percent = Discount::PercentageOff(Percentage::from(0.20));

        assert_eq!(percent.to_string(), "20% off");
    }
}
