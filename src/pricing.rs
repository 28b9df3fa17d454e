//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};

use crate::discounts::Discount;

/// Itemised cost of a registration after any discount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    /// Sum of the selected subject fees before any discount
    subtotal: Money<'static, Currency>,

    /// Amount the discount took off the subtotal
    discount_amount: Money<'static, Currency>,

    /// Amount the candidate actually pays
    total: Money<'static, Currency>,
}

impl Charge {
    /// Sum of the selected subject fees before any discount.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Amount the discount took off the subtotal.
    #[must_use]
    pub fn discount_amount(&self) -> Money<'static, Currency> {
        self.discount_amount
    }

    /// Amount the candidate actually pays.
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// The discount as a fraction of the subtotal.
    #[must_use]
    pub fn savings_percent(&self) -> Percentage {
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(0.0);
        }

        // Do the ratio in decimal space to avoid integer truncation.
        let savings = Decimal::from_i64(self.discount_amount.to_minor_units());
        let subtotal = Decimal::from_i64(subtotal_minor);

        match (savings, subtotal) {
            (Some(savings), Some(subtotal)) => Percentage::from(savings / subtotal),
            _ => Percentage::from(0.0),
        }
    }
}

/// Price a registration subtotal with an optional discount applied.
///
/// The discount amount is clamped to the subtotal, so the total can never
/// go below zero. `None` prices at full fee.
///
/// # Errors
///
/// Returns a [`MoneyError`] if a fixed discount is denominated in a
/// different currency than the subtotal, or if money arithmetic fails.
pub fn price_charge(
    subtotal: Money<'static, Currency>,
    discount: Option<&Discount>,
) -> Result<Charge, MoneyError> {
    let discount_amount = match discount {
        Some(discount) => discount.amount_off(subtotal)?,
        None => Money::from_minor(0, subtotal.currency()),
    };

    let total = subtotal.sub(discount_amount)?;

    Ok(Charge {
        subtotal,
        discount_amount,
        total,
    })
}
