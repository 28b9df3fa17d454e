//! Coupon Fixtures

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD, XAF, XOF},
};
use serde::Deserialize;

use crate::coupons::Coupon;
use crate::coupons::code::CouponCode;
use crate::discounts::Discount;
use crate::fixtures::FixtureError;

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon key -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Code candidates submit at the desk
    pub code: String,

    /// Discount terms
    pub discount: DiscountFixture,

    /// Redemption cap. Zero or omitted means unlimited.
    #[serde(default)]
    pub max_uses: u32,

    /// Redemptions already recorded
    #[serde(default)]
    pub used_count: u32,

    /// Start of the validity window
    pub valid_from: Timestamp,

    /// End of the validity window
    pub valid_until: Timestamp,

    /// Whether the coupon is switched on. Defaults to true.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Discount terms in YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountFixture {
    /// Percentage off the subtotal
    Percentage {
        /// Percent points ("20%") or a fraction ("0.2")
        value: String,
    },

    /// Fixed amount off the subtotal
    Fixed {
        /// Price string (e.g. "25000 XAF")
        value: String,
    },
}

impl TryFrom<CouponFixture> for Coupon {
    type Error = FixtureError;

    fn try_from(fixture: CouponFixture) -> Result<Self, Self::Error> {
        let code = CouponCode::new(fixture.code)?;
        let discount = fixture.discount.try_into()?;

        Ok(Coupon {
            code,
            discount,
            max_uses: fixture.max_uses,
            used_count: fixture.used_count,
            valid_from: fixture.valid_from,
            valid_until: fixture.valid_until,
            is_active: fixture.active,
            created_at: fixture.valid_from,
            updated_at: fixture.valid_from,
        })
    }
}

impl TryFrom<DiscountFixture> for Discount {
    type Error = FixtureError;

    fn try_from(fixture: DiscountFixture) -> Result<Self, Self::Error> {
        match fixture {
            DiscountFixture::Percentage { value } => {
                Ok(Discount::PercentageOff(parse_percentage(&value)?))
            }
            DiscountFixture::Fixed { value } => {
                let (minor_units, currency) = parse_price(&value)?;

                Ok(Discount::AmountOff(Money::from_minor(minor_units, currency)))
            }
        }
    }
}

/// Parse a price string (e.g. "25000 XAF") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "XAF" => XAF,
        "XOF" => XOF,
        "USD" => USD,
        "EUR" => EUR,
        "GBP" => GBP,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    // Scale by the currency's exponent: the franc has no minor unit, so
    // "25000 XAF" is already 25000; "2.99 USD" becomes 299.
    let scale = Decimal::from(10_i64.pow(currency.exponent));

    let minor_units = amount
        .checked_mul(scale)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a percentage string (e.g. "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or if the value is invalid.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        // Parse as percentage (e.g., "15%" -> 0.15)
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        // Convert from percentage to decimal (15 -> 0.15)
        Ok(Percentage::from(value / 100.0))
    } else {
        // Parse as decimal (e.g., "0.15" -> 0.15)
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
