//! Checkout
//!
//! Turns a candidate's selections and an optional coupon code into a
//! priced [`Quote`].

use jiff::Timestamp;
use rusty_money::MoneyError;
use thiserror::Error;
use tracing::Span;

use crate::coupons::assess::{Assessment, assess};
use crate::coupons::directory::{CouponDirectory, DirectoryError};
use crate::pricing::{Charge, price_charge};
use crate::selection::SelectionSet;

/// Errors that can occur when quoting a registration.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The coupon directory could not be reached
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Wrapper for money errors
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A priced registration, with the coupon outcome that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    charge: Charge,
    assessment: Option<Assessment>,
}

impl Quote {
    /// The priced charge.
    #[must_use]
    pub fn charge(&self) -> &Charge {
        &self.charge
    }

    /// Outcome of the submitted coupon, or `None` when no code was given.
    #[must_use]
    pub fn assessment(&self) -> Option<&Assessment> {
        self.assessment.as_ref()
    }
}

/// Prices a selection set, applying a coupon when one is submitted and
/// holds up.
///
/// A rejected coupon never fails the quote. The registration is priced at
/// the full fee and the rejection travels back inside the quote so the
/// desk can show the candidate why.
///
/// # Errors
///
/// Returns a [`QuoteError`] if the coupon directory is unreachable or
/// money arithmetic fails.
#[tracing::instrument(
    name = "checkout.quote",
    skip(selections, directory),
    fields(subjects = selections.len(), coupon = tracing::field::Empty),
    err
)]
pub async fn quote(
    selections: &SelectionSet,
    coupon_code: Option<&str>,
    now: Timestamp,
    directory: &impl CouponDirectory,
) -> Result<Quote, QuoteError> {
    let subtotal = selections.subtotal()?;

    let assessment = match coupon_code {
        Some(code) => {
            Span::current().record("coupon", code);

            Some(assess(code, now, directory).await?)
        }
        None => None,
    };

    let discount = assessment.as_ref().and_then(Assessment::discount);
    let charge = price_charge(subtotal, discount)?;

    Ok(Quote { charge, assessment })
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::Money;
    use rusty_money::iso::XAF;
    use testresult::TestResult;

    use crate::coupons::Coupon;
    use crate::coupons::assess::RejectionReason;
    use crate::coupons::code::CouponCode;
    use crate::coupons::directory::MockCouponDirectory;
    use crate::discounts::Discount;
    use crate::grades::{FeeSchedule, Grade};

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("timestamp should parse")
    }

    fn two_subjects() -> SelectionSet {
        SelectionSet::with_selections(
            [("Mathematics", Grade::A), ("Physics", Grade::B)],
            &FeeSchedule::standard(),
        )
        .expect("selections should build")
    }

    fn save20() -> Coupon {
        Coupon {
            code: CouponCode::new("SAVE20").expect("code should be valid"),
            discount: Discount::PercentageOff(Percentage::from(0.20)),
            max_uses: 0,
            used_count: 0,
            valid_from: ts("2026-01-01T00:00:00Z"),
            valid_until: ts("2026-12-31T23:59:59Z"),
            is_active: true,
            created_at: ts("2026-01-01T00:00:00Z"),
            updated_at: ts("2026-01-01T00:00:00Z"),
        }
    }

    const MIDYEAR: &str = "2026-06-01T12:00:00Z";

    #[tokio::test]
    async fn quote_without_a_coupon_skips_the_directory() -> TestResult {
        let mut directory = MockCouponDirectory::new();
        directory.expect_find_by_code().never();

        let quote = quote(&two_subjects(), None, ts(MIDYEAR), &directory).await?;

        assert_eq!(quote.charge().subtotal(), Money::from_minor(90_000, XAF));
        assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
        assert!(quote.assessment().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn quote_with_an_accepted_coupon_discounts_the_total() -> TestResult {
        let mut directory = MockCouponDirectory::new();
        let coupon = save20();

        directory
            .expect_find_by_code()
            .withf(|code| code.as_str() == "SAVE20")
            .return_once(move |_| Ok(Some(coupon)));

        let quote = quote(&two_subjects(), Some("SAVE20"), ts(MIDYEAR), &directory).await?;

        assert_eq!(quote.charge().total(), Money::from_minor(72_000, XAF));
        assert_eq!(
            quote.charge().discount_amount(),
            Money::from_minor(18_000, XAF)
        );
        assert!(quote.assessment().is_some_and(Assessment::is_accepted));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_coupon_prices_the_full_fee_and_reports_why() -> TestResult {
        let mut directory = MockCouponDirectory::new();

        directory.expect_find_by_code().return_once(|_| Ok(None));

        let quote = quote(&two_subjects(), Some("MISSING"), ts(MIDYEAR), &directory).await?;

        assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
        assert_eq!(
            quote.assessment().and_then(Assessment::rejection),
            Some(RejectionReason::UnknownCode)
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_coupon_is_rejected_without_a_lookup() -> TestResult {
        let mut directory = MockCouponDirectory::new();
        directory.expect_find_by_code().never();

        let quote = quote(&two_subjects(), Some(""), ts(MIDYEAR), &directory).await?;

        assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
        assert_eq!(
            quote.assessment().and_then(Assessment::rejection),
            Some(RejectionReason::BlankCode)
        );

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_directory_fails_the_quote() {
        let mut directory = MockCouponDirectory::new();

        directory
            .expect_find_by_code()
            .return_once(|_| Err(DirectoryError::Unreachable("socket closed".to_string())));

        let result = quote(&two_subjects(), Some("SAVE20"), ts(MIDYEAR), &directory).await;

        assert!(
            matches!(result, Err(QuoteError::Directory(_))),
            "expected a directory error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn empty_selection_set_quotes_to_zero() -> TestResult {
        let mut directory = MockCouponDirectory::new();
        directory.expect_find_by_code().never();

        let selections = SelectionSet::new(XAF);

        let quote = quote(&selections, None, ts(MIDYEAR), &directory).await?;

        assert_eq!(quote.charge().total(), Money::from_minor(0, XAF));

        Ok(())
    }
}
