//! Coupon Assessment
//!
//! Read-only checks run when a candidate hands a coupon code to the desk.
//! Assessment never mutates the directory. Redemption counts move only when
//! a registration is actually paid, through the
//! [`RedemptionLedger`](crate::coupons::directory::RedemptionLedger).

use jiff::Timestamp;
use thiserror::Error;
use tracing::Span;

use crate::coupons::Coupon;
use crate::coupons::code::{CodeError, CouponCode};
use crate::coupons::directory::{CouponDirectory, DirectoryError};
use crate::discounts::Discount;

/// Why a submitted code was turned away.
///
/// The display strings are the exact messages shown at the desk.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The submitted code was empty or whitespace-only
    #[error("Coupon code is required")]
    BlankCode,

    /// No coupon is filed under the submitted code
    #[error("Invalid coupon code")]
    UnknownCode,

    /// The office has switched the coupon off
    #[error("This coupon is no longer active")]
    Disabled,

    /// The validity window has closed
    #[error("This coupon has expired")]
    Expired,

    /// The validity window has not opened yet
    #[error("This coupon is not yet valid")]
    NotYetStarted,

    /// The redemption cap has been reached
    #[error("This coupon has reached its maximum usage limit")]
    FullyRedeemed,
}

/// Outcome of assessing a submitted coupon code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assessment {
    /// The coupon applies and this discount should be priced in
    Accepted(Discount),

    /// The coupon does not apply
    Rejected(RejectionReason),
}

impl Assessment {
    /// The discount to apply, when the coupon was accepted.
    #[must_use]
    pub fn discount(&self) -> Option<&Discount> {
        match self {
            Self::Accepted(discount) => Some(discount),
            Self::Rejected(_) => None,
        }
    }

    /// Whether the coupon was accepted.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The reason the coupon was turned away, when it was.
    #[must_use]
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Assesses a submitted code against the directory at the given instant.
///
/// Checks run in a fixed order and stop at the first failure: blank input,
/// unknown code, switched off, expired, not yet valid, cap reached. Blank
/// input is turned away before the directory is consulted at all.
///
/// A rejection is a normal outcome and comes back as
/// [`Assessment::Rejected`]. Only an unreachable directory is an error, so
/// a lookup failure can never masquerade as "invalid coupon code".
///
/// # Errors
///
/// Returns a [`DirectoryError`] if the directory lookup fails.
#[tracing::instrument(
    name = "coupons.assess",
    skip(directory),
    fields(outcome = tracing::field::Empty),
    err
)]
pub async fn assess(
    code: &str,
    now: Timestamp,
    directory: &impl CouponDirectory,
) -> Result<Assessment, DirectoryError> {
    let code = match CouponCode::new(code) {
        Ok(code) => code,
        Err(CodeError::Blank) => {
            return Ok(record_outcome(Assessment::Rejected(
                RejectionReason::BlankCode,
            )));
        }
    };

    let Some(coupon) = directory.find_by_code(&code).await? else {
        return Ok(record_outcome(Assessment::Rejected(
            RejectionReason::UnknownCode,
        )));
    };

    Ok(record_outcome(assess_coupon(&coupon, now)))
}

/// Runs the record-level checks in order. Both window edges are inclusive.
fn assess_coupon(coupon: &Coupon, now: Timestamp) -> Assessment {
    if !coupon.is_active {
        return Assessment::Rejected(RejectionReason::Disabled);
    }

    if now > coupon.valid_until {
        return Assessment::Rejected(RejectionReason::Expired);
    }

    if now < coupon.valid_from {
        return Assessment::Rejected(RejectionReason::NotYetStarted);
    }

    if coupon.is_exhausted() {
        return Assessment::Rejected(RejectionReason::FullyRedeemed);
    }

    Assessment::Accepted(coupon.discount)
}

fn record_outcome(assessment: Assessment) -> Assessment {
    let outcome = match &assessment {
        Assessment::Accepted(_) => "accepted".to_string(),
        Assessment::Rejected(reason) => format!("rejected: {reason}"),
    };

    Span::current().record("outcome", outcome.as_str());

    assessment
}
