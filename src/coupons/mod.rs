//! Coupons
//!
//! Discount coupons handed out by the registration office. A coupon pairs a
//! [`CouponCode`] with a [`Discount`](crate::discounts::Discount) and the
//! rules for when it may be applied: a validity window, an on/off switch,
//! and an optional redemption cap.

pub mod assess;
pub mod code;
pub mod directory;

use jiff::Timestamp;

use crate::coupons::code::CouponCode;
use crate::discounts::Discount;

/// A coupon as held in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    /// Code candidates submit at the desk
    pub code: CouponCode,

    /// Discount the coupon grants when it applies
    pub discount: Discount,

    /// Redemption cap. Zero means unlimited.
    pub max_uses: u32,

    /// Redemptions recorded so far
    pub used_count: u32,

    /// Start of the validity window, inclusive
    pub valid_from: Timestamp,

    /// End of the validity window, inclusive
    pub valid_until: Timestamp,

    /// Whether the office has the coupon switched on
    pub is_active: bool,

    /// When the coupon was filed
    pub created_at: Timestamp,

    /// When the coupon was last edited, toggled, or redeemed
    pub updated_at: Timestamp,
}

impl Coupon {
    /// Whether the redemption cap has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.max_uses > 0 && self.used_count >= self.max_uses
    }

    /// Redemptions left before the cap, or `None` when unlimited.
    #[must_use]
    pub fn remaining_uses(&self) -> Option<u32> {
        if self.max_uses == 0 {
            None
        } else {
            Some(self.max_uses.saturating_sub(self.used_count))
        }
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;

    use super::*;

    fn coupon(max_uses: u32, used_count: u32) -> Coupon {
        Coupon {
            code: CouponCode::new("SAVE20").expect("code should be valid"),
            discount: Discount::PercentageOff(Percentage::from(0.20)),
            max_uses,
            used_count,
            valid_from: Timestamp::UNIX_EPOCH,
            valid_until: Timestamp::UNIX_EPOCH,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn coupon_under_its_cap_is_not_exhausted() {
        assert!(!coupon(100, 99).is_exhausted());
    }

    #[test]
    fn coupon_at_its_cap_is_exhausted() {
        assert!(coupon(100, 100).is_exhausted());
    }

    #[test]
    fn coupon_over_its_cap_is_exhausted() {
        assert!(coupon(100, 150).is_exhausted());
    }

    #[test]
    fn uncapped_coupon_is_never_exhausted() {
        assert!(!coupon(0, 1_000_000).is_exhausted());
    }

    #[test]
    fn remaining_uses_counts_down_to_the_cap() {
        assert_eq!(coupon(100, 12).remaining_uses(), Some(88));
        assert_eq!(coupon(100, 100).remaining_uses(), Some(0));
    }

    #[test]
    fn uncapped_coupon_has_no_remaining_count() {
        assert_eq!(coupon(0, 12).remaining_uses(), None);
    }
}
