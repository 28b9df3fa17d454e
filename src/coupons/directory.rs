//! Coupon Directory
//!
//! Storage and administration of coupons. Checkout only ever needs the
//! read-only [`CouponDirectory`] lookup; the registration office manages
//! records through [`MemoryCouponDirectory`] and records redemptions
//! through the [`RedemptionLedger`].

use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;

use crate::coupons::Coupon;
use crate::coupons::code::CouponCode;
use crate::discounts::Discount;

/// Window length granted to coupons created without an explicit end.
pub const DEFAULT_VALIDITY: SignedDuration = SignedDuration::from_hours(30 * 24);

/// Errors raised while reaching the coupon store.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backing store could not be read or written
    #[error("Coupon directory unreachable: {0}")]
    Unreachable(String),
}

/// Errors raised by the admin operations.
#[derive(Debug, Error)]
pub enum CouponAdminError {
    /// A coupon with this code is already on file
    #[error("Coupon already exists: {0}")]
    AlreadyExists(CouponCode),

    /// No coupon with this code is on file
    #[error("Coupon not found: {0}")]
    NotFound(CouponCode),

    /// The validity window ends before it starts
    #[error("Validity window ends before it starts: {from} to {until}")]
    InvalidWindow {
        /// Start of the rejected window
        from: Timestamp,
        /// End of the rejected window
        until: Timestamp,
    },

    /// The store could not be reached
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Errors raised while recording a redemption.
#[derive(Debug, Error)]
pub enum RedemptionError {
    /// No coupon with this code is on file
    #[error("Coupon not found: {0}")]
    UnknownCode(CouponCode),

    /// The redemption cap was already reached
    #[error("Coupon is fully redeemed: {0}")]
    Exhausted(CouponCode),

    /// The store could not be reached
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Details for a coupon being added to the directory.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    /// Code candidates will submit at the desk
    pub code: CouponCode,

    /// Discount the coupon grants
    pub discount: Discount,

    /// Redemption cap. Zero means unlimited.
    pub max_uses: u32,

    /// Start of the validity window. Defaults to the creation time.
    pub valid_from: Option<Timestamp>,

    /// End of the validity window. Defaults to [`DEFAULT_VALIDITY`] after
    /// the start.
    pub valid_until: Option<Timestamp>,
}

/// A partial edit of an existing coupon. `None` fields keep their stored
/// values.
#[derive(Debug, Clone, Default)]
pub struct CouponUpdate {
    /// Replacement discount terms
    pub discount: Option<Discount>,

    /// Replacement redemption cap. Zero means unlimited.
    pub max_uses: Option<u32>,

    /// Replacement window start
    pub valid_from: Option<Timestamp>,

    /// Replacement window end
    pub valid_until: Option<Timestamp>,
}

/// Read-only coupon lookup used at checkout.
#[automock]
#[async_trait]
pub trait CouponDirectory: Send + Sync {
    /// Retrieves the coupon filed under the exact code, if any.
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DirectoryError>;
}

/// Records redemptions once a registration is paid.
#[automock]
#[async_trait]
pub trait RedemptionLedger: Send + Sync {
    /// Counts one redemption against the coupon's cap.
    async fn record_redemption(
        &self,
        code: &CouponCode,
        now: Timestamp,
    ) -> Result<Coupon, RedemptionError>;
}

/// In-memory coupon store keyed by code.
#[derive(Debug, Default)]
pub struct MemoryCouponDirectory {
    coupons: Mutex<FxHashMap<CouponCode, Coupon>>,
}

impl MemoryCouponDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory preloaded with the given coupons.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponAdminError`] if two coupons share a code or a
    /// validity window is inverted.
    pub fn with_coupons(
        coupons: impl IntoIterator<Item = Coupon>,
    ) -> Result<Self, CouponAdminError> {
        let directory = Self::new();

        for coupon in coupons {
            directory.insert(coupon)?;
        }

        Ok(directory)
    }

    /// Files a new coupon, switched on and with a zeroed redemption count.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponAdminError`] if the code is already taken, the
    /// window is inverted, or the store is unreachable.
    pub fn create(&self, new: NewCoupon, now: Timestamp) -> Result<Coupon, CouponAdminError> {
        let valid_from = new.valid_from.unwrap_or(now);
        let valid_until = new
            .valid_until
            .unwrap_or_else(|| {
                valid_from
                    .saturating_add(DEFAULT_VALIDITY)
                    .unwrap_or(Timestamp::MAX)
            });

        let coupon = Coupon {
            code: new.code,
            discount: new.discount,
            max_uses: new.max_uses,
            used_count: 0,
            valid_from,
            valid_until,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.insert(coupon.clone())?;

        info!(code = %coupon.code, "created coupon");

        Ok(coupon)
    }

    /// Edits a coupon, keeping any field the update leaves out.
    ///
    /// The merged record is checked before anything is written, so a
    /// rejected edit leaves the stored coupon untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponAdminError`] if the code is unknown, the merged
    /// window is inverted, or the store is unreachable.
    pub fn update(
        &self,
        code: &CouponCode,
        update: CouponUpdate,
        now: Timestamp,
    ) -> Result<Coupon, CouponAdminError> {
        let mut coupons = self.guard()?;

        let Some(coupon) = coupons.get_mut(code) else {
            return Err(CouponAdminError::NotFound(code.clone()));
        };

        let mut edited = coupon.clone();

        if let Some(discount) = update.discount {
            edited.discount = discount;
        }

        if let Some(max_uses) = update.max_uses {
            edited.max_uses = max_uses;
        }

        if let Some(valid_from) = update.valid_from {
            edited.valid_from = valid_from;
        }

        if let Some(valid_until) = update.valid_until {
            edited.valid_until = valid_until;
        }

        check_window(edited.valid_from, edited.valid_until)?;

        edited.updated_at = now;
        *coupon = edited.clone();

        info!(code = %edited.code, "updated coupon");

        Ok(edited)
    }

    /// Switches a coupon on or off without touching anything else.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponAdminError`] if the code is unknown or the store
    /// is unreachable.
    pub fn set_active(
        &self,
        code: &CouponCode,
        is_active: bool,
        now: Timestamp,
    ) -> Result<Coupon, CouponAdminError> {
        let mut coupons = self.guard()?;

        let Some(coupon) = coupons.get_mut(code) else {
            return Err(CouponAdminError::NotFound(code.clone()));
        };

        coupon.is_active = is_active;
        coupon.updated_at = now;

        info!(code = %coupon.code, is_active, "toggled coupon");

        Ok(coupon.clone())
    }

    /// Removes a coupon from the directory.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponAdminError`] if the code is unknown or the store
    /// is unreachable.
    pub fn delete(&self, code: &CouponCode) -> Result<(), CouponAdminError> {
        let mut coupons = self.guard()?;

        if coupons.remove(code).is_none() {
            return Err(CouponAdminError::NotFound(code.clone()));
        }

        info!(code = %code, "deleted coupon");

        Ok(())
    }

    /// All coupons on file, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] if the store is unreachable.
    pub fn list(&self) -> Result<Vec<Coupon>, DirectoryError> {
        let coupons = self.guard()?;

        let mut all: Vec<Coupon> = coupons.values().cloned().collect();
        all.sort_by_key(|coupon| Reverse(coupon.created_at));

        Ok(all)
    }

    fn insert(&self, coupon: Coupon) -> Result<(), CouponAdminError> {
        check_window(coupon.valid_from, coupon.valid_until)?;

        let mut coupons = self.guard()?;

        if coupons.contains_key(&coupon.code) {
            return Err(CouponAdminError::AlreadyExists(coupon.code));
        }

        coupons.insert(coupon.code.clone(), coupon);

        Ok(())
    }

    fn guard(&self) -> Result<MutexGuard<'_, FxHashMap<CouponCode, Coupon>>, DirectoryError> {
        self.coupons
            .lock()
            .map_err(|err| DirectoryError::Unreachable(err.to_string()))
    }
}

#[async_trait]
impl CouponDirectory for MemoryCouponDirectory {
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>, DirectoryError> {
        let coupons = self.guard()?;

        Ok(coupons.get(code).cloned())
    }
}

#[async_trait]
impl RedemptionLedger for MemoryCouponDirectory {
    async fn record_redemption(
        &self,
        code: &CouponCode,
        now: Timestamp,
    ) -> Result<Coupon, RedemptionError> {
        // Check and increment under one lock so concurrent redemptions
        // cannot push the count past the cap.
        let mut coupons = self.guard()?;

        let Some(coupon) = coupons.get_mut(code) else {
            return Err(RedemptionError::UnknownCode(code.clone()));
        };

        if coupon.is_exhausted() {
            return Err(RedemptionError::Exhausted(code.clone()));
        }

        coupon.used_count = coupon.used_count.saturating_add(1);
        coupon.updated_at = now;

        info!(code = %coupon.code, used_count = coupon.used_count, "recorded redemption");

        Ok(coupon.clone())
    }
}

fn check_window(from: Timestamp, until: Timestamp) -> Result<(), CouponAdminError> {
    if until < from {
        return Err(CouponAdminError::InvalidWindow { from, until });
    }

    Ok(())
}
