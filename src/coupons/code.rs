//! Coupon Codes

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while wrapping a submitted code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    /// The submitted code was empty or whitespace-only
    #[error("Coupon code is required")]
    Blank,
}

/// A non-blank coupon code.
///
/// Codes are matched exactly as entered. No trimming, no case folding, so
/// `"SAVE20"` and `"save20"` name two different coupons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CouponCode(String);

impl CouponCode {
    /// Wraps a raw code, rejecting blank input.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::Blank`] if the code is empty or contains only
    /// whitespace.
    pub fn new(code: impl Into<String>) -> Result<Self, CodeError> {
        let code = code.into();

        if code.trim().is_empty() {
            return Err(CodeError::Blank);
        }

        Ok(Self(code))
    }

    /// The code exactly as it was entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CouponCode {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
