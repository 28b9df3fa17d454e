//! Bursar
//!
//! Bursar is the checkout core of an exam-registration and payment-tracking service: subject
//! selections priced from a fixed fee schedule, coupon assessment against a directory, and
//! printable fee statements.

pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod grades;
pub mod pricing;
pub mod selection;
pub mod statement;
pub mod utils;
