//! Coupon Desk Example
//!
//! This example walks a coupon through its whole life at the registration
//! desk: created, listed, assessed, redeemed to its cap, paused, extended,
//! and finally removed.
//!
//! Use `-a` to run the desk at a fixed RFC 3339 instant instead of now
//!
//! Run with: `cargo run --example coupon_desk`

use anyhow::Result;
use clap::Parser;
use decimal_percentage::Percentage;
use jiff::SignedDuration;
use rusty_money::{Money, iso::XAF};
use tabled::{builder::Builder, settings::Style};
use tracing_subscriber::EnvFilter;

use bursar::{
    coupons::{
        Coupon,
        assess::{Assessment, assess},
        code::CouponCode,
        directory::{CouponUpdate, MemoryCouponDirectory, NewCoupon, RedemptionLedger},
    },
    discounts::Discount,
    utils::point_in_time,
};

/// Arguments for the coupon desk example
#[derive(Debug, Parser)]
struct CouponDeskArgs {
    /// Run the desk at this RFC 3339 instant instead of now
    #[clap(short, long)]
    at: Option<String>,
}

/// Coupon Desk Example
#[expect(clippy::print_stdout, reason = "Example code")]
#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CouponDeskArgs::parse();
    let now = point_in_time(args.at.as_deref())?;

    let directory = MemoryCouponDirectory::new();

    // A percentage coupon on the default thirty-day window, capped at two uses.
    let earlybird = CouponCode::new("EARLYBIRD20")?;

    directory.create(
        NewCoupon {
            code: earlybird.clone(),
            discount: Discount::PercentageOff(Percentage::from(0.20)),
            max_uses: 2,
            valid_from: None,
            valid_until: None,
        },
        now,
    )?;

    // A fixed-amount bursary with no usage cap and a longer window.
    let bursary = CouponCode::new("BURSARY25K")?;

    directory.create(
        NewCoupon {
            code: bursary.clone(),
            discount: Discount::AmountOff(Money::from_minor(25_000, XAF)),
            max_uses: 0,
            valid_from: None,
            valid_until: Some(now.saturating_add(SignedDuration::from_hours(90 * 24))?),
        },
        now,
    )?;

    println!("\nCoupons on file:\n{}", render_coupons(&directory.list()?));

    println!("\nAssessing codes at {now}:");
    println!("  EARLYBIRD20: {}", describe(&assess("EARLYBIRD20", now, &directory).await?));
    println!("  (blank):     {}", describe(&assess("", now, &directory).await?));
    println!("  TYPO2026:    {}", describe(&assess("TYPO2026", now, &directory).await?));

    println!("\nRedeeming EARLYBIRD20 against its cap of two:");

    for attempt in 1..=3 {
        match directory.record_redemption(&earlybird, now).await {
            Ok(coupon) => println!(
                "  redemption {attempt}: recorded, {} of {} used",
                coupon.used_count, coupon.max_uses
            ),
            Err(error) => println!("  redemption {attempt}: {error}"),
        }
    }

    println!("  EARLYBIRD20: {}", describe(&assess("EARLYBIRD20", now, &directory).await?));

    directory.set_active(&bursary, false, now)?;

    println!("\nPaused BURSARY25K:");
    println!("  BURSARY25K:  {}", describe(&assess("BURSARY25K", now, &directory).await?));

    let extended = directory.update(
        &earlybird,
        CouponUpdate {
            valid_until: Some(now.saturating_add(SignedDuration::from_hours(60 * 24))?),
            ..CouponUpdate::default()
        },
        now,
    )?;

    println!("\nExtended {} until {}", extended.code, extended.valid_until);

    directory.delete(&bursary)?;

    println!("\nCoupons on file after cleanup:\n{}", render_coupons(&directory.list()?));

    Ok(())
}

/// Render the coupon list as a table.
fn render_coupons(coupons: &[Coupon]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Discount", "Valid from", "Valid until", "Uses", "Active"]);

    for coupon in coupons {
        let uses = match coupon.remaining_uses() {
            Some(remaining) => format!(
                "{} of {} ({remaining} left)",
                coupon.used_count, coupon.max_uses
            ),
            None => format!("{} of ∞", coupon.used_count),
        };

        builder.push_record([
            coupon.code.to_string(),
            coupon.discount.to_string(),
            coupon.valid_from.to_string(),
            coupon.valid_until.to_string(),
            uses,
            if coupon.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());

    table.to_string()
}

/// One-line description of an assessment outcome.
fn describe(assessment: &Assessment) -> String {
    match assessment {
        Assessment::Accepted(discount) => format!("accepted, {discount}"),
        Assessment::Rejected(reason) => format!("rejected: {reason}"),
    }
}
