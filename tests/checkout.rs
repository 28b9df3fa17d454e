//! Integration tests for fixture-driven checkout

use jiff::Timestamp;
use rusty_money::{Money, iso::XAF};
use testresult::TestResult;

use bursar::{
    checkout::{QuoteError, quote},
    coupons::{
        assess::{Assessment, RejectionReason},
        directory::{DirectoryError, MockCouponDirectory},
    },
    fixtures::Fixture,
};

/// Mid-season instant inside the 2026 coupon windows.
const MIDYEAR: &str = "2026-06-01T12:00:00Z";

fn midyear() -> Timestamp {
    MIDYEAR.parse().expect("timestamp should parse")
}

#[tokio::test]
async fn standard_set_without_a_coupon_charges_the_full_fee() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(fixture.selections()?, None, midyear(), &directory).await?;

    // Mathematics at A (50 000) + Physics at B (40 000)
    assert_eq!(quote.charge().subtotal(), Money::from_minor(90_000, XAF));
    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert!(quote.assessment().is_none());

    Ok(())
}

#[tokio::test]
async fn percentage_coupon_discounts_the_standard_fee() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("EARLYBIRD20"),
        midyear(),
        &directory,
    )
    .await?;

    // 20% off 90 000
    assert_eq!(quote.charge().discount_amount(), Money::from_minor(18_000, XAF));
    assert_eq!(quote.charge().total(), Money::from_minor(72_000, XAF));
    assert!(quote.assessment().is_some_and(Assessment::is_accepted));

    Ok(())
}

#[tokio::test]
async fn oversized_bursary_takes_the_fee_to_zero_not_below() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("BURSARY100K"),
        midyear(),
        &directory,
    )
    .await?;

    // 100 000 off a 90 000 fee clamps at zero
    assert_eq!(quote.charge().discount_amount(), Money::from_minor(90_000, XAF));
    assert_eq!(quote.charge().total(), Money::from_minor(0, XAF));

    Ok(())
}

#[tokio::test]
async fn expired_coupon_is_rejected_and_the_fee_stands() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("LASTSEASON"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::Expired)
    );

    Ok(())
}

#[tokio::test]
async fn paused_coupon_is_rejected_as_disabled() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("PAUSED10"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::Disabled)
    );

    Ok(())
}

#[tokio::test]
async fn fully_redeemed_coupon_is_rejected() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("TENSEATS"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::FullyRedeemed)
    );

    Ok(())
}

#[tokio::test]
async fn next_season_coupon_is_rejected_as_not_yet_valid() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("NEXTYEAR15"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::NotYetStarted)
    );

    Ok(())
}

#[tokio::test]
async fn unknown_code_is_a_rejection_not_an_error() -> TestResult {
    let fixture = Fixture::from_set("standard")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("NOSUCHCODE"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::UnknownCode)
    );

    Ok(())
}

#[tokio::test]
async fn blank_code_never_reaches_the_directory() -> TestResult {
    let fixture = Fixture::from_set("standard")?;

    let mut directory = MockCouponDirectory::new();
    directory.expect_find_by_code().never();

    let quote = quote(fixture.selections()?, Some("   "), midyear(), &directory).await?;

    assert_eq!(quote.charge().total(), Money::from_minor(90_000, XAF));
    assert_eq!(
        quote.assessment().and_then(Assessment::rejection),
        Some(RejectionReason::BlankCode)
    );

    Ok(())
}

#[tokio::test]
async fn unreachable_directory_fails_the_quote() -> TestResult {
    let fixture = Fixture::from_set("standard")?;

    let mut directory = MockCouponDirectory::new();

    directory
        .expect_find_by_code()
        .return_once(|_| Err(DirectoryError::Unreachable("store offline".to_string())));

    let result = quote(
        fixture.selections()?,
        Some("EARLYBIRD20"),
        midyear(),
        &directory,
    )
    .await;

    assert!(
        matches!(result, Err(QuoteError::Directory(_))),
        "expected a directory error, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn technical_set_prices_an_ordinary_level_registration() -> TestResult {
    let fixture = Fixture::from_set("technical")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("TRADEFAIR30"),
        midyear(),
        &directory,
    )
    .await?;

    // Woodwork at C (30 000) + Technical Drawing at B (40 000) + Metalwork at D (20 000)
    assert_eq!(quote.charge().subtotal(), Money::from_minor(90_000, XAF));

    // 30% off 90 000
    assert_eq!(quote.charge().total(), Money::from_minor(63_000, XAF));

    Ok(())
}

#[tokio::test]
async fn fixed_coupon_subtracts_its_face_value() -> TestResult {
    let fixture = Fixture::from_set("technical")?;
    let directory = fixture.directory()?;

    let quote = quote(
        fixture.selections()?,
        Some("WORKSHOP5K"),
        midyear(),
        &directory,
    )
    .await?;

    assert_eq!(quote.charge().discount_amount(), Money::from_minor(5_000, XAF));
    assert_eq!(quote.charge().total(), Money::from_minor(85_000, XAF));

    Ok(())
}
