//! Checkout Example
//!
//! This example prices a candidate's subject selections from a fixture set,
//! assesses an optional coupon code, and prints the fee statement.
//!
//! Use `-f` to load a fixture set by name
//! Use `-c` to apply a coupon code at checkout
//! Use `-a` to assess the coupon at a fixed RFC 3339 instant instead of now
//!
//! Run with: `cargo run --example checkout -- -c EARLYBIRD20 -a 2026-06-01T12:00:00Z`

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bursar::{
    checkout::quote,
    fixtures::Fixture,
    statement::Statement,
    utils::{DemoCheckoutArgs, point_in_time},
};

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = DemoCheckoutArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let directory = fixture.directory()?;
    let now = point_in_time(args.at.as_deref())?;

    let selections = fixture.selections()?;

    let quote = quote(selections, args.coupon.as_deref(), now, &directory).await?;

    println!(
        "\n{}, {} department",
        fixture.exam_level()?,
        fixture.department()?
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Statement::new(selections, &quote).write_to(&mut handle)?;

    Ok(())
}
