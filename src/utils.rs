//! Utils

use clap::Parser;
use jiff::Timestamp;

/// Arguments for the checkout examples
#[derive(Debug, Parser)]
pub struct DemoCheckoutArgs {
    /// Fixture set to use for the registration & coupons
    #[clap(short, long, default_value = "standard")]
    pub fixture: String,

    /// Coupon code to apply at checkout
    #[clap(short, long)]
    pub coupon: Option<String>,

    /// Assess coupons at this RFC 3339 instant instead of now
    #[clap(short, long)]
    pub at: Option<String>,
}

/// Resolve an optional RFC 3339 argument to an instant, defaulting to now.
///
/// # Errors
///
/// Returns an error if the argument is present but not a valid timestamp.
pub fn point_in_time(at: Option<&str>) -> Result<Timestamp, jiff::Error> {
    at.map(str::parse::<Timestamp>)
        .transpose()
        .map(|parsed| parsed.unwrap_or_else(Timestamp::now))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn point_in_time_parses_an_explicit_instant() -> TestResult {
        let instant = point_in_time(Some("2026-06-01T12:00:00Z"))?;

        assert_eq!(instant, "2026-06-01T12:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn point_in_time_defaults_to_now() -> TestResult {
        let before = Timestamp::now();
        let instant = point_in_time(None)?;
        let after = Timestamp::now();

        assert!(instant >= before && instant <= after);

        Ok(())
    }

    #[test]
    fn point_in_time_rejects_garbage() {
        let result = point_in_time(Some("not-a-timestamp"));

        assert!(result.is_err());
    }
}
