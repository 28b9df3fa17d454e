//! Fixtures

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, Department, ExamLevel},
    coupons::{
        Coupon,
        code::CodeError,
        directory::{CouponAdminError, MemoryCouponDirectory},
    },
    fixtures::{coupons::CouponsFixture, selections::SelectionsFixture},
    grades::FeeSchedule,
    selection::{SelectionError, SelectionSet},
};

pub mod coupons;
pub mod selections;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Coupon code rejected
    #[error("Invalid coupon code: {0}")]
    Code(#[from] CodeError),

    /// Catalog rejected a subject
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Selection could not be built
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Coupon records could not be filed
    #[error(transparent)]
    Coupons(#[from] CouponAdminError),

    /// No registration loaded
    #[error("No registration loaded; load a selections fixture first")]
    NoSelections,
}

/// A candidate registration loaded from a selections fixture.
#[derive(Debug)]
struct Registration {
    exam_level: ExamLevel,
    department: Department,
    selections: SelectionSet,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Subject catalog selections are checked against
    catalog: Catalog,

    /// Fee schedule used to price selections
    schedule: FeeSchedule,

    /// Registration loaded from a selections fixture
    registration: Option<Registration>,

    /// Coupons loaded from a coupons fixture
    coupons: Vec<Coupon>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::standard(),
            schedule: FeeSchedule::standard(),
            registration: None,
            coupons: Vec::new(),
        }
    }

    /// Load a registration from a YAML selections fixture
    ///
    /// Each subject is checked against the catalog before it is selected,
    /// so a fixture cannot register a candidate for a subject their
    /// department does not offer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a subject is
    /// not in the catalog, or the department does not offer it.
    pub fn load_selections(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("selections")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: SelectionsFixture = serde_norway::from_str(&contents)?;

        let mut selections = SelectionSet::new(self.schedule.currency());

        for (subject, grade) in fixture.subjects {
            self.catalog.ensure_offered(&subject, fixture.department)?;
            selections.select(subject, grade, &self.schedule)?;
        }

        self.registration = Some(Registration {
            exam_level: fixture.exam_level,
            department: fixture.department,
            selections,
        });

        Ok(self)
    }

    /// Load coupons from a YAML coupons fixture
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// coupon record is invalid.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for coupon_fixture in fixture.coupons.into_values() {
            self.coupons.push(coupon_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load a complete fixture set (selections and coupons with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_selections(name)?.load_coupons(name)?;

        Ok(fixture)
    }

    /// The loaded registration's selections
    ///
    /// # Errors
    ///
    /// Returns an error if no selections fixture has been loaded.
    pub fn selections(&self) -> Result<&SelectionSet, FixtureError> {
        self.registration
            .as_ref()
            .map(|registration| &registration.selections)
            .ok_or(FixtureError::NoSelections)
    }

    /// The loaded registration's examination level
    ///
    /// # Errors
    ///
    /// Returns an error if no selections fixture has been loaded.
    pub fn exam_level(&self) -> Result<ExamLevel, FixtureError> {
        self.registration
            .as_ref()
            .map(|registration| registration.exam_level)
            .ok_or(FixtureError::NoSelections)
    }

    /// The loaded registration's department
    ///
    /// # Errors
    ///
    /// Returns an error if no selections fixture has been loaded.
    pub fn department(&self) -> Result<Department, FixtureError> {
        self.registration
            .as_ref()
            .map(|registration| registration.department)
            .ok_or(FixtureError::NoSelections)
    }

    /// All loaded coupons
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// File the loaded coupons into a fresh in-memory directory
    ///
    /// # Errors
    ///
    /// Returns an error if two coupons share a code or a validity window
    /// is inverted.
    pub fn directory(&self) -> Result<MemoryCouponDirectory, FixtureError> {
        Ok(MemoryCouponDirectory::with_coupons(
            self.coupons.iter().cloned(),
        )?)
    }

    /// Fee schedule used to price the selections
    #[must_use]
    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Subject catalog selections are checked against
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
