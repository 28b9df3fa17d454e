//! Grades

use std::fmt;

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};

/// Letter grade a candidate registers to sit a subject at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// Grade A
    A,
    /// Grade B
    B,
    /// Grade C
    C,
    /// Grade D
    D,
    /// Grade E
    E,
    /// Grade F
    F,
}

impl Grade {
    /// All grades, best first.
    pub const ALL: [Grade; 6] = [
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    /// The grade letter as printed on registration forms.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration fee schedule, keyed by grade.
///
/// Fees are fixed per grade; callers never supply their own amounts.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    currency: &'static Currency,
}

impl FeeSchedule {
    /// The standard schedule, charged in Central African francs.
    #[must_use]
    pub const fn standard() -> Self {
        Self::denominated_in(iso::XAF)
    }

    /// The same fee table collected in another currency.
    ///
    /// Registration centres abroad collect the same figures in their local
    /// denomination.
    #[must_use]
    pub const fn denominated_in(currency: &'static Currency) -> Self {
        Self { currency }
    }

    /// Registration fee for sitting a subject at the given grade.
    #[must_use]
    pub fn fee(&self, grade: Grade) -> Money<'static, Currency> {
        let minor = match grade {
            Grade::A => 50_000,
            Grade::B => 40_000,
            Grade::C => 30_000,
            Grade::D => 20_000,
            Grade::E => 15_000,
            Grade::F => 10_000,
        };

        Money::from_minor(minor, self.currency)
    }

    /// Currency the schedule charges in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
