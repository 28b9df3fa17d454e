//! Selections

use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::grades::{FeeSchedule, Grade};

/// Errors related to building or totalling a selection set.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The fee schedule charges in a different currency (schedule currency, set currency).
    #[error("Schedule charges in {0}, but selections are in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The subject has not been selected.
    #[error("Subject not selected: {0}")]
    NotSelected(String),
}

/// A subject the candidate is registered to sit, with its target grade and fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedSubject {
    /// Target grade the candidate is paying to be assessed at.
    pub grade: Grade,

    /// Registration fee, derived from the schedule at selection time.
    pub fee: Money<'static, Currency>,
}

/// The subjects a candidate has selected for one registration.
///
/// Each subject maps to exactly one grade; selecting a subject again
/// replaces its grade and fee. Fees always come from a schedule, never
/// from callers, so every entry carries the set's currency.
#[derive(Debug)]
pub struct SelectionSet {
    selections: FxHashMap<String, SelectedSubject>,
    currency: &'static Currency,
}

impl SelectionSet {
    /// Create an empty selection set.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        SelectionSet {
            selections: FxHashMap::default(),
            currency,
        }
    }

    /// Create a selection set from subject and grade pairs.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError` if the schedule's currency differs from
    /// the set's.
    pub fn with_selections<I, S>(entries: I, schedule: &FeeSchedule) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (S, Grade)>,
        S: Into<String>,
    {
        let mut set = Self::new(schedule.currency());

        for (subject, grade) in entries {
            set.select(subject, grade, schedule)?;
        }

        Ok(set)
    }

    /// Select a subject at a grade, deriving the fee from the schedule.
    ///
    /// Selecting an already-selected subject replaces its grade and fee.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError` if the schedule's currency differs from
    /// the set's.
    pub fn select(
        &mut self,
        subject: impl Into<String>,
        grade: Grade,
        schedule: &FeeSchedule,
    ) -> Result<(), SelectionError> {
        if schedule.currency() != self.currency {
            return Err(SelectionError::CurrencyMismatch(
                schedule.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.selections.insert(
            subject.into(),
            SelectedSubject {
                grade,
                fee: schedule.fee(grade),
            },
        );

        Ok(())
    }

    /// Withdraw a subject from the registration.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError::NotSelected` if the subject is not selected.
    pub fn withdraw(&mut self, subject: &str) -> Result<SelectedSubject, SelectionError> {
        self.selections
            .remove(subject)
            .ok_or_else(|| SelectionError::NotSelected(subject.to_string()))
    }

    /// Get a selection by subject name.
    ///
    /// # Errors
    ///
    /// Returns a `SelectionError::NotSelected` if the subject is not selected.
    pub fn get(&self, subject: &str) -> Result<&SelectedSubject, SelectionError> {
        self.selections
            .get(subject)
            .ok_or_else(|| SelectionError::NotSelected(subject.to_string()))
    }

    /// Calculate the subtotal of all selected subject fees.
    ///
    /// An empty set totals to zero in the set's currency.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if money arithmetic fails.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.selections
            .values()
            .try_fold(Money::from_minor(0, self.currency), |acc, selected| {
                acc.add(selected.fee)
            })
    }

    /// Iterate over the selected subjects.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectedSubject)> {
        self.selections
            .iter()
            .map(|(subject, selected)| (subject.as_str(), selected))
    }

    /// Get the number of selected subjects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Check if no subjects are selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Get the currency of the selection set.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
