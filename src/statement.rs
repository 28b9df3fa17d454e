//! Statement
//!
//! Renders a quoted registration as a printable fee statement: one row per
//! selected subject, a charge summary, and a note when a submitted coupon
//! was turned away.

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::checkout::Quote;
use crate::coupons::assess::Assessment;
use crate::selection::{SelectedSubject, SelectionSet};

/// Errors that can occur when printing a statement.
#[derive(Debug, Error)]
pub enum StatementError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// A printable fee statement for one quoted registration.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    selections: &'a SelectionSet,
    quote: &'a Quote,
}

impl<'a> Statement<'a> {
    /// Pairs a selection set with the quote that priced it.
    #[must_use]
    pub fn new(selections: &'a SelectionSet, quote: &'a Quote) -> Self {
        Self { selections, quote }
    }

    /// Prints the statement.
    ///
    /// # Errors
    ///
    /// Returns a [`StatementError`] if the statement cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), StatementError> {
        write_subject_table(&mut out, self.selections)?;
        write_charge_summary(&mut out, self.quote)?;
        write_coupon_note(&mut out, self.quote)?;

        Ok(())
    }
}

fn write_subject_table(
    out: &mut impl io::Write,
    selections: &SelectionSet,
) -> Result<(), StatementError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Subject", "Grade", "Fee"]);

    let mut rows: Vec<(&str, &SelectedSubject)> = selections.iter().collect();
    rows.sort_unstable_by_key(|(subject, _)| *subject);

    for (idx, (subject, selected)) in rows.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            (*subject).to_string(),
            selected.grade.to_string(),
            format!("{}", selected.fee),
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..3), color_dark_grey());
    table.modify(Columns::new(3..4), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| StatementError::IO)
}

fn write_charge_summary(out: &mut impl io::Write, quote: &Quote) -> Result<(), StatementError> {
    let charge = quote.charge();
    let discount_points = percent_points_from_fractional_percentage(charge.savings_percent());

    let subtotal_label = " Subtotal:";
    let discount_label = " Discount:";
    let total_label = " \x1b[1mTotal:\x1b[0m";

    let subtotal_val = format!("{}  ", charge.subtotal());
    let discount_val = format!("({discount_points:.2}%) -{}  ", charge.discount_amount());
    let total_val = format!("{}  ", charge.total());

    let label_width = visible_width(subtotal_label)
        .max(visible_width(discount_label))
        .max(visible_width(total_label));

    let value_width = subtotal_val
        .len()
        .max(discount_val.len())
        .max(total_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;

    write_summary_line(
        out,
        discount_label,
        &discount_val,
        label_width,
        value_width,
    )?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| StatementError::IO)
}

fn write_coupon_note(out: &mut impl io::Write, quote: &Quote) -> Result<(), StatementError> {
    let Some(reason) = quote.assessment().and_then(Assessment::rejection) else {
        return Ok(());
    };

    writeln!(out, " Coupon not applied: {reason}").map_err(|_err| StatementError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. Runs of
/// consecutive border characters get a single grey escape sequence around
/// them; cell content is left untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), StatementError> {
    let label_vis = visible_width(label);
    let value_vis = visible_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| StatementError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
