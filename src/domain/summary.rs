//! Values derived from a person's gift list: totals and budget status.
//!
//! Everything here is a pure function of its inputs. Nothing is cached on
//! the records, so derived values are always consistent with the store.

use std::fmt;

use crate::domain::{Gift, Person};

/// Sum of the prices of every gift, bought or not.
#[must_use]
pub fn total_cost(gifts: &[Gift]) -> f64 {
    gifts.iter().map(Gift::price).fold(0.0, |total, price| total + price)
}

/// Sum of the prices of the gifts that have been bought.
#[must_use]
pub fn total_spent(gifts: &[Gift]) -> f64 {
    gifts
        .iter()
        .filter(|gift| gift.purchased())
        .map(Gift::price)
        .fold(0.0, |total, price| total + price)
}

/// How a person's planned spending compares with their budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// No budget has been set.
    None,
    /// Planned spending is at or below the budget.
    Under,
    /// Planned spending exceeds the budget.
    Over,
}

impl BudgetStatus {
    /// Lowercase label for display and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Under => "under",
            Self::Over => "over",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare a person's planned spending with their budget.
///
/// The comparison uses the total cost of all gift ideas, not just the ones
/// already bought: the budget caps what is planned. Spending exactly the
/// budget counts as under.
#[must_use]
pub fn budget_status(person: &Person) -> BudgetStatus {
    if !person.has_budget() {
        return BudgetStatus::None;
    }
    if total_cost(person.gifts()) > person.budget() {
        BudgetStatus::Over
    } else {
        BudgetStatus::Under
    }
}

/// Renders money amounts for display.
pub trait CurrencyFormatter {
    /// Format `amount` as a currency string.
    fn format(&self, amount: f64) -> String;
}

/// US dollars, two decimal places, comma thousands separators: `$1,234.50`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}${grouped}.{cents}")
    }
}

/// Format an amount with the default formatter.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    UsdFormatter.format(amount)
}

/// A snapshot of the derived figures for one person.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Total price of all gift ideas.
    pub total_cost: f64,
    /// Total price of purchased gifts.
    pub total_spent: f64,
    /// The person's budget (`0` for none).
    pub budget: f64,
    /// Budget comparison.
    pub status: BudgetStatus,
    /// Number of gift ideas.
    pub gift_count: usize,
    /// Number of purchased gifts.
    pub purchased_count: usize,
}

impl Summary {
    /// Derive the summary for `person`.
    #[must_use]
    pub fn of(person: &Person) -> Self {
        let gifts = person.gifts();
        Self {
            total_cost: total_cost(gifts),
            total_spent: total_spent(gifts),
            budget: person.budget(),
            status: budget_status(person),
            gift_count: gifts.len(),
            purchased_count: gifts.iter().filter(|gift| gift.purchased()).count(),
        }
    }

    /// Budget left after the planned spending; negative when over.
    ///
    /// `None` when no budget is set.
    #[must_use]
    pub fn remaining(&self) -> Option<f64> {
        (self.status != BudgetStatus::None).then(|| self.budget - self.total_cost)
    }
}
