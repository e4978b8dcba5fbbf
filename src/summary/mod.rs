//! Derived spending views. Everything here is a pure function of the current
//! expense and budget slices; nothing is cached.

mod filter;

pub(crate) use filter::{budgets_for_month, recent_expenses, unbudgeted_categories, ExpenseFilter};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, Category, Expense, Month};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CategorySpending {
    pub(crate) category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) percentage: Decimal,
}

impl CategorySpending {
    pub(crate) fn is_over_budget(&self) -> bool {
        self.percentage > Decimal::ONE_HUNDRED
    }

    /// Has a budget or any spending this month.
    pub(crate) fn is_active(&self) -> bool {
        self.budget > Decimal::ZERO || self.amount > Decimal::ZERO
    }

    /// Budget left over; negative once overspent. Zero when unbudgeted.
    pub(crate) fn remaining(&self) -> Decimal {
        if self.budget > Decimal::ZERO {
            self.budget.saturating_sub(self.amount)
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MonthlySpending {
    pub(crate) month: Month,
    #[serde(with = "rust_decimal::serde::float")]
    pub(crate) total: Decimal,
    /// One entry per category, in `Category::all()` order.
    pub(crate) by_category: Vec<CategorySpending>,
}

impl MonthlySpending {
    pub(crate) fn category(&self, category: Category) -> Option<&CategorySpending> {
        self.by_category.iter().find(|c| c.category == category)
    }

    pub(crate) fn total_budget(&self) -> Decimal {
        saturating_sum(self.by_category.iter().map(|c| c.budget))
    }

    /// Total spending as a percentage of the month's combined budget.
    pub(crate) fn budget_utilization(&self) -> Decimal {
        percentage(self.total, self.total_budget())
    }

    pub(crate) fn over_budget(&self) -> impl Iterator<Item = &CategorySpending> {
        self.by_category.iter().filter(|c| c.is_over_budget())
    }

    pub(crate) fn active(&self) -> impl Iterator<Item = &CategorySpending> {
        self.by_category.iter().filter(|c| c.is_active())
    }
}

/// `amount / budget * 100`, or zero when there is no budget. Ratios too
/// large to represent are pinned at `Decimal::MAX`.
pub(crate) fn percentage(amount: Decimal, budget: Decimal) -> Decimal {
    if budget <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount
        .checked_div(budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

/// Adds amounts, clamping at `Decimal::MAX` instead of overflowing.
pub(crate) fn saturating_sum(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of expenses in one category for one month.
pub(crate) fn category_spent(expenses: &[Expense], category: Category, month: Month) -> Decimal {
    saturating_sum(
        expenses
            .iter()
            .filter(|e| e.category == category && e.is_in(month))
            .map(|e| e.amount),
    )
}

pub(crate) fn monthly_spending(expenses: &[Expense], budgets: &[Budget], month: Month) -> MonthlySpending {
    let in_month: Vec<&Expense> = expenses.iter().filter(|e| e.is_in(month)).collect();
    let total = saturating_sum(in_month.iter().map(|e| e.amount));

    let by_category = Category::all()
        .iter()
        .map(|&category| {
            let amount = saturating_sum(
                in_month
                    .iter()
                    .filter(|e| e.category == category)
                    .map(|e| e.amount),
            );
            let budget = Budget::find(budgets, category, month).map_or(Decimal::ZERO, |b| b.amount);
            CategorySpending {
                category,
                amount,
                budget,
                percentage: percentage(amount, budget),
            }
        })
        .collect();

    MonthlySpending {
        month,
        total,
        by_category,
    }
}

#[cfg(test)]
mod tests;
