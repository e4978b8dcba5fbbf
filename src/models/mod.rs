mod budget;
mod category;
mod expense;
mod month;

pub use budget::Budget;
pub use category::Category;
pub use expense::{Expense, NewExpense};
pub use month::Month;

use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::error::{Result, TrackerError};

/// Largest accepted expense or budget amount, in whole units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Amounts are stored as JSON numbers; at most two decimal places below
/// `MAX_AMOUNT` read back exactly.
const MAX_AMOUNT_SCALE: u32 = 2;

pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(TrackerError::validation(
            "amount",
            format!("must be greater than zero, got {amount}"),
        ));
    }
    if amount > Decimal::from(MAX_AMOUNT) {
        return Err(TrackerError::validation(
            "amount",
            format!("must not exceed {MAX_AMOUNT}, got {amount}"),
        ));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(TrackerError::validation(
            "amount",
            format!("must have at most {MAX_AMOUNT_SCALE} decimal places, got {amount}"),
        ));
    }
    Ok(())
}

pub fn validate_new_expense(expense: &NewExpense) -> Result<()> {
    validate_amount(expense.amount)?;
    if expense.description.trim().is_empty() {
        return Err(TrackerError::validation("description", "must not be empty"));
    }
    Ok(())
}

pub fn validate_budget(budget: &Budget) -> Result<()> {
    validate_amount(budget.amount)
}

/// Check a whole record set against the per-record rules plus id and
/// `(category, month)` uniqueness.
pub fn validate_records(expenses: &[Expense], budgets: &[Budget]) -> Result<()> {
    validate_expenses(expenses)?;
    validate_budgets(budgets)
}

pub fn validate_expenses(expenses: &[Expense]) -> Result<()> {
    let mut ids = HashSet::new();
    for expense in expenses {
        if expense.id.is_empty() {
            return Err(TrackerError::validation("id", "must not be empty"));
        }
        if !ids.insert(expense.id.as_str()) {
            return Err(TrackerError::validation(
                "id",
                format!("duplicate expense id '{}'", expense.id),
            ));
        }
        validate_new_expense(&NewExpense::from(expense.clone()))?;
    }
    Ok(())
}

pub fn validate_budgets(budgets: &[Budget]) -> Result<()> {
    let mut keys = HashSet::new();
    for budget in budgets {
        if !keys.insert(budget.key()) {
            return Err(TrackerError::validation(
                "budget",
                format!("duplicate budget for {} in {}", budget.category, budget.month),
            ));
        }
        validate_budget(budget)?;
    }
    Ok(())
}
