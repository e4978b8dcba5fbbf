//! The mutation API. A `Tracker` owns the record store and is the only thing
//! that changes it; callers re-query after each call.

mod alert;
mod ids;

pub(crate) use alert::{AlertKind, BudgetAlert};
pub(crate) use ids::{IdGenerator, RandomIds};
#[cfg(test)]
pub(crate) use ids::SequentialIds;

use chrono::{DateTime, Utc};

use crate::error::{Result, TrackerError};
use crate::models::{self, Budget, Category, Expense, Month, NewExpense};
use crate::store::RecordStore;
use crate::summary::{self, MonthlySpending};
use crate::transfer::{self, ExportDocument};

const MAX_ID_ATTEMPTS: usize = 16;

/// Result of adding an expense.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddedExpense {
    pub(crate) expense: Expense,
    pub(crate) alert: Option<BudgetAlert>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upsert {
    Inserted,
    Replaced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportSummary {
    pub(crate) expenses: usize,
    pub(crate) budgets: usize,
}

pub(crate) struct Tracker {
    store: RecordStore,
    ids: Box<dyn IdGenerator>,
    current_month: Month,
}

impl Tracker {
    pub(crate) fn new(store: RecordStore, ids: Box<dyn IdGenerator>, current_month: Month) -> Self {
        Self {
            store,
            ids,
            current_month,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub(crate) fn list_expenses(&self) -> &[Expense] {
        self.store.expenses()
    }

    pub(crate) fn list_budgets(&self) -> &[Budget] {
        self.store.budgets()
    }

    pub(crate) fn expense(&self, id: &str) -> Option<&Expense> {
        self.store.expenses().iter().find(|e| e.id == id)
    }

    pub(crate) fn budget(&self, category: Category, month: Month) -> Option<&Budget> {
        Budget::find(self.store.budgets(), category, month)
    }

    pub(crate) fn monthly_spending(&self, month: Month) -> MonthlySpending {
        summary::monthly_spending(self.store.expenses(), self.store.budgets(), month)
    }

    pub(crate) fn current_month(&self) -> Month {
        self.current_month
    }

    pub(crate) fn set_current_month(&mut self, month: Month) {
        self.current_month = month;
    }

    /// Move the current month forwards or backwards and return the new value.
    pub(crate) fn step_month(&mut self, delta: i32) -> Month {
        self.current_month = self.current_month.shift(delta);
        self.current_month
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn add_expense(&mut self, new: NewExpense) -> Result<AddedExpense> {
        models::validate_new_expense(&new)?;
        let id = self.fresh_id()?;
        let expense = new.with_id(id);

        let mut next = self.store.expenses().to_vec();
        next.push(expense.clone());
        self.store.replace_expenses(next)?;
        tracing::debug!(id = %expense.id, category = %expense.category, "expense added");

        let alert = self.check_budget(&expense);
        Ok(AddedExpense { expense, alert })
    }

    /// Replace the expense with the same id. Returns `false` when no such
    /// expense exists.
    pub(crate) fn edit_expense(&mut self, expense: Expense) -> Result<bool> {
        models::validate_new_expense(&NewExpense::from(expense.clone()))?;
        let Some(index) = self.position_of(&expense.id) else {
            return Ok(false);
        };
        let mut next = self.store.expenses().to_vec();
        tracing::debug!(id = %expense.id, "expense edited");
        next[index] = expense;
        self.store.replace_expenses(next)?;
        Ok(true)
    }

    /// Remove the expense with `id`. Returns `false` when it was not there.
    pub(crate) fn delete_expense(&mut self, id: &str) -> Result<bool> {
        if self.position_of(id).is_none() {
            return Ok(false);
        }
        let next: Vec<Expense> = self
            .store
            .expenses()
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.store.replace_expenses(next)?;
        tracing::debug!(id, "expense deleted");
        Ok(true)
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.store.expenses().iter().position(|e| e.id == id)
    }

    fn fresh_id(&mut self) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty() && self.position_of(&id).is_none() {
                return Ok(id);
            }
        }
        Err(TrackerError::validation(
            "id",
            "id generator kept returning ids already in use",
        ))
    }

    fn check_budget(&self, expense: &Expense) -> Option<BudgetAlert> {
        let month = expense.month();
        let budget = self.budget(expense.category, month)?;
        // The new expense is already in the store, so this includes it.
        let spent = summary::category_spent(self.store.expenses(), expense.category, month);
        let alert = BudgetAlert::evaluate(budget, spent)?;
        match alert.kind {
            AlertKind::Exceeded { overage } => tracing::warn!(
                category = %alert.category,
                month = %alert.month,
                %overage,
                "budget exceeded"
            ),
            AlertKind::Approaching { percent_used } => tracing::info!(
                category = %alert.category,
                month = %alert.month,
                %percent_used,
                "approaching budget"
            ),
        }
        Some(alert)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Insert the budget, or replace the one with the same category and
    /// month in place.
    pub(crate) fn upsert_budget(&mut self, budget: Budget) -> Result<Upsert> {
        models::validate_budget(&budget)?;
        let mut next = self.store.budgets().to_vec();
        let outcome = match next.iter().position(|b| b.key() == budget.key()) {
            Some(index) => {
                next[index] = budget;
                Upsert::Replaced
            }
            None => {
                next.push(budget);
                Upsert::Inserted
            }
        };
        self.store.replace_budgets(next)?;
        tracing::debug!(?outcome, "budget saved");
        Ok(outcome)
    }

    /// Remove the budget for `(category, month)`. Returns `false` when there
    /// was none.
    pub(crate) fn delete_budget(&mut self, category: Category, month: Month) -> Result<bool> {
        if self.budget(category, month).is_none() {
            return Ok(false);
        }
        let next: Vec<Budget> = self
            .store
            .budgets()
            .iter()
            .filter(|b| !b.matches(category, month))
            .cloned()
            .collect();
        self.store.replace_budgets(next)?;
        tracing::debug!(category = %category, month = %month, "budget deleted");
        Ok(true)
    }

    // ── Data management ───────────────────────────────────────

    pub(crate) fn export_document(&self, exported_at: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(
            self.store.expenses().to_vec(),
            self.store.budgets().to_vec(),
            exported_at,
        )
    }

    /// Replace every expense and budget with the contents of an export file.
    /// Nothing changes unless the whole file is valid.
    pub(crate) fn import_document(&mut self, raw: &str) -> Result<ImportSummary> {
        let document = transfer::parse_import(raw)?;
        let summary = ImportSummary {
            expenses: document.expenses.len(),
            budgets: document.budgets.len(),
        };
        self.store.replace_all(document.expenses, document.budgets)?;
        tracing::info!(
            expenses = summary.expenses,
            budgets = summary.budgets,
            "data imported"
        );
        Ok(summary)
    }

    pub(crate) fn reset(&mut self) -> Result<()> {
        self.store.reset()?;
        tracing::info!("all data reset");
        Ok(())
    }
}
