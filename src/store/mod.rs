//! In-memory expense and budget collections mirrored to a [`BlobStore`].
//!
//! Each collection is one JSON document. Writes go to the blob store first and
//! are swapped into memory only once they succeed, so memory never runs ahead
//! of disk.

mod seed;

pub(crate) use seed::{seed_budgets, seed_expenses};

use serde::de::DeserializeOwned;

use crate::db::BlobStore;
use crate::error::Result;
use crate::models::{self, Budget, Expense};

pub(crate) const EXPENSES_KEY: &str = "expenses";
pub(crate) const BUDGETS_KEY: &str = "budgets";

pub(crate) struct RecordStore {
    blobs: Box<dyn BlobStore>,
    expenses: Vec<Expense>,
    budgets: Vec<Budget>,
}

impl RecordStore {
    /// Restore both collections. A missing or unreadable document falls back
    /// to the seed data for that collection; only a failing read of the blob
    /// store itself is an error.
    pub(crate) fn load(blobs: Box<dyn BlobStore>) -> Result<Self> {
        let expenses = load_collection(
            blobs.as_ref(),
            EXPENSES_KEY,
            models::validate_expenses,
            seed_expenses,
        )?;
        let budgets = load_collection(
            blobs.as_ref(),
            BUDGETS_KEY,
            models::validate_budgets,
            seed_budgets,
        )?;
        tracing::debug!(
            expenses = expenses.len(),
            budgets = budgets.len(),
            "record store loaded"
        );
        Ok(Self {
            blobs,
            expenses,
            budgets,
        })
    }

    /// Expenses in insertion order.
    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub(crate) fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub(crate) fn replace_expenses(&mut self, next: Vec<Expense>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.blobs.put(EXPENSES_KEY, &json)?;
        self.expenses = next;
        Ok(())
    }

    pub(crate) fn replace_budgets(&mut self, next: Vec<Budget>) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.blobs.put(BUDGETS_KEY, &json)?;
        self.budgets = next;
        Ok(())
    }

    pub(crate) fn replace_all(&mut self, expenses: Vec<Expense>, budgets: Vec<Budget>) -> Result<()> {
        let expenses_json = serde_json::to_string(&expenses)?;
        let budgets_json = serde_json::to_string(&budgets)?;
        self.blobs.put_many(&[
            (EXPENSES_KEY, expenses_json.as_str()),
            (BUDGETS_KEY, budgets_json.as_str()),
        ])?;
        self.expenses = expenses;
        self.budgets = budgets;
        Ok(())
    }

    /// Drop all persisted state. Empty collections are written back so the
    /// next load starts empty instead of seeded.
    pub(crate) fn reset(&mut self) -> Result<()> {
        self.blobs.reset_to(&[(EXPENSES_KEY, "[]"), (BUDGETS_KEY, "[]")])?;
        self.expenses.clear();
        self.budgets.clear();
        Ok(())
    }
}

fn load_collection<T: DeserializeOwned>(
    blobs: &dyn BlobStore,
    key: &str,
    validate: fn(&[T]) -> Result<()>,
    seed: fn() -> Vec<T>,
) -> Result<Vec<T>> {
    let Some(raw) = blobs.get(key)? else {
        tracing::info!(key, "no stored data; using seed records");
        return Ok(seed());
    };

    let parsed = serde_json::from_str::<Vec<T>>(&raw)
        .map_err(crate::error::TrackerError::from)
        .and_then(|records| validate(&records).map(|()| records));

    match parsed {
        Ok(records) => Ok(records),
        Err(error) => {
            tracing::error!(
                key,
                error = %error,
                "failed to parse stored records; falling back to seed data",
            );
            Ok(seed())
        }
    }
}
