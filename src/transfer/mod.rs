//! JSON export/import of the whole record set, plus CSV export of expenses.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrackerError};
use crate::models::{self, Budget, Expense};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportDocument {
    pub(crate) expenses: Vec<Expense>,
    pub(crate) budgets: Vec<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) export_date: Option<DateTime<Utc>>,
}

impl ExportDocument {
    pub(crate) fn new(expenses: Vec<Expense>, budgets: Vec<Budget>, exported_at: DateTime<Utc>) -> Self {
        Self {
            expenses,
            budgets,
            export_date: Some(exported_at),
        }
    }

    pub(crate) fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `expense-savvy-data-2025-04-30.json`
pub(crate) fn export_file_name(date: NaiveDate) -> String {
    format!("expense-savvy-data-{}.json", date.format("%Y-%m-%d"))
}

/// Parse and validate an export file. The returned document satisfies every
/// record invariant.
pub(crate) fn parse_import(raw: &str) -> Result<ExportDocument> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| TrackerError::Import(format!("not valid JSON ({e})")))?;
    let Some(object) = value.as_object() else {
        return Err(TrackerError::Import("expected a JSON object".into()));
    };
    for key in ["expenses", "budgets"] {
        if !object.get(key).is_some_and(Value::is_array) {
            return Err(TrackerError::Import(format!("missing or invalid \"{key}\"")));
        }
    }

    let document: ExportDocument =
        serde_json::from_value(value).map_err(|e| TrackerError::Import(e.to_string()))?;
    models::validate_records(&document.expenses, &document.budgets)
        .map_err(|e| TrackerError::Import(e.to_string()))?;
    Ok(document)
}

/// Write expenses as CSV in the order given. Returns the number of data rows.
pub(crate) fn write_expenses_csv(path: &Path, expenses: &[&Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "date", "category", "description", "amount"])?;
    for expense in expenses {
        let date = expense.date.format("%Y-%m-%d").to_string();
        let amount = format!("{:.2}", expense.amount);
        wtr.write_record([
            expense.id.as_str(),
            date.as_str(),
            expense.category.as_str(),
            expense.description.as_str(),
            amount.as_str(),
        ])?;
    }
    wtr.flush()?;
    tracing::debug!(rows = expenses.len(), path = %path.display(), "csv export written");
    Ok(expenses.len())
}
