use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Month};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
}

impl Expense {
    pub fn month(&self) -> Month {
        Month::of(self.date)
    }

    pub fn is_in(&self, month: Month) -> bool {
        month.contains(self.date)
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, fields: NewExpense) {
        self.date = fields.date;
        self.amount = fields.amount;
        self.description = fields.description;
        self.category = fields.category;
    }
}

/// An expense that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
    pub category: Category,
}

impl NewExpense {
    pub fn new(date: NaiveDate, amount: Decimal, description: String, category: Category) -> Self {
        Self {
            date,
            amount,
            description,
            category,
        }
    }

    pub fn with_id(self, id: String) -> Expense {
        Expense {
            id,
            date: self.date,
            amount: self.amount,
            description: self.description,
            category: self.category,
        }
    }
}

impl From<Expense> for NewExpense {
    fn from(expense: Expense) -> Self {
        Self {
            date: expense.date,
            amount: expense.amount,
            description: expense.description,
            category: expense.category,
        }
    }
}

/// Dates are written as `YYYY-MM-DD`. Older browser exports stored a full
/// ISO-8601 timestamp; those are read back as the local calendar date.
mod iso_date {
    use chrono::{DateTime, Local, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub(super) fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Local).date_naive())
            .map_err(|_| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }
}
