use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Category, Month};

/// Spending ceiling for one category in one month. At most one per
/// `(category, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub category: Category,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub month: Month,
}

impl Budget {
    pub fn new(category: Category, amount: Decimal, month: Month) -> Self {
        Self {
            category,
            amount,
            month,
        }
    }

    pub fn key(&self) -> (Category, Month) {
        (self.category, self.month)
    }

    pub fn matches(&self, category: Category, month: Month) -> bool {
        self.category == category && self.month == month
    }

    /// Find the budget for a key in a slice.
    pub fn find(budgets: &[Budget], category: Category, month: Month) -> Option<&Budget> {
        budgets.iter().find(|b| b.matches(category, month))
    }
}
