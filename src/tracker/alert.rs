use rust_decimal::Decimal;

use crate::models::{Budget, Category, Month};
use crate::summary::percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AlertKind {
    /// Spending went past the budget by `overage`.
    Exceeded { overage: Decimal },
    /// Spending is within the last 10% of the budget.
    Approaching { percent_used: Decimal },
}

/// Budget threshold notification produced by adding an expense.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetAlert {
    pub(crate) category: Category,
    pub(crate) month: Month,
    pub(crate) spent: Decimal,
    pub(crate) limit: Decimal,
    pub(crate) kind: AlertKind,
}

impl BudgetAlert {
    /// Evaluate the threshold rules for `spent` against a budget. `spent`
    /// already includes the expense that triggered the check.
    pub(crate) fn evaluate(budget: &Budget, spent: Decimal) -> Option<Self> {
        let limit = budget.amount;
        let kind = if spent > limit {
            AlertKind::Exceeded {
                overage: spent.saturating_sub(limit),
            }
        } else if spent >= limit.saturating_mul(Decimal::new(9, 1)) {
            AlertKind::Approaching {
                percent_used: percentage(spent, limit),
            }
        } else {
            return None;
        };
        Some(Self {
            category: budget.category,
            month: budget.month,
            spent,
            limit,
            kind,
        })
    }

    pub(crate) fn severity(&self) -> Severity {
        match self.kind {
            AlertKind::Exceeded { .. } => Severity::Warning,
            AlertKind::Approaching { .. } => Severity::Info,
        }
    }

    pub(crate) fn message(&self) -> String {
        match self.kind {
            AlertKind::Exceeded { .. } => format!("Budget exceeded for {}!", self.category),
            AlertKind::Approaching { .. } => format!("Budget alert for {}", self.category),
        }
    }

    pub(crate) fn detail(&self) -> Option<String> {
        let detail = match self.kind {
            AlertKind::Exceeded { overage } => format!(
                "You've spent {:.2} out of {:.2} budget ({:.2} over).",
                self.spent, self.limit, overage
            ),
            AlertKind::Approaching { percent_used } => {
                format!("You've used {}% of your budget.", percent_used.round())
            }
        };
        Some(detail)
    }
}
