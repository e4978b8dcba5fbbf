use rust_decimal::Decimal;

use crate::models::{Budget, Category, Expense, Month};

/// Expense list criteria. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseFilter {
    pub(crate) month: Option<Month>,
    pub(crate) search: Option<String>,
    pub(crate) category: Option<Category>,
}

pub(crate) struct FilteredExpenses<'a> {
    /// Newest first.
    pub(crate) expenses: Vec<&'a Expense>,
    pub(crate) total: Decimal,
}

impl ExpenseFilter {
    pub(crate) fn for_month(month: Month) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub(crate) fn matches(&self, expense: &Expense) -> bool {
        let in_month = self.month.map_or(true, |m| expense.is_in(m));
        let in_category = self.category.map_or(true, |c| expense.category == c);
        let matches_search = self.search.as_deref().map_or(true, |term| {
            expense
                .description
                .to_lowercase()
                .contains(&term.to_lowercase())
        });
        in_month && in_category && matches_search
    }

    pub(crate) fn apply<'a>(&self, expenses: &'a [Expense]) -> FilteredExpenses<'a> {
        let mut matched: Vec<&Expense> = expenses.iter().filter(|e| self.matches(e)).collect();
        // Stable sort keeps insertion order for same-day expenses
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        let total = super::saturating_sum(matched.iter().map(|e| e.amount));
        FilteredExpenses {
            expenses: matched,
            total,
        }
    }
}

/// The `n` most recent expenses across all months.
pub(crate) fn recent_expenses(expenses: &[Expense], n: usize) -> Vec<&Expense> {
    let mut all = ExpenseFilter::default().apply(expenses).expenses;
    all.truncate(n);
    all
}

pub(crate) fn budgets_for_month(budgets: &[Budget], month: Month) -> Vec<&Budget> {
    budgets.iter().filter(|b| b.month == month).collect()
}

/// Categories with no budget set for `month`, in category order.
pub(crate) fn unbudgeted_categories(budgets: &[Budget], month: Month) -> Vec<Category> {
    Category::all()
        .iter()
        .copied()
        .filter(|&c| Budget::find(budgets, c, month).is_none())
        .collect()
}
