use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Budget, Category, Expense, Month};

fn expense(id: &str, day: u32, cents: i64, description: &str, category: Category) -> Expense {
    Expense {
        id: id.into(),
        date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap_or_default(),
        amount: Decimal::new(cents, 2),
        description: description.into(),
        category,
    }
}

/// Sample expenses used on first run or when stored expenses are unreadable.
pub(crate) fn seed_expenses() -> Vec<Expense> {
    vec![
        expense("1", 5, 2550, "Lunch with colleagues", Category::Food),
        expense("2", 7, 4500, "Uber to airport", Category::Transport),
        expense("3", 8, 1299, "Movie tickets", Category::Entertainment),
        expense("4", 10, 8999, "New shoes", Category::Shopping),
        expense("5", 12, 12000, "Electricity bill", Category::Utilities),
    ]
}

/// Sample budgets used on first run or when stored budgets are unreadable.
pub(crate) fn seed_budgets() -> Vec<Budget> {
    let Some(april) = Month::new(2025, 4) else {
        return Vec::new();
    };
    [
        (Category::Food, 400),
        (Category::Transport, 200),
        (Category::Entertainment, 150),
        (Category::Shopping, 300),
        (Category::Utilities, 250),
        (Category::Health, 100),
        (Category::Education, 50),
        (Category::Other, 200),
    ]
    .into_iter()
    .map(|(category, amount)| Budget::new(category, Decimal::from(amount), april))
    .collect()
}
