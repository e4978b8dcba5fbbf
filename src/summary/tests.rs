#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn month(s: &str) -> Month {
    s.parse().unwrap()
}

fn make_expense(id: &str, date: &str, amount: Decimal, category: Category, description: &str) -> Expense {
    Expense {
        id: id.into(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        description: description.into(),
        category,
    }
}

fn sample_expenses() -> Vec<Expense> {
    vec![
        make_expense("1", "2025-04-05", dec!(25.50), Category::Food, "Lunch with colleagues"),
        make_expense("2", "2025-04-07", dec!(45.00), Category::Transport, "Uber to airport"),
        make_expense("3", "2025-04-20", dec!(14.50), Category::Food, "Groceries"),
        make_expense("4", "2025-03-31", dec!(99.00), Category::Food, "March dinner"),
        make_expense("5", "2025-05-01", dec!(10.00), Category::Health, "Pharmacy"),
    ]
}

fn sample_budgets() -> Vec<Budget> {
    vec![
        Budget::new(Category::Food, dec!(50), month("2025-04")),
        Budget::new(Category::Transport, dec!(30), month("2025-04")),
        Budget::new(Category::Health, dec!(100), month("2025-05")),
    ]
}

// ── Monthly spending ──────────────────────────────────────────

#[test]
fn test_always_eight_categories_in_fixed_order() {
    for m in ["2025-04", "1999-01", "2030-12"] {
        let summary = monthly_spending(&sample_expenses(), &sample_budgets(), month(m));
        let order: Vec<Category> = summary.by_category.iter().map(|c| c.category).collect();
        assert_eq!(order, Category::all());
    }
}

#[test]
fn test_empty_store_is_all_zero() {
    let summary = monthly_spending(&[], &[], month("2025-04"));
    assert_eq!(summary.total, Decimal::ZERO);
    assert_eq!(summary.by_category.len(), 8);
    assert!(summary
        .by_category
        .iter()
        .all(|c| c.amount.is_zero() && c.budget.is_zero() && c.percentage.is_zero()));
}

#[test]
fn test_totals_only_count_the_month() {
    let summary = monthly_spending(&sample_expenses(), &sample_budgets(), month("2025-04"));
    assert_eq!(summary.month, month("2025-04"));
    assert_eq!(summary.total, dec!(85.00));
    let food = summary.category(Category::Food).unwrap();
    assert_eq!(food.amount, dec!(40.00));
    assert_eq!(food.budget, dec!(50));
    assert_eq!(food.percentage, dec!(80));
    let health = summary.category(Category::Health).unwrap();
    assert_eq!(health.amount, Decimal::ZERO);
    assert_eq!(health.budget, Decimal::ZERO);
}

#[test]
fn test_total_equals_sum_of_categories() {
    let expenses = sample_expenses();
    for m in ["2025-03", "2025-04", "2025-05", "2025-06"] {
        let summary = monthly_spending(&expenses, &sample_budgets(), month(m));
        let by_category: Decimal = summary.by_category.iter().map(|c| c.amount).sum();
        let direct: Decimal = expenses
            .iter()
            .filter(|e| e.date.format("%Y-%m").to_string() == m)
            .map(|e| e.amount)
            .sum();
        assert_eq!(summary.total, by_category);
        assert_eq!(summary.total, direct);
    }
}

#[test]
fn test_percentage_without_budget_is_zero() {
    let expenses = vec![make_expense("1", "2025-04-01", dec!(30), Category::Shopping, "Shirt")];
    let summary = monthly_spending(&expenses, &[], month("2025-04"));
    let shopping = summary.category(Category::Shopping).unwrap();
    assert_eq!(shopping.amount, dec!(30));
    assert_eq!(shopping.percentage, Decimal::ZERO);
    assert!(!shopping.is_over_budget());
    assert!(shopping.is_active());
}

#[test]
fn test_over_budget_percentage_is_exact() {
    let expenses = vec![make_expense("1", "2025-04-05", dec!(25.50), Category::Food, "Lunch")];
    let budgets = vec![Budget::new(Category::Food, dec!(20), month("2025-04"))];
    let summary = monthly_spending(&expenses, &budgets, month("2025-04"));
    let food = summary.category(Category::Food).unwrap();
    assert_eq!(food.percentage, dec!(127.5));
    assert!(food.is_over_budget());
    assert_eq!(food.remaining(), dec!(-5.50));
    let over: Vec<Category> = summary.over_budget().map(|c| c.category).collect();
    assert_eq!(over, vec![Category::Food]);
}

#[test]
fn test_idempotent() {
    let expenses = sample_expenses();
    let budgets = sample_budgets();
    let first = monthly_spending(&expenses, &budgets, month("2025-04"));
    let second = monthly_spending(&expenses, &budgets, month("2025-04"));
    assert_eq!(first, second);
}

#[test]
fn test_budget_totals_and_utilization() {
    let summary = monthly_spending(&sample_expenses(), &sample_budgets(), month("2025-04"));
    assert_eq!(summary.total_budget(), dec!(80));
    // 85 / 80 * 100
    assert_eq!(summary.budget_utilization(), dec!(106.25));
    let active: Vec<Category> = summary.active().map(|c| c.category).collect();
    assert_eq!(active, vec![Category::Food, Category::Transport]);

    let empty = monthly_spending(&[], &[], month("2025-04"));
    assert_eq!(empty.budget_utilization(), Decimal::ZERO);
}

#[test]
fn test_summary_json_shape() {
    let summary = monthly_spending(&sample_expenses(), &sample_budgets(), month("2025-04"));
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["month"], "2025-04");
    assert_eq!(value["total"].as_f64(), Some(85.0));
    assert_eq!(value["byCategory"].as_array().unwrap().len(), 8);
    assert_eq!(value["byCategory"][0]["category"], "Food");
    assert_eq!(value["byCategory"][0]["percentage"].as_f64(), Some(80.0));
}

#[test]
fn test_overflowing_records_saturate() {
    // Records built directly, bypassing validation.
    let expenses = vec![
        make_expense("1", "2025-04-05", Decimal::MAX, Category::Food, "Huge"),
        make_expense("2", "2025-04-06", Decimal::MAX, Category::Food, "Huge again"),
    ];
    let budgets = vec![Budget::new(Category::Food, Decimal::new(1, 28), month("2025-04"))];

    let summary = monthly_spending(&expenses, &budgets, month("2025-04"));
    assert_eq!(summary.total, Decimal::MAX);
    let food = summary.category(Category::Food).unwrap();
    assert_eq!(food.amount, Decimal::MAX);
    assert_eq!(food.percentage, Decimal::MAX);
    assert!(food.is_over_budget());
    assert_eq!(summary.budget_utilization(), Decimal::MAX);
    assert_eq!(category_spent(&expenses, Category::Food, month("2025-04")), Decimal::MAX);
    assert_eq!(percentage(dec!(1000), Decimal::new(1, 28)), Decimal::MAX);
}

#[test]
fn test_category_spent() {
    let expenses = sample_expenses();
    assert_eq!(category_spent(&expenses, Category::Food, month("2025-04")), dec!(40.00));
    assert_eq!(category_spent(&expenses, Category::Food, month("2025-03")), dec!(99.00));
    assert_eq!(category_spent(&expenses, Category::Other, month("2025-04")), Decimal::ZERO);
}

// ── Filters ───────────────────────────────────────────────────

#[test]
fn test_filter_by_month_newest_first() {
    let expenses = sample_expenses();
    let result = ExpenseFilter::for_month(month("2025-04")).apply(&expenses);
    let ids: Vec<&str> = result.expenses.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
    assert_eq!(result.total, dec!(85.00));
}

#[test]
fn test_filter_search_is_case_insensitive() {
    let expenses = sample_expenses();
    let filter = ExpenseFilter {
        search: Some("UBER".into()),
        ..ExpenseFilter::default()
    };
    let result = filter.apply(&expenses);
    assert_eq!(result.expenses.len(), 1);
    assert_eq!(result.expenses[0].id, "2");
}

#[test]
fn test_filter_by_category_across_months() {
    let expenses = sample_expenses();
    let filter = ExpenseFilter {
        category: Some(Category::Food),
        ..ExpenseFilter::default()
    };
    let result = filter.apply(&expenses);
    let ids: Vec<&str> = result.expenses.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "4"]);
    assert_eq!(result.total, dec!(139.00));
}

#[test]
fn test_filter_same_day_keeps_insertion_order() {
    let expenses = vec![
        make_expense("a", "2025-04-05", dec!(1), Category::Food, "first"),
        make_expense("b", "2025-04-05", dec!(2), Category::Food, "second"),
    ];
    let result = ExpenseFilter::default().apply(&expenses);
    let ids: Vec<&str> = result.expenses.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_recent_expenses() {
    let expenses = sample_expenses();
    let recent = recent_expenses(&expenses, 2);
    let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["5", "3"]);
    assert_eq!(recent_expenses(&expenses, 50).len(), 5);
    assert!(recent_expenses(&[], 5).is_empty());
}

#[test]
fn test_budgets_for_month_and_unbudgeted() {
    let budgets = sample_budgets();
    assert_eq!(budgets_for_month(&budgets, month("2025-04")).len(), 2);
    assert!(budgets_for_month(&budgets, month("2024-01")).is_empty());

    let missing = unbudgeted_categories(&budgets, month("2025-04"));
    assert_eq!(missing.len(), 6);
    assert_eq!(missing[0], Category::Entertainment);
    assert!(!missing.contains(&Category::Food));
    assert_eq!(unbudgeted_categories(&[], month("2025-04")), Category::all());
}
