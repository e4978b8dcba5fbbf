use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::util::{
    flag_value, format_amount, format_percent, has_flag, parse_amount, parse_category, parse_date,
    positional, shellexpand, truncate, usage_bar,
};
use crate::models::{Budget, Expense, Month, NewExpense};
use crate::summary::{self, ExpenseFilter};
use crate::tracker::{AddedExpense, Tracker, Upsert};
use crate::transfer;

const DEFAULT_RECENT: usize = 5;

/// Dispatch one command. `args[0]` is the program name; with no command the
/// current month's summary is printed.
pub(crate) fn as_cli(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(&[], tracker);
    };
    let rest = &args[2..];
    match command.as_str() {
        "summary" | "s" => cli_summary(rest, tracker),
        "list" | "ls" => cli_list(rest, tracker),
        "recent" => cli_recent(rest, tracker),
        "add" => cli_add(rest, tracker),
        "edit" => cli_edit(rest, tracker),
        "delete" | "rm" => cli_delete(rest, tracker),
        "budget" => cli_budget(rest, tracker),
        "unbudget" => cli_unbudget(rest, tracker),
        "budgets" => cli_budgets(tracker),
        "export" => cli_export(rest, tracker),
        "export-csv" => cli_export_csv(rest, tracker),
        "import" => cli_import(rest, tracker),
        "reset" => cli_reset(rest, tracker),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expense-savvy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseSavvy - local-only personal expense and budget tracker");
    println!();
    println!("Usage: expense-savvy [--db PATH] [--month YYYY-MM] [command]");
    println!();
    println!("Commands:");
    println!("  summary [YYYY-MM|prev|next]   Monthly spending by category (default)");
    println!("    --json                      Print the summary as JSON");
    println!("  list                          Expenses for the month, newest first");
    println!("    --search <text>             Match description text");
    println!("    --category <name>           Only one category");
    println!("  recent [N]                    Most recent N expenses (default 5)");
    println!("  add <date> <category> <amount> <description...>");
    println!("                                Record an expense (date is YYYY-MM-DD)");
    println!("  edit <id>                     Change an expense");
    println!("    --date, --amount, --category, --description");
    println!("  delete <id>                   Delete an expense");
    println!("  budget <category> <amount>    Set the month's budget for a category");
    println!("  unbudget <category>           Remove the month's budget for a category");
    println!("  budgets                       List the month's budgets");
    println!("  export [path]                 Export all data to JSON");
    println!("  export-csv [path]             Export the month's expenses to CSV");
    println!("    --all                       Export every month");
    println!("  import <file.json>            Replace all data with an export file");
    println!("  reset --yes                   Delete all expenses and budgets");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(args: &[String], tracker: &mut Tracker) -> Result<()> {
    match args.first().map(String::as_str).filter(|a| !a.starts_with('-')) {
        Some("prev") => {
            tracker.step_month(-1);
        }
        Some("next") => {
            tracker.step_month(1);
        }
        Some(raw) => tracker.set_current_month(raw.parse()?),
        None => {}
    }
    let month = tracker.current_month();
    let spending = tracker.monthly_spending(month);

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&spending)?);
        return Ok(());
    }

    println!("{}", summary_title(month));
    println!("{}", "─".repeat(62));
    println!(
        "{:<15} {:>12} {:>12} {:>8}  Usage",
        "Category", "Spent", "Budget", "%"
    );
    for row in spending.active() {
        let budget = if row.budget.is_zero() {
            "-".to_string()
        } else {
            format_amount(row.budget)
        };
        let marker = if row.is_over_budget() { " !" } else { "" };
        println!(
            "{:<15} {:>12} {:>12} {:>8}  {}{marker}",
            row.category.as_str(),
            format_amount(row.amount),
            budget,
            format_percent(row.percentage),
            usage_bar(row.percentage),
        );
    }
    println!("{}", "─".repeat(62));
    println!("  Total spent:   {}", format_amount(spending.total));
    let total_budget = spending.total_budget();
    if !total_budget.is_zero() {
        println!("  Total budget:  {}", format_amount(total_budget));
        println!("  Utilization:   {}", format_percent(spending.budget_utilization()));
    }
    let over: Vec<&str> = spending.over_budget().map(|c| c.category.as_str()).collect();
    if !over.is_empty() {
        println!("  Over budget:   {}", over.join(", "));
    }
    println!();
    println!("  summary {} | summary {}", month.prev(), month.next());
    Ok(())
}

fn summary_title(month: Month) -> String {
    format!("ExpenseSavvy - {month}")
}

fn cli_list(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let category = flag_value(args, "--category").map(parse_category).transpose()?;
    let filter = ExpenseFilter {
        month: Some(tracker.current_month()),
        search: flag_value(args, "--search").map(str::to_string),
        category,
    };
    let result = filter.apply(tracker.list_expenses());
    if result.expenses.is_empty() {
        println!("No expenses for {}", tracker.current_month());
        return Ok(());
    }
    print_expenses(&result.expenses);
    println!("{}", "─".repeat(78));
    println!(
        "{} expenses, total {}",
        result.expenses.len(),
        format_amount(result.total)
    );
    Ok(())
}

fn cli_recent(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let n = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("Invalid count: {raw}"))?,
        None => DEFAULT_RECENT,
    };
    let recent = summary::recent_expenses(tracker.list_expenses(), n);
    if recent.is_empty() {
        println!("No expenses recorded");
    } else {
        print_expenses(&recent);
    }
    Ok(())
}

fn print_expenses(expenses: &[&Expense]) {
    println!(
        "{:<34} {:<10} {:<13} {:<30} {:>12}",
        "ID", "Date", "Category", "Description", "Amount"
    );
    println!("{}", "─".repeat(78));
    for e in expenses {
        println!(
            "{:<34} {:<10} {:<13} {:<30} {:>12}",
            truncate(&e.id, 34),
            e.date.format("%Y-%m-%d"),
            e.category.as_str(),
            truncate(&e.description, 30),
            format_amount(e.amount),
        );
    }
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_add(args: &[String], tracker: &mut Tracker) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!("Usage: expense-savvy add <YYYY-MM-DD> <category> <amount> <description...>");
    }
    let date = parse_date(&args[0])?;
    let category = parse_category(&args[1])?;
    let amount = parse_amount(&args[2])?;
    let description = args[3..].join(" ");

    let AddedExpense { expense, alert } =
        tracker.add_expense(NewExpense::new(date, amount, description, category))?;
    println!(
        "Added {} {} on {} ({})",
        format_amount(expense.amount),
        expense.category,
        expense.date.format("%Y-%m-%d"),
        expense.id
    );
    if let Some(alert) = alert {
        println!("[{}] {}", alert.severity(), alert.message());
        if let Some(detail) = alert.detail() {
            println!("  {detail}");
        }
    }
    Ok(())
}

fn cli_edit(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(id) = args.first().filter(|a| !a.starts_with('-')) else {
        anyhow::bail!(
            "Usage: expense-savvy edit <id> [--date D] [--amount A] [--category C] [--description TEXT]"
        );
    };
    let mut expense = tracker
        .expense(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No expense with id {id}"))?;

    let mut fields = NewExpense::from(expense.clone());
    if let Some(raw) = flag_value(args, "--date") {
        fields.date = parse_date(raw)?;
    }
    if let Some(raw) = flag_value(args, "--amount") {
        fields.amount = parse_amount(raw)?;
    }
    if let Some(raw) = flag_value(args, "--category") {
        fields.category = parse_category(raw)?;
    }
    if let Some(raw) = flag_value(args, "--description") {
        fields.description = raw.to_string();
    }
    expense.apply(fields);

    if !tracker.edit_expense(expense)? {
        anyhow::bail!("No expense with id {id}");
    }
    println!("Updated expense {id}");
    Ok(())
}

fn cli_delete(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(id) = args.first() else {
        anyhow::bail!("Usage: expense-savvy delete <id>");
    };
    if !tracker.delete_expense(id)? {
        anyhow::bail!("No expense with id {id}");
    }
    println!("Deleted expense {id}");
    Ok(())
}

// ── Budgets ──────────────────────────────────────────────────

fn cli_budget(args: &[String], tracker: &mut Tracker) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: expense-savvy budget <category> <amount>");
    }
    let category = parse_category(&args[0])?;
    let amount = parse_amount(&args[1])?;
    let month = tracker.current_month();
    let verb = match tracker.upsert_budget(Budget::new(category, amount, month))? {
        Upsert::Inserted => "Set",
        Upsert::Replaced => "Updated",
    };
    println!("{verb} {category} budget for {month}: {}", format_amount(amount));
    Ok(())
}

fn cli_unbudget(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(raw) = args.first() else {
        anyhow::bail!("Usage: expense-savvy unbudget <category>");
    };
    let category = parse_category(raw)?;
    let month = tracker.current_month();
    if !tracker.delete_budget(category, month)? {
        anyhow::bail!("No {category} budget for {month}");
    }
    println!("Removed {category} budget for {month}");
    Ok(())
}

fn cli_budgets(tracker: &mut Tracker) -> Result<()> {
    let month = tracker.current_month();
    let spending = tracker.monthly_spending(month);
    let budgets = summary::budgets_for_month(tracker.list_budgets(), month);

    if budgets.is_empty() {
        println!("No budgets for {month}");
    } else {
        println!(
            "{:<15} {:>12} {:>12} {:>12}",
            "Category", "Budget", "Spent", "Remaining"
        );
        println!("{}", "─".repeat(54));
        for budget in &budgets {
            let Some(row) = spending.category(budget.category) else {
                continue;
            };
            println!(
                "{:<15} {:>12} {:>12} {:>12}",
                budget.category.as_str(),
                format_amount(budget.amount),
                format_amount(row.amount),
                format_amount(row.remaining()),
            );
        }
    }

    let missing = summary::unbudgeted_categories(tracker.list_budgets(), month);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
        println!();
        println!("No budget: {}", names.join(", "));
    }
    Ok(())
}

// ── Data management ──────────────────────────────────────────

fn cli_export(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let now = chrono::Utc::now();
    let path = output_path(args, || {
        transfer::export_file_name(now.with_timezone(&chrono::Local).date_naive())
    });
    let document = tracker.export_document(now);
    std::fs::write(&path, document.to_pretty_json()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "Exported {} expenses and {} budgets to {}",
        document.expenses.len(),
        document.budgets.len(),
        path.display()
    );
    Ok(())
}

fn cli_export_csv(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let all = has_flag(args, "--all");
    let month = tracker.current_month();
    let path = output_path(args, || {
        if all {
            "expense-savvy-all.csv".to_string()
        } else {
            format!("expense-savvy-{month}.csv")
        }
    });
    let filter = if all {
        ExpenseFilter::default()
    } else {
        ExpenseFilter::for_month(month)
    };
    let result = filter.apply(tracker.list_expenses());
    let count = transfer::write_expenses_csv(&path, &result.expenses)?;
    if count == 0 {
        println!("No expenses to export; wrote header only to {}", path.display());
    } else {
        println!("Exported {count} expenses to {}", path.display());
    }
    Ok(())
}

fn cli_import(args: &[String], tracker: &mut Tracker) -> Result<()> {
    let Some(file_path) = args.first() else {
        anyhow::bail!("Usage: expense-savvy import <file.json>");
    };
    let path = Path::new(file_path);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_path}"))?;
    let imported = tracker.import_document(&raw)?;
    println!(
        "Imported {} expenses and {} budgets (existing data replaced)",
        imported.expenses, imported.budgets
    );
    Ok(())
}

fn cli_reset(args: &[String], tracker: &mut Tracker) -> Result<()> {
    if !has_flag(args, "--yes") {
        anyhow::bail!("This deletes every expense and budget. Re-run with: expense-savvy reset --yes");
    }
    tracker.reset()?;
    println!("All data has been reset");
    Ok(())
}

/// First positional argument, or `default` in the working directory.
fn output_path(args: &[String], default: impl FnOnce() -> String) -> PathBuf {
    positional(args, &[])
        .first()
        .map(|p| PathBuf::from(shellexpand(p)))
        .unwrap_or_else(|| PathBuf::from(default()))
}
