use std::{collections::BTreeMap, env, path::Path};

use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;
use zbb_config::Config;
use zbb_core::MonthInitReport;
use zbb_domain::{
    BudgetSummary, Category, LedgerSnapshot, MonthId, Money, MonthlyBudget, MonthlyBudgetView,
    SafeToSpend, UserId,
};

use crate::BudgetError;

const NAME_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 12;

/// Disables ANSI colors when `NO_COLOR` is set or the config turns them off.
pub fn configure_colors(config: &Config) {
    if env::var_os("NO_COLOR").is_some() || !config.ui_color_enabled {
        colored::control::set_override(false);
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), BudgetError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Right-aligned amount; negatives in red.
fn amount_cell(amount: Money) -> String {
    let text = format!("{:>width$}", amount.to_string(), width = AMOUNT_WIDTH);
    if amount.is_negative() {
        text.red().to_string()
    } else {
        text
    }
}

fn name_cell(name: &str) -> String {
    let mut cell: String = name.chars().take(NAME_WIDTH).collect();
    let pad = NAME_WIDTH.saturating_sub(cell.chars().count());
    cell.extend(std::iter::repeat(' ').take(pad));
    cell
}

/// Labelled total followed by the configured currency code.
fn total_line(label: &str, amount: Money, currency: &str) -> String {
    format!("{} {} {currency}", name_cell(label), amount_cell(amount))
}

fn section(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}

pub fn render_month_view(views: &[MonthlyBudgetView]) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {:<8} {:<10} {:>w$} {:>w$} {:>w$} {:>w$}",
        name_cell("Category"),
        "Kind",
        "Rollover",
        "Start",
        "Assigned",
        "Activity",
        "Available",
        w = AMOUNT_WIDTH
    )];
    for view in views {
        let strategy = if view.is_income() {
            "-".to_string()
        } else {
            view.rollover_strategy.to_string()
        };
        lines.push(format!(
            "{} {:<8} {:<10} {} {} {} {}",
            name_cell(&view.category_name),
            view.kind.to_string(),
            strategy,
            amount_cell(view.start_balance),
            amount_cell(view.assigned_amount),
            amount_cell(view.activity),
            amount_cell(view.available),
        ));
    }
    lines
}

pub fn print_month_view(month: &str, views: &[MonthlyBudgetView]) {
    section(&format!("Budget {month}"));
    if views.is_empty() {
        println!("No active categories.");
        return;
    }
    for line in render_month_view(views) {
        println!("{line}");
    }
}

pub fn print_summary(summary: &BudgetSummary, currency: &str) {
    section(&format!("Summary {}", summary.month));
    let rows = [
        ("Income", summary.total_income),
        ("Leftover from reset", summary.leftover_from_reset),
        ("Assigned", summary.total_assigned),
        ("Activity", summary.total_activity),
        ("Available", summary.total_available),
        ("Overspent", summary.overspent),
    ];
    for (label, amount) in rows {
        println!("{} {}", name_cell(label), amount_cell(amount));
    }
    let tbb = total_line("To Be Budgeted", summary.to_be_budgeted, currency);
    println!("{}", tbb.bold());
    if summary.is_over_assigned() {
        println!("{}", "More money assigned than available.".yellow());
    }
}

pub fn print_init_report(month: MonthId, report: &MonthInitReport) {
    println!("Initialized {month}: {} row(s) created.", report.created);
    if !report.failed.is_empty() {
        println!(
            "{}",
            format!("{} categories could not be initialized.", report.failed.len()).yellow()
        );
    }
}

pub fn print_assignment(row: &MonthlyBudget) {
    println!(
        "Assigned {} to {} in {} (start balance {}).",
        row.assigned_amount, row.category_id, row.month, row.start_balance
    );
}

pub fn print_suggestions(month: &str, categories: &[Category], suggestions: &BTreeMap<Uuid, Money>) {
    section(&format!("Suggestions {month}"));
    let mut shown = 0;
    for category in categories {
        if let Some(amount) = suggestions.get(&category.id) {
            println!("{} {}", name_cell(&category.name), amount_cell(*amount));
            shown += 1;
        }
    }
    if shown == 0 {
        println!("No suggestions.");
    }
}

pub fn print_safe_to_spend(result: &SafeToSpend, currency: &str) {
    section("Safe to spend");
    println!("{} {}", name_cell("Liquid"), amount_cell(result.total_liquid));
    println!("{} {}", name_cell("Pending bills"), amount_cell(result.pending_bills));
    println!(
        "{} {}",
        name_cell("Sinking funds"),
        amount_cell(result.sinking_contributions)
    );
    let line = total_line("Safe to spend", result.safe_to_spend, currency);
    println!("{}", line.bold());
}

pub fn print_categories(categories: &[Category]) {
    section("Categories");
    if categories.is_empty() {
        println!("No active categories.");
        return;
    }
    for category in categories {
        let target = category
            .target_amount
            .map(|amount| amount.to_string())
            .unwrap_or_else(|| "-".into());
        let due = category
            .due_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{} {} {:<8} {:>w$} {}",
            category.id,
            name_cell(&category.name),
            category.kind.to_string(),
            target,
            due,
            w = AMOUNT_WIDTH
        );
    }
}

pub fn print_import(user: &UserId, path: &Path, snapshot: &LedgerSnapshot) {
    println!(
        "Imported {} categories, {} transactions, {} accounts and {} budget rows for {user} from {}.",
        snapshot.categories.len(),
        snapshot.transactions.len(),
        snapshot.accounts.len(),
        snapshot.budget_rows.len(),
        path.display()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbb_domain::{CategoryKind, RolloverStrategy};

    #[test]
    fn name_cell_pads_and_truncates() {
        assert_eq!(name_cell("Rent").len(), NAME_WIDTH);
        assert_eq!(name_cell(&"x".repeat(40)).len(), NAME_WIDTH);
    }

    #[test]
    fn totals_carry_the_currency_code() {
        colored::control::set_override(false);
        let line = total_line("To Be Budgeted", Money::parse("250.00").unwrap(), "EUR");
        assert!(line.starts_with("To Be Budgeted"));
        assert!(line.ends_with("250.00 EUR"));
    }

    #[test]
    fn month_view_renders_one_line_per_category() {
        colored::control::set_override(false);
        let month = MonthId::parse("2024-02").unwrap();
        let category = Category::new("Groceries", CategoryKind::Variable)
            .with_strategy(RolloverStrategy::Accumulate);
        let view = MonthlyBudgetView::compute(
            &category,
            month,
            None,
            Money::parse("-50.00").unwrap(),
            Money::ZERO,
        );
        let lines = render_month_view(&[view]);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Groceries"));
        assert!(lines[1].contains("ACCUMULATE"));
        assert!(lines[1].contains("-50.00"));
    }
}
