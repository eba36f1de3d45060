//! Read-only views: the dashboard summary, the month calendar and the category vocabulary.

use crate::args::{CategoriesArgs, MonthArgs};
use crate::calendar::{MonthCursor, MonthGrid};
use crate::commands::{plural, Out};
use crate::dates;
use crate::model::{categories_for, CategoryOption, TransactionType};
use crate::transaction_store::{CategoryTotal, DashboardTotals};
use crate::{Config, Result};
use chrono::Datelike;
use serde::Serialize;

/// The dashboard figures and the expense breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub totals: DashboardTotals,
    pub categories: Vec<CategoryTotal>,
}

/// The categories offered for one transaction type.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub r#type: TransactionType,
    pub categories: Vec<CategoryOption>,
}

/// Totals income and expenses and breaks expenses down by category.
pub fn summary(config: Config) -> Result<Out<Summary>> {
    let (organizer, load) = config.open()?;
    let transactions = organizer.transactions();
    let totals = transactions.dashboard_totals();
    let categories = transactions.category_totals();

    let mut message = format!(
        "Income: {}\nExpenses: {}\nBalance: {}",
        totals.total_income, totals.total_expenses, totals.balance
    );
    if !categories.is_empty() {
        message.push_str("\nExpenses by category:");
        for c in &categories {
            message.push_str(&format!("\n  {:<16}{}", c.label(), c.total));
        }
    }
    Ok(Out::new(message, Summary { totals, categories }).with_warnings(load.warnings()))
}

/// Lays out one month of the calendar: the current one unless a year or month is given, moved
/// by the offset.
pub fn month(config: Config, args: MonthArgs) -> Result<Out<MonthGrid>> {
    let (organizer, load) = config.open()?;
    let today = dates::today();
    let start = match (args.year(), args.month()) {
        (None, None) => MonthCursor::containing(today),
        (year, month) => MonthCursor::new(
            year.unwrap_or(today.year()),
            month.unwrap_or(today.month()),
        )?,
    };
    let moved = start.navigate(args.offset());
    let cursor = MonthCursor::new(moved.year(), moved.month())?;
    let grid = MonthGrid::build(cursor, organizer.events(), today);

    let busy: Vec<_> = grid.busy_days().collect();
    let count: usize = busy.iter().map(|d| d.events.len()).sum();
    let mut message = format!(
        "{}: {} on {}",
        grid.title,
        plural(count, "event"),
        plural(busy.len(), "day")
    );
    for day in busy {
        let labels: Vec<String> = day.events.iter().map(|e| e.label()).collect();
        let marker = if day.is_today { " (today)" } else { "" };
        message.push_str(&format!(
            "\n{}{marker}: {}",
            dates::format_date_for_display(&day.date_key),
            labels.join(", ")
        ));
    }
    Ok(Out::new(message, grid).with_warnings(load.warnings()))
}

/// Lists the category vocabulary for one or both transaction types.
pub fn categories(args: CategoriesArgs) -> Result<Out<Vec<CategoryGroup>>> {
    let types = match args.r#type() {
        Some(t) => vec![t],
        None => vec![TransactionType::Income, TransactionType::Expense],
    };
    let groups: Vec<CategoryGroup> = types
        .into_iter()
        .map(|t| CategoryGroup {
            r#type: t,
            categories: categories_for(t).to_vec(),
        })
        .collect();

    let mut message = String::new();
    for group in &groups {
        if !message.is_empty() {
            message.push('\n');
        }
        message.push_str(&format!("{}:", group.r#type));
        for c in &group.categories {
            message.push_str(&format!("\n  {:<16}{}", c.value, c.label));
        }
    }
    Ok(Out::new(message, groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[test]
    fn test_summary() {
        let env = TestEnv::new();
        env.insert_test_transactions();
        let out = summary(env.config()).unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.totals.total_income, Amount::from_str("1000").unwrap());
        assert_eq!(s.totals.total_expenses, Amount::from_str("42.50").unwrap());
        assert_eq!(s.totals.balance, Amount::from_str("957.50").unwrap());
        assert_eq!(s.categories.len(), 1);
        assert!(out.message().contains("Balance: $957.50"));
        assert!(out.message().contains("Food"));
    }

    #[test]
    fn test_summary_empty() {
        let env = TestEnv::new();
        let out = summary(env.config()).unwrap();
        assert_eq!(out.structure().unwrap().totals.balance, Amount::ZERO);
        assert!(!out.message().contains("by category"));
    }

    #[test]
    fn test_month() {
        let env = TestEnv::new();
        env.insert_test_transactions();
        let out = month(env.config(), MonthArgs::new(Some(2024), Some(3))).unwrap();
        let grid = out.structure().unwrap();
        assert_eq!(grid.title, "March 2024");
        assert_eq!(grid.days.len(), 31);
        assert!(out.message().starts_with("March 2024: 1 event on 1 day"));
        assert!(out.message().contains("Mar 1, 2024: Income: $1,000.00"));
    }

    #[test]
    fn test_month_offset_wraps_year() {
        let env = TestEnv::new();
        env.insert_test_transactions();
        let args = MonthArgs::new(Some(2024), Some(4)).with_offset(-1);
        let out = month(env.config(), args).unwrap();
        assert_eq!(out.structure().unwrap().title, "March 2024");

        let args = MonthArgs::new(Some(2024), Some(1)).with_offset(-1);
        let grid = month(env.config(), args).unwrap().structure().unwrap().clone();
        assert_eq!(grid.title, "December 2023");
        assert_eq!(grid.days.len(), 31);
    }

    #[test]
    fn test_month_defaults_to_current() {
        let env = TestEnv::new();
        let today = dates::today();
        let out = month(env.config(), MonthArgs::default()).unwrap();
        let grid = out.structure().unwrap();
        assert_eq!(grid.title, MonthCursor::containing(today).title());
        assert!(grid.days.iter().any(|d| d.is_today));
    }

    #[test]
    fn test_summary_reports_unreadable_ledger() {
        let env = TestEnv::new();
        let config = env.config();
        std::fs::write(
            config.storage_dir().join(format!("{}.json", config.transactions_key())),
            "[{not json",
        )
        .unwrap();
        let out = summary(config).unwrap();
        assert_eq!(out.structure().unwrap().totals.balance, Amount::ZERO);
        assert!(out
            .message()
            .contains("Warning: Stored transactions could not be read, starting empty"));
    }

    #[test]
    fn test_categories() {
        let out = categories(CategoriesArgs::new(Some(TransactionType::Expense))).unwrap();
        let groups = out.structure().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].categories.len(), 8);
        assert!(out.message().starts_with("expense:"));

        let out = categories(CategoriesArgs::default()).unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);
    }
}
