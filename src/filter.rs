//! The filter selections a transaction list is narrowed by.

use crate::dates;
use crate::model::{Transaction, TransactionType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A date range that starts at the beginning of the current day, week (Sunday), month or year
/// and runs into the indefinite future.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Today,
    Week,
    Month,
    Year,
    #[default]
    All,
}

serde_plain::derive_display_from_serialize!(DateFilter);
serde_plain::derive_fromstr_from_deserialize!(DateFilter);

impl DateFilter {
    /// The first date included by this filter when today is `today`, or `None` for `All`.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateFilter::Today => Some(today),
            DateFilter::Week => Some(dates::start_of_week(today)),
            DateFilter::Month => Some(dates::start_of_month(today)),
            DateFilter::Year => Some(dates::start_of_year(today)),
            DateFilter::All => None,
        }
    }

    /// Whether a transaction dated `date_key` passes. Unparsable dates only pass `All`.
    pub fn matches(&self, date_key: &str, today: NaiveDate) -> bool {
        match self.start(today) {
            None => true,
            Some(start) => dates::parse_date_key(date_key).is_some_and(|d| d >= start),
        }
    }
}

/// Narrows by transaction type or by one exact category.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Type(TransactionType),
    Category(String),
}

impl CategoryFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Type(t) => transaction.r#type() == *t,
            CategoryFilter::Category(c) => transaction.category() == c,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    /// `all` or an empty string means no filtering, `income`/`expense` filter by type, and
    /// anything else is an exact category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => CategoryFilter::All,
            other => match TransactionType::from_str(other) {
                Ok(t) => CategoryFilter::Type(t),
                Err(_) => CategoryFilter::Category(other.to_string()),
            },
        })
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Type(t) => Display::fmt(t, f),
            CategoryFilter::Category(c) => f.write_str(c),
        }
    }
}

/// The three filter stages of the transaction list, applied in order: date, category, search.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TransactionQuery {
    pub date: DateFilter,
    pub category: CategoryFilter,
    /// Case-insensitive text matched against the description, category and formatted amount.
    pub search: String,
}

impl TransactionQuery {
    pub fn new(date: DateFilter, category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            date,
            category,
            search: search.into(),
        }
    }

    pub fn matches(&self, transaction: &Transaction, today: NaiveDate) -> bool {
        self.date.matches(transaction.date(), today)
            && self.category.matches(transaction)
            && matches_search(transaction, &self.search.to_lowercase())
    }
}

fn matches_search(transaction: &Transaction, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    transaction
        .description()
        .unwrap_or_default()
        .to_lowercase()
        .contains(needle)
        || transaction.category().to_lowercase().contains(needle)
        || transaction.amount().to_string().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        dates::parse_date_key(s).unwrap()
    }

    #[test]
    fn test_date_filter_parse() {
        assert_eq!(DateFilter::from_str("week").unwrap(), DateFilter::Week);
        assert_eq!(DateFilter::All.to_string(), "all");
        assert!(DateFilter::from_str("decade").is_err());
    }

    #[test]
    fn test_date_filter_bounds() {
        // Friday
        let today = date("2024-03-15");
        assert!(DateFilter::Today.matches("2024-03-15", today));
        assert!(!DateFilter::Today.matches("2024-03-14", today));
        // Future dates are inside every range.
        assert!(DateFilter::Today.matches("2024-12-31", today));
        assert!(DateFilter::Week.matches("2024-03-10", today));
        assert!(!DateFilter::Week.matches("2024-03-09", today));
        assert!(DateFilter::Month.matches("2024-03-01", today));
        assert!(!DateFilter::Month.matches("2024-02-29", today));
        assert!(DateFilter::Year.matches("2024-01-01", today));
        assert!(!DateFilter::Year.matches("2023-12-31", today));
        assert!(DateFilter::All.matches("1999-01-01", today));
    }

    #[test]
    fn test_unparsable_date_only_matches_all() {
        let today = date("2024-03-15");
        assert!(!DateFilter::Year.matches("soon", today));
        assert!(DateFilter::All.matches("soon", today));
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::from_str("").unwrap(), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_str("all").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_str("income").unwrap(),
            CategoryFilter::Type(TransactionType::Income)
        );
        assert_eq!(
            CategoryFilter::from_str("food").unwrap(),
            CategoryFilter::Category("food".to_string())
        );
        assert_eq!(CategoryFilter::Type(TransactionType::Expense).to_string(), "expense");
    }
}
