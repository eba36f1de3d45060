//! The category vocabulary offered for each transaction type.
//!
//! Stores accept any category string. This table is what a form offers to choose from.

use crate::model::TransactionType;
use serde::Serialize;

/// One selectable category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct CategoryOption {
    /// The stored value, e.g. `food`.
    pub value: &'static str,
    /// The display text, e.g. `Food & Dining`.
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> CategoryOption {
    CategoryOption { value, label }
}

/// The category a form preselects.
pub const DEFAULT_CATEGORY: &str = "other";

const INCOME_CATEGORIES: [CategoryOption; 5] = [
    opt("salary", "Salary"),
    opt("business", "Business"),
    opt("investment", "Investment"),
    opt("gift", "Gift"),
    opt(DEFAULT_CATEGORY, "Other"),
];

const EXPENSE_CATEGORIES: [CategoryOption; 8] = [
    opt("food", "Food & Dining"),
    opt("transportation", "Transportation"),
    opt("utilities", "Utilities"),
    opt("entertainment", "Entertainment"),
    opt("shopping", "Shopping"),
    opt("health", "Health"),
    opt("housing", "Housing"),
    opt(DEFAULT_CATEGORY, "Other"),
];

/// Returns the categories offered for `r#type`.
pub fn categories_for(r#type: TransactionType) -> &'static [CategoryOption] {
    match r#type {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// Whether `category` is one of the offered values for `r#type`.
pub fn is_known_category(r#type: TransactionType, category: &str) -> bool {
    categories_for(r#type).iter().any(|c| c.value == category)
}

/// Capitalizes the first letter, as chart labels show categories: `food` -> `Food`.
pub fn capitalize(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(categories_for(TransactionType::Income).len(), 5);
        assert_eq!(categories_for(TransactionType::Expense).len(), 8);
    }

    #[test]
    fn test_known_category_depends_on_type() {
        assert!(is_known_category(TransactionType::Income, "salary"));
        assert!(!is_known_category(TransactionType::Expense, "salary"));
        assert!(is_known_category(TransactionType::Expense, DEFAULT_CATEGORY));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("food"), "Food");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("über"), "Über");
    }
}
