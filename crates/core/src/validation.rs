//! Cross-entity consistency checks.
//!
//! Pure checks over already-fetched records; no side effects. Callers run
//! these before touching the store so that bad input never reaches an
//! aggregation or a write.

use chrono::NaiveDate;
use moneta_shared::{CategoryKind, CurrencyConfig};
use thiserror::Error;

/// Errors surfaced by the validation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A date window is empty or inverted.
    #[error("invalid range: start {start} must be before end {end}")]
    InvalidRange {
        /// Window start.
        start: NaiveDate,
        /// Window end.
        end: NaiveDate,
    },

    /// Currency code is not in the configured allow-list.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// A referenced record is absent or belongs to a different parent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Category kind and transaction kind disagree.
    #[error("category kind ({category}) does not match transaction kind ({transaction})")]
    TypeMismatch {
        /// The category's kind.
        category: CategoryKind,
        /// The transaction's kind.
        transaction: CategoryKind,
    },
}

/// Checks that a budget window is non-empty.
///
/// # Errors
///
/// Returns `ValidationError::InvalidRange` when `start >= end`.
pub fn validate_budget_window(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if start >= end {
        return Err(ValidationError::InvalidRange { start, end });
    }
    Ok(())
}

/// Checks that a currency code is in the allow-list.
///
/// # Errors
///
/// Returns `ValidationError::UnknownCurrency` when the code is absent.
pub fn validate_currency(code: &str, currencies: &CurrencyConfig) -> Result<(), ValidationError> {
    if !currencies.is_allowed(code) {
        return Err(ValidationError::UnknownCurrency(code.to_string()));
    }
    Ok(())
}

/// Checks that a subcategory belongs to the given category.
///
/// Takes the subcategory's stored parent id, so the caller has already
/// established that the subcategory itself exists.
///
/// # Errors
///
/// Returns `ValidationError::NotFound` when the parents differ.
pub fn validate_subcategory_of_category(
    subcategory_parent_id: i32,
    category_id: i32,
) -> Result<(), ValidationError> {
    if subcategory_parent_id != category_id {
        return Err(ValidationError::NotFound(format!(
            "subcategory does not belong to category {category_id}"
        )));
    }
    Ok(())
}

/// Checks that a transaction's kind matches its category's kind.
///
/// # Errors
///
/// Returns `ValidationError::TypeMismatch` when they differ.
pub fn validate_kind_match(
    category: CategoryKind,
    transaction: CategoryKind,
) -> Result<(), ValidationError> {
    if category != transaction {
        return Err(ValidationError::TypeMismatch {
            category,
            transaction,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_window_ordered() {
        assert!(validate_budget_window(date(2024, 1, 1), date(2024, 12, 31)).is_ok());
    }

    #[test]
    fn test_budget_window_inverted() {
        let result = validate_budget_window(date(2024, 6, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn test_budget_window_empty() {
        let result = validate_budget_window(date(2024, 6, 1), date(2024, 6, 1));
        assert!(matches!(result, Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn test_currency_allowed() {
        let currencies = CurrencyConfig::default();
        assert!(validate_currency("USD", &currencies).is_ok());
    }

    #[test]
    fn test_currency_unknown() {
        let currencies = CurrencyConfig::default();
        assert_eq!(
            validate_currency("XXX", &currencies),
            Err(ValidationError::UnknownCurrency("XXX".to_string()))
        );
    }

    #[test]
    fn test_subcategory_parent_match() {
        assert!(validate_subcategory_of_category(3, 3).is_ok());
        assert!(matches!(
            validate_subcategory_of_category(3, 4),
            Err(ValidationError::NotFound(_))
        ));
    }

    #[test]
    fn test_kind_match() {
        assert!(validate_kind_match(CategoryKind::Income, CategoryKind::Income).is_ok());
        assert!(matches!(
            validate_kind_match(CategoryKind::Income, CategoryKind::Expense),
            Err(ValidationError::TypeMismatch { .. })
        ));
    }
}
