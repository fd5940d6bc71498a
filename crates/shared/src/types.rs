//! Domain enums shared across crates.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classification of a category and of the transactions recorded under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown category kind: {other}")),
        }
    }
}

/// Whether a budget's stated amount covers a month or a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Amount applies to each month of the window.
    Monthly,
    /// Amount covers a full year; reports normalize it to amount / 12.
    Yearly,
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown period type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_kind_round_trip() {
        assert_eq!("income".parse::<CategoryKind>(), Ok(CategoryKind::Income));
        assert_eq!("expense".parse::<CategoryKind>(), Ok(CategoryKind::Expense));
        assert_eq!(CategoryKind::Income.to_string(), "income");
        assert!("revenue".parse::<CategoryKind>().is_err());
    }

    #[test]
    fn test_period_type_round_trip() {
        assert_eq!("monthly".parse::<PeriodType>(), Ok(PeriodType::Monthly));
        assert_eq!("yearly".parse::<PeriodType>(), Ok(PeriodType::Yearly));
        assert_eq!(PeriodType::Yearly.to_string(), "yearly");
        assert!("weekly".parse::<PeriodType>().is_err());
    }
}
