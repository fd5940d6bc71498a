//! Report input and output data types.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use moneta_shared::{CategoryKind, PeriodType};
use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// A budget record as fetched from the store, reduced to the fields
/// the aggregation arithmetic needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRecord {
    /// Category the budget applies to.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Budgeted amount for one period.
    pub amount: f64,
    /// Whether `amount` covers a month or a year.
    pub period_type: PeriodType,
    /// Window start (inclusive).
    pub start_date: NaiveDate,
    /// Window end (inclusive).
    pub end_date: NaiveDate,
}

/// A transaction record as fetched from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Category the transaction was recorded under.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Transaction amount.
    pub amount: f64,
    /// Income or expense, mirroring the category's kind.
    pub kind: CategoryKind,
    /// Date the transaction occurred.
    pub date: NaiveDate,
}

/// Display metadata for a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Category display name.
    pub name: String,
    /// Income or expense.
    pub kind: CategoryKind,
}

/// Resolves category and subcategory ids to display names.
///
/// Built by the caller from whatever name data is on hand; ids missing
/// from the index resolve to the literal label "Unknown".
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    categories: HashMap<i32, CategoryInfo>,
    subcategories: HashMap<i32, String>,
}

impl NameIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category's name and kind.
    pub fn insert_category(&mut self, id: i32, name: impl Into<String>, kind: CategoryKind) {
        self.categories.insert(id, CategoryInfo {
            name: name.into(),
            kind,
        });
    }

    /// Registers a subcategory's name.
    pub fn insert_subcategory(&mut self, id: i32, name: impl Into<String>) {
        self.subcategories.insert(id, name.into());
    }

    /// Looks up a category's metadata.
    #[must_use]
    pub fn category(&self, id: i32) -> Option<&CategoryInfo> {
        self.categories.get(&id)
    }

    /// Resolves a category name, falling back to "Unknown".
    #[must_use]
    pub fn category_name(&self, id: i32) -> &str {
        self.categories.get(&id).map_or("Unknown", |c| c.name.as_str())
    }

    /// Resolves a category kind, falling back to expense.
    #[must_use]
    pub fn category_kind(&self, id: i32) -> CategoryKind {
        self.categories
            .get(&id)
            .map_or(CategoryKind::Expense, |c| c.kind)
    }

    /// Resolves a subcategory name if present.
    #[must_use]
    pub fn subcategory_name(&self, id: i32) -> Option<&str> {
        self.subcategories.get(&id).map(String::as_str)
    }
}

/// A single named series of numeric values aligned to a label set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series name ("Budget", "Actual", "Income", ...).
    pub name: String,
    /// One value per label.
    pub values: Vec<f64>,
}

/// A labeled multi-series dataset, the common shape for chart-ready reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    /// Bucket labels (months, category names, days, ...).
    pub labels: Vec<String>,
    /// Parallel series aligned to `labels`.
    pub series: Vec<Series>,
}

impl SeriesData {
    /// Builds a dataset from labels and (name, values) pairs.
    #[must_use]
    pub fn new(labels: Vec<String>, series: Vec<Series>) -> Self {
        Self { labels, series }
    }
}

/// One budget-vs-actual line in a budget summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummaryItem {
    /// Category id.
    pub category_id: i32,
    /// Resolved category name.
    pub category_name: String,
    /// Subcategory id, if the budget targets one.
    pub subcategory_id: Option<i32>,
    /// Resolved subcategory name, if any.
    pub subcategory_name: Option<String>,
    /// Budgeted amount summed over the group.
    pub budget_amount: f64,
    /// Actual spend recorded against the group.
    pub actual_amount: f64,
    /// `actual / budget * 100`, or 0 when the budget is 0.
    pub percentage_used: f64,
}

/// Budget-vs-actual summary over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// One item per budget-bearing (category, subcategory) group.
    pub items: Vec<BudgetSummaryItem>,
    /// Sum of all budget amounts.
    pub total_budget: f64,
    /// Sum of actuals across budget-bearing groups only.
    pub total_actual: f64,
    /// `total_actual / total_budget * 100`, or 0 when the total budget is 0.
    pub overall_percentage: f64,
    /// Currency the summary was computed for.
    pub currency: String,
    /// Human-readable period description.
    pub period: String,
}

/// One group line in a transaction summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummaryItem {
    /// Category id.
    pub category_id: i32,
    /// Resolved category name.
    pub category_name: String,
    /// Subcategory id when grouping by subcategory.
    pub subcategory_id: Option<i32>,
    /// Resolved subcategory name when grouping by subcategory.
    pub subcategory_name: Option<String>,
    /// Sum of transaction amounts in the group.
    pub total_amount: f64,
    /// Number of transactions in the group.
    pub transaction_count: u64,
    /// The group's kind, resolved from the category (expense if unknown).
    pub kind: CategoryKind,
}

/// Grouped transaction totals over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    /// One item per group.
    pub items: Vec<TransactionSummaryItem>,
    /// Sum of income-kind transaction amounts.
    pub total_income: f64,
    /// Sum of expense-kind transaction amounts.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub net_amount: f64,
    /// Currency the summary was computed for.
    pub currency: String,
    /// Human-readable period description.
    pub period: String,
}

/// Full breakdown of a single calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Income totals per category name.
    pub income_by_category: SeriesData,
    /// Expense totals per category name.
    pub expense_by_category: SeriesData,
    /// Budget vs actual over the union of category names.
    pub budget_vs_actual: SeriesData,
    /// Income and expense per day of the month.
    pub daily_transactions: SeriesData,
    /// Fixed three-point series: income, expense, net.
    pub net_income_expense: SeriesData,
}

/// Grouping mode for transaction summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Group by category only.
    Category,
    /// Group by (category, subcategory).
    Subcategory,
}

impl FromStr for GroupBy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "subcategory" => Ok(Self::Subcategory),
            other => Err(ReportError::InvalidGroupBy(other.to_string())),
        }
    }
}
