//! Aggregation engine for budget and transaction reports.
//!
//! All operations are pure functions over records the caller has already
//! fetched and filtered by period and currency. Monetary sums use
//! floating-point accumulation without rounding; display-level rounding
//! is the caller's responsibility. Division by zero in percentage
//! computations yields 0, never an error or NaN.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use moneta_shared::{CategoryKind, PeriodType};

use super::error::ReportError;
use super::types::{
    BudgetRecord, BudgetSummary, BudgetSummaryItem, GroupBy, MonthlyReport, NameIndex, Series,
    SeriesData, TransactionRecord, TransactionSummary, TransactionSummaryItem,
};

/// Engine producing budget-vs-actual summaries and report datasets.
pub struct ReportEngine;

impl ReportEngine {
    /// Computes a budget-vs-actual summary over a period.
    ///
    /// Budgets and transactions are grouped by (category, subcategory);
    /// only budget-bearing groups appear as items, and actuals outside
    /// those groups count toward neither items nor totals.
    #[must_use]
    pub fn budget_summary(
        budgets: &[BudgetRecord],
        transactions: &[TransactionRecord],
        names: &NameIndex,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> BudgetSummary {
        let mut budget_groups: BTreeMap<(i32, Option<i32>), f64> = BTreeMap::new();
        for budget in budgets {
            *budget_groups
                .entry((budget.category_id, budget.subcategory_id))
                .or_insert(0.0) += budget.amount;
        }

        let mut transaction_groups: BTreeMap<(i32, Option<i32>), f64> = BTreeMap::new();
        for transaction in transactions {
            *transaction_groups
                .entry((transaction.category_id, transaction.subcategory_id))
                .or_insert(0.0) += transaction.amount;
        }

        let mut total_budget = 0.0;
        let mut total_actual = 0.0;
        let items: Vec<BudgetSummaryItem> = budget_groups
            .into_iter()
            .map(|((category_id, subcategory_id), budget_amount)| {
                let actual_amount = transaction_groups
                    .get(&(category_id, subcategory_id))
                    .copied()
                    .unwrap_or(0.0);
                total_budget += budget_amount;
                total_actual += actual_amount;
                BudgetSummaryItem {
                    category_id,
                    category_name: names.category_name(category_id).to_string(),
                    subcategory_id,
                    subcategory_name: subcategory_id
                        .and_then(|id| names.subcategory_name(id).map(str::to_string)),
                    budget_amount,
                    actual_amount,
                    percentage_used: percentage(actual_amount, budget_amount),
                }
            })
            .collect();

        BudgetSummary {
            items,
            total_budget,
            total_actual,
            overall_percentage: percentage(total_actual, total_budget),
            currency: currency.to_string(),
            period: format!("{start} to {end}"),
        }
    }

    /// Computes budget and actual series per calendar month in a range.
    ///
    /// Month count is the inclusive calendar year/month difference, not
    /// elapsed days. Yearly budgets contribute `amount / 12` per month;
    /// each budget's own window is clipped to the requested range, so
    /// months outside the overlap receive nothing from it. Actuals sum
    /// expense-kind transactions per month.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` when `start > end`.
    pub fn trend_series(
        budgets: &[BudgetRecord],
        transactions: &[TransactionRecord],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SeriesData, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }

        let base_index = month_index(start);
        let months = usize::try_from(month_index(end) - base_index + 1).unwrap_or(0);

        let mut labels = Vec::with_capacity(months);
        let mut cursor = first_of_month(start);
        for _ in 0..months {
            labels.push(cursor.format("%b %Y").to_string());
            cursor = next_month(cursor);
        }

        let mut budget_values = vec![0.0; months];
        for budget in budgets {
            let monthly = monthly_amount(budget);
            let clip_start = budget.start_date.max(start);
            let clip_end = budget.end_date.min(end);
            if clip_start > clip_end {
                continue;
            }
            let mut cursor = first_of_month(clip_start);
            while cursor <= clip_end {
                if let Ok(index) = usize::try_from(month_index(cursor) - base_index) {
                    if let Some(bucket) = budget_values.get_mut(index) {
                        *bucket += monthly;
                    }
                }
                cursor = next_month(cursor);
            }
        }

        let mut actual_values = vec![0.0; months];
        for transaction in transactions {
            if transaction.kind != CategoryKind::Expense
                || transaction.date < start
                || transaction.date > end
            {
                continue;
            }
            if let Ok(index) = usize::try_from(month_index(transaction.date) - base_index) {
                if let Some(bucket) = actual_values.get_mut(index) {
                    *bucket += transaction.amount;
                }
            }
        }

        Ok(SeriesData::new(labels, vec![
            Series {
                name: "Budget".to_string(),
                values: budget_values,
            },
            Series {
                name: "Actual".to_string(),
                values: actual_values,
            },
        ]))
    }

    /// Computes the full breakdown of a single calendar month.
    ///
    /// Transactions with a category missing from the index land under
    /// the "Unknown" label. Budget totals cover expense-kind categories
    /// only, with yearly amounts normalized to monthly. The
    /// budget-vs-actual labels are the sorted union of category names
    /// from either side.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidMonth` when `month` is outside 1..=12.
    pub fn monthly_report(
        year: i32,
        month: u32,
        budgets: &[BudgetRecord],
        transactions: &[TransactionRecord],
        names: &NameIndex,
    ) -> Result<MonthlyReport, ReportError> {
        if !(1..=12).contains(&month) {
            return Err(ReportError::InvalidMonth(month));
        }
        let month_start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReportError::InvalidMonth(month))?;
        let following = next_month(month_start);
        let days = usize::try_from((following - month_start).num_days()).unwrap_or(0);
        let month_end = following.pred_opt().unwrap_or(month_start);

        let mut income_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut expense_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut daily_income = vec![0.0; days];
        let mut daily_expense = vec![0.0; days];
        let mut total_income = 0.0;
        let mut total_expense = 0.0;

        for transaction in transactions {
            if transaction.date < month_start || transaction.date > month_end {
                continue;
            }
            let name = names.category_name(transaction.category_id).to_string();
            let day = usize::try_from(transaction.date.day0()).unwrap_or(usize::MAX);
            match transaction.kind {
                CategoryKind::Income => {
                    *income_totals.entry(name).or_insert(0.0) += transaction.amount;
                    if let Some(bucket) = daily_income.get_mut(day) {
                        *bucket += transaction.amount;
                    }
                    total_income += transaction.amount;
                }
                CategoryKind::Expense => {
                    *expense_totals.entry(name).or_insert(0.0) += transaction.amount;
                    if let Some(bucket) = daily_expense.get_mut(day) {
                        *bucket += transaction.amount;
                    }
                    total_expense += transaction.amount;
                }
            }
        }

        let mut budget_totals: BTreeMap<String, f64> = BTreeMap::new();
        for budget in budgets {
            if budget.start_date > month_end || budget.end_date < month_start {
                continue;
            }
            let Some(info) = names.category(budget.category_id) else {
                continue;
            };
            if info.kind != CategoryKind::Expense {
                continue;
            }
            *budget_totals.entry(info.name.clone()).or_insert(0.0) += monthly_amount(budget);
        }

        let mut comparison_labels: BTreeSet<String> = budget_totals.keys().cloned().collect();
        comparison_labels.extend(expense_totals.keys().cloned());
        let comparison_labels: Vec<String> = comparison_labels.into_iter().collect();
        let comparison_budget: Vec<f64> = comparison_labels
            .iter()
            .map(|label| budget_totals.get(label).copied().unwrap_or(0.0))
            .collect();
        let comparison_actual: Vec<f64> = comparison_labels
            .iter()
            .map(|label| expense_totals.get(label).copied().unwrap_or(0.0))
            .collect();

        let (income_labels, income_values): (Vec<String>, Vec<f64>) =
            income_totals.into_iter().unzip();
        let (expense_labels, expense_values): (Vec<String>, Vec<f64>) =
            expense_totals.into_iter().unzip();

        Ok(MonthlyReport {
            income_by_category: SeriesData::new(income_labels, vec![Series {
                name: "Income".to_string(),
                values: income_values,
            }]),
            expense_by_category: SeriesData::new(expense_labels, vec![Series {
                name: "Expense".to_string(),
                values: expense_values,
            }]),
            budget_vs_actual: SeriesData::new(comparison_labels, vec![
                Series {
                    name: "Budget".to_string(),
                    values: comparison_budget,
                },
                Series {
                    name: "Actual".to_string(),
                    values: comparison_actual,
                },
            ]),
            daily_transactions: SeriesData::new(
                (1..=days).map(|day| day.to_string()).collect(),
                vec![
                    Series {
                        name: "Income".to_string(),
                        values: daily_income,
                    },
                    Series {
                        name: "Expense".to_string(),
                        values: daily_expense,
                    },
                ],
            ),
            net_income_expense: SeriesData::new(
                vec![
                    "Income".to_string(),
                    "Expense".to_string(),
                    "Net".to_string(),
                ],
                vec![Series {
                    name: "Amount".to_string(),
                    values: vec![total_income, total_expense, total_income - total_expense],
                }],
            ),
        })
    }

    /// Groups transactions by category or by (category, subcategory).
    ///
    /// Each group carries its total, count, and the category's kind
    /// (expense when the category is missing from the index). Overall
    /// totals split by the transactions' own kind.
    #[must_use]
    pub fn transaction_summary(
        transactions: &[TransactionRecord],
        names: &NameIndex,
        group_by: GroupBy,
        currency: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TransactionSummary {
        let mut groups: BTreeMap<(i32, Option<i32>), (f64, u64)> = BTreeMap::new();
        let mut total_income = 0.0;
        let mut total_expense = 0.0;

        for transaction in transactions {
            let key = match group_by {
                GroupBy::Category => (transaction.category_id, None),
                GroupBy::Subcategory => (transaction.category_id, transaction.subcategory_id),
            };
            let entry = groups.entry(key).or_insert((0.0, 0));
            entry.0 += transaction.amount;
            entry.1 += 1;
            match transaction.kind {
                CategoryKind::Income => total_income += transaction.amount,
                CategoryKind::Expense => total_expense += transaction.amount,
            }
        }

        let items = groups
            .into_iter()
            .map(
                |((category_id, subcategory_id), (total_amount, transaction_count))| {
                    TransactionSummaryItem {
                        category_id,
                        category_name: names.category_name(category_id).to_string(),
                        subcategory_id,
                        subcategory_name: subcategory_id
                            .and_then(|id| names.subcategory_name(id).map(str::to_string)),
                        total_amount,
                        transaction_count,
                        kind: names.category_kind(category_id),
                    }
                },
            )
            .collect();

        TransactionSummary {
            items,
            total_income,
            total_expense,
            net_amount: total_income - total_expense,
            currency: currency.to_string(),
            period: format!("{start} to {end}"),
        }
    }
}

fn percentage(actual: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        actual / budget * 100.0
    } else {
        0.0
    }
}

fn monthly_amount(budget: &BudgetRecord) -> f64 {
    match budget.period_type {
        PeriodType::Monthly => budget.amount,
        PeriodType::Yearly => budget.amount / 12.0,
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}
