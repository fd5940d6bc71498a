//! Property-based and scenario tests for the report engine.

use chrono::NaiveDate;
use moneta_shared::{CategoryKind, PeriodType};
use proptest::prelude::*;

use super::engine::ReportEngine;
use super::error::ReportError;
use super::types::{BudgetRecord, GroupBy, NameIndex, TransactionRecord};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn budget(
    category_id: i32,
    subcategory_id: Option<i32>,
    amount: f64,
    period_type: PeriodType,
    start: NaiveDate,
    end: NaiveDate,
) -> BudgetRecord {
    BudgetRecord {
        category_id,
        subcategory_id,
        amount,
        period_type,
        start_date: start,
        end_date: end,
    }
}

fn transaction(
    category_id: i32,
    subcategory_id: Option<i32>,
    amount: f64,
    kind: CategoryKind,
    on: NaiveDate,
) -> TransactionRecord {
    TransactionRecord {
        category_id,
        subcategory_id,
        amount,
        kind,
        date: on,
    }
}

proptest! {
    /// Summary totals equal the sums over the emitted items, for any
    /// non-negative amount set.
    #[test]
    fn test_budget_summary_totals_match_items(
        amounts in prop::collection::vec((1i32..20, 0.0f64..10_000.0), 1..30),
        actuals in prop::collection::vec((1i32..20, 0.0f64..10_000.0), 0..30),
    ) {
        let start = date(2024, 1, 1);
        let end = date(2024, 12, 31);
        let budgets: Vec<BudgetRecord> = amounts
            .iter()
            .map(|(cat, amount)| budget(*cat, None, *amount, PeriodType::Monthly, start, end))
            .collect();
        let transactions: Vec<TransactionRecord> = actuals
            .iter()
            .map(|(cat, amount)| {
                transaction(*cat, None, *amount, CategoryKind::Expense, date(2024, 6, 15))
            })
            .collect();

        let summary = ReportEngine::budget_summary(
            &budgets,
            &transactions,
            &NameIndex::new(),
            "USD",
            start,
            end,
        );

        let item_budget: f64 = summary.items.iter().map(|i| i.budget_amount).sum();
        let item_actual: f64 = summary.items.iter().map(|i| i.actual_amount).sum();
        prop_assert!((summary.total_budget - item_budget).abs() < 1e-9);
        prop_assert!((summary.total_actual - item_actual).abs() < 1e-9);
    }

    /// Percentage is exactly 0 for a zero budget, else 100 * actual / budget.
    #[test]
    fn test_budget_summary_percentage(
        budget_amount in 0.0f64..10_000.0,
        actual_amount in 0.0f64..10_000.0,
    ) {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);
        let budgets = vec![budget(1, None, budget_amount, PeriodType::Monthly, start, end)];
        let transactions = vec![transaction(
            1,
            None,
            actual_amount,
            CategoryKind::Expense,
            date(2024, 1, 10),
        )];

        let summary = ReportEngine::budget_summary(
            &budgets,
            &transactions,
            &NameIndex::new(),
            "USD",
            start,
            end,
        );

        let item = &summary.items[0];
        if budget_amount > 0.0 {
            let expected = actual_amount / budget_amount * 100.0;
            prop_assert!((item.percentage_used - expected).abs() < 1e-9);
        } else {
            prop_assert_eq!(item.percentage_used, 0.0);
        }
    }

    /// Trend label count equals the inclusive calendar month difference.
    #[test]
    fn test_trend_series_label_count(
        start_year in 2020i32..2026,
        start_month in 1u32..=12,
        extra_months in 0i64..36,
    ) {
        let start = date(start_year, start_month, 1);
        let mut end_year = start_year;
        let mut end_month = i64::from(start_month) + extra_months;
        while end_month > 12 {
            end_month -= 12;
            end_year += 1;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let end = date(end_year, end_month as u32, 15);

        let data = ReportEngine::trend_series(&[], &[], start, end).unwrap();

        let expected = (i64::from(end_year) * 12 + end_month)
            - (i64::from(start_year) * 12 + i64::from(start_month))
            + 1;
        prop_assert_eq!(data.labels.len() as i64, expected);
        for series in &data.series {
            prop_assert_eq!(series.values.len(), data.labels.len());
        }
    }

    /// A yearly budget contributes amount / 12 to every overlapped month
    /// and nothing outside the overlap.
    #[test]
    fn test_trend_series_yearly_normalization(amount in 12.0f64..120_000.0) {
        let budgets = vec![budget(
            1,
            None,
            amount,
            PeriodType::Yearly,
            date(2024, 3, 1),
            date(2024, 8, 31),
        )];

        // Jan..Dec 2024; overlap is Mar..Aug.
        let data =
            ReportEngine::trend_series(&budgets, &[], date(2024, 1, 1), date(2024, 12, 31))
                .unwrap();

        let monthly = amount / 12.0;
        for (index, value) in data.series[0].values.iter().enumerate() {
            if (2..=7).contains(&index) {
                prop_assert!((value - monthly).abs() < 1e-9);
            } else {
                prop_assert_eq!(*value, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_budget_summary_unbudgeted_spend_excluded() {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);
        let budgets = vec![budget(1, None, 500.0, PeriodType::Monthly, start, end)];
        let transactions = vec![
            transaction(1, None, 200.0, CategoryKind::Expense, date(2024, 1, 5)),
            // No budget for category 2; excluded from items and totals.
            transaction(2, None, 999.0, CategoryKind::Expense, date(2024, 1, 6)),
        ];

        let summary = ReportEngine::budget_summary(
            &budgets,
            &transactions,
            &NameIndex::new(),
            "USD",
            start,
            end,
        );

        assert_eq!(summary.items.len(), 1);
        assert!((summary.total_budget - 500.0).abs() < 1e-9);
        assert!((summary.total_actual - 200.0).abs() < 1e-9);
        assert!((summary.overall_percentage - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_budget_summary_resolves_names() {
        let mut names = NameIndex::new();
        names.insert_category(1, "Groceries", CategoryKind::Expense);
        names.insert_subcategory(7, "Produce");
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);
        let budgets = vec![budget(1, Some(7), 100.0, PeriodType::Monthly, start, end)];

        let summary = ReportEngine::budget_summary(&budgets, &[], &names, "USD", start, end);

        let item = &summary.items[0];
        assert_eq!(item.category_name, "Groceries");
        assert_eq!(item.subcategory_name.as_deref(), Some("Produce"));
        assert_eq!(summary.period, "2024-01-01 to 2024-01-31");
    }

    #[test]
    fn test_trend_series_yearly_budget_clipped_to_range() {
        // 1200/year over all of 2024, queried Mar..May: 100 per month.
        let budgets = vec![budget(
            1,
            None,
            1200.0,
            PeriodType::Yearly,
            date(2024, 1, 1),
            date(2024, 12, 31),
        )];

        let data =
            ReportEngine::trend_series(&budgets, &[], date(2024, 3, 1), date(2024, 5, 31)).unwrap();

        assert_eq!(data.labels, vec!["Mar 2024", "Apr 2024", "May 2024"]);
        assert_eq!(data.series[0].name, "Budget");
        assert_eq!(data.series[0].values, vec![100.0, 100.0, 100.0]);
        let total: f64 = data.series[0].values.iter().sum();
        assert!((total - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_series_actuals_expense_only() {
        let transactions = vec![
            transaction(1, None, 40.0, CategoryKind::Expense, date(2024, 1, 10)),
            transaction(1, None, 25.0, CategoryKind::Expense, date(2024, 2, 3)),
            transaction(2, None, 1000.0, CategoryKind::Income, date(2024, 1, 15)),
        ];

        let data =
            ReportEngine::trend_series(&[], &transactions, date(2024, 1, 1), date(2024, 2, 29))
                .unwrap();

        assert_eq!(data.series[1].name, "Actual");
        assert_eq!(data.series[1].values, vec![40.0, 25.0]);
    }

    #[test]
    fn test_trend_series_inverted_range() {
        let result = ReportEngine::trend_series(&[], &[], date(2024, 6, 1), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(ReportError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_trend_series_budget_outside_range_contributes_nothing() {
        let budgets = vec![budget(
            1,
            None,
            600.0,
            PeriodType::Monthly,
            date(2023, 1, 1),
            date(2023, 12, 31),
        )];

        let data =
            ReportEngine::trend_series(&budgets, &[], date(2024, 1, 1), date(2024, 3, 31)).unwrap();

        assert_eq!(data.series[0].values, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_monthly_report_daily_series_length() {
        for (year, month, expected_days) in [(2023, 2, 28), (2024, 2, 29), (2024, 1, 31)] {
            let report =
                ReportEngine::monthly_report(year, month, &[], &[], &NameIndex::new()).unwrap();
            assert_eq!(report.daily_transactions.labels.len(), expected_days);
            for series in &report.daily_transactions.series {
                assert_eq!(series.values.len(), expected_days);
            }
        }
    }

    #[test]
    fn test_monthly_report_invalid_month() {
        let result = ReportEngine::monthly_report(2024, 13, &[], &[], &NameIndex::new());
        assert_eq!(result.unwrap_err(), ReportError::InvalidMonth(13));

        let result = ReportEngine::monthly_report(2024, 0, &[], &[], &NameIndex::new());
        assert_eq!(result.unwrap_err(), ReportError::InvalidMonth(0));
    }

    #[test]
    fn test_monthly_report_unknown_category_label() {
        let transactions = vec![transaction(
            42,
            None,
            75.0,
            CategoryKind::Expense,
            date(2024, 1, 20),
        )];

        let report =
            ReportEngine::monthly_report(2024, 1, &[], &transactions, &NameIndex::new()).unwrap();

        assert_eq!(report.expense_by_category.labels, vec!["Unknown"]);
        assert_eq!(report.expense_by_category.series[0].values, vec![75.0]);
    }

    #[test]
    fn test_monthly_report_budget_vs_actual_union_sorted() {
        let mut names = NameIndex::new();
        names.insert_category(1, "Rent", CategoryKind::Expense);
        names.insert_category(2, "Food", CategoryKind::Expense);
        names.insert_category(3, "Salary", CategoryKind::Income);
        let budgets = vec![budget(
            1,
            None,
            1000.0,
            PeriodType::Monthly,
            date(2024, 1, 1),
            date(2024, 12, 31),
        )];
        let transactions = vec![
            transaction(2, None, 80.0, CategoryKind::Expense, date(2024, 1, 5)),
            transaction(3, None, 5000.0, CategoryKind::Income, date(2024, 1, 25)),
        ];

        let report =
            ReportEngine::monthly_report(2024, 1, &budgets, &transactions, &names).unwrap();

        // Sorted union of budgeted (Rent) and actual (Food) expense names.
        assert_eq!(report.budget_vs_actual.labels, vec!["Food", "Rent"]);
        assert_eq!(report.budget_vs_actual.series[0].values, vec![0.0, 1000.0]);
        assert_eq!(report.budget_vs_actual.series[1].values, vec![80.0, 0.0]);
    }

    #[test]
    fn test_monthly_report_excludes_income_category_budgets() {
        let mut names = NameIndex::new();
        names.insert_category(3, "Salary", CategoryKind::Income);
        let budgets = vec![budget(
            3,
            None,
            5000.0,
            PeriodType::Monthly,
            date(2024, 1, 1),
            date(2024, 12, 31),
        )];

        let report = ReportEngine::monthly_report(2024, 1, &budgets, &[], &names).unwrap();

        assert!(report.budget_vs_actual.labels.is_empty());
    }

    #[test]
    fn test_monthly_report_net_series() {
        let mut names = NameIndex::new();
        names.insert_category(1, "Food", CategoryKind::Expense);
        names.insert_category(2, "Salary", CategoryKind::Income);
        let transactions = vec![
            transaction(2, None, 3000.0, CategoryKind::Income, date(2024, 1, 1)),
            transaction(1, None, 450.0, CategoryKind::Expense, date(2024, 1, 14)),
        ];

        let report =
            ReportEngine::monthly_report(2024, 1, &[], &transactions, &names).unwrap();

        assert_eq!(
            report.net_income_expense.labels,
            vec!["Income", "Expense", "Net"]
        );
        assert_eq!(
            report.net_income_expense.series[0].values,
            vec![3000.0, 450.0, 2550.0]
        );
        // Day buckets land on the transaction's day of month.
        assert_eq!(report.daily_transactions.series[0].values[0], 3000.0);
        assert_eq!(report.daily_transactions.series[1].values[13], 450.0);
    }

    #[test]
    fn test_transaction_summary_by_category() {
        // Two Food expenses, no budget involved.
        let mut names = NameIndex::new();
        names.insert_category(1, "Food", CategoryKind::Expense);
        let transactions = vec![
            transaction(1, None, 50.0, CategoryKind::Expense, date(2024, 1, 5)),
            transaction(1, Some(9), 30.0, CategoryKind::Expense, date(2024, 1, 18)),
        ];

        let summary = ReportEngine::transaction_summary(
            &transactions,
            &names,
            GroupBy::Category,
            "USD",
            date(2024, 1, 1),
            date(2024, 1, 31),
        );

        assert_eq!(summary.items.len(), 1);
        let item = &summary.items[0];
        assert_eq!(item.category_name, "Food");
        assert!((item.total_amount - 80.0).abs() < 1e-9);
        assert_eq!(item.transaction_count, 2);
        assert_eq!(item.kind, CategoryKind::Expense);
        assert!((summary.total_expense - 80.0).abs() < 1e-9);
        assert_eq!(summary.total_income, 0.0);
        assert!((summary.net_amount - (-80.0)).abs() < 1e-9);
    }

    #[test]
    fn test_transaction_summary_by_subcategory_splits_groups() {
        let mut names = NameIndex::new();
        names.insert_category(1, "Food", CategoryKind::Expense);
        names.insert_subcategory(9, "Dining out");
        let transactions = vec![
            transaction(1, None, 50.0, CategoryKind::Expense, date(2024, 1, 5)),
            transaction(1, Some(9), 30.0, CategoryKind::Expense, date(2024, 1, 18)),
        ];

        let summary = ReportEngine::transaction_summary(
            &transactions,
            &names,
            GroupBy::Subcategory,
            "USD",
            date(2024, 1, 1),
            date(2024, 1, 31),
        );

        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.items[0].subcategory_id, None);
        assert_eq!(summary.items[1].subcategory_id, Some(9));
        assert_eq!(summary.items[1].subcategory_name.as_deref(), Some("Dining out"));
    }

    #[test]
    fn test_transaction_summary_unknown_category_defaults_to_expense() {
        let transactions = vec![transaction(
            77,
            None,
            10.0,
            CategoryKind::Expense,
            date(2024, 1, 2),
        )];

        let summary = ReportEngine::transaction_summary(
            &transactions,
            &NameIndex::new(),
            GroupBy::Category,
            "USD",
            date(2024, 1, 1),
            date(2024, 1, 31),
        );

        assert_eq!(summary.items[0].category_name, "Unknown");
        assert_eq!(summary.items[0].kind, CategoryKind::Expense);
    }

    #[test]
    fn test_group_by_parsing() {
        assert_eq!("category".parse::<GroupBy>().unwrap(), GroupBy::Category);
        assert_eq!(
            "subcategory".parse::<GroupBy>().unwrap(),
            GroupBy::Subcategory
        );
        assert_eq!(
            "invalid".parse::<GroupBy>().unwrap_err(),
            ReportError::InvalidGroupBy("invalid".to_string())
        );
    }
}
