//! Report repository: assembles engine inputs from the database.
//!
//! Fetches budgets, transactions, and name data for a requested window
//! and hands them to the pure aggregation engine in `moneta-core`.

use chrono::NaiveDate;
use moneta_core::reports::{
    BudgetRecord, BudgetSummary, GroupBy, MonthlyReport, NameIndex, ReportEngine, ReportError,
    SeriesData, TransactionRecord, TransactionSummary,
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::entities::{budgets, categories, subcategories, transactions};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Aggregation error.
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Repository producing report datasets.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Budget-vs-actual summary for a period and currency.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn budget_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
    ) -> Result<BudgetSummary, ReportQueryError> {
        let budgets = self
            .fetch_budgets(start, end, currency, None, None)
            .await?;
        let transactions = self
            .fetch_transactions(start, end, currency, None, None)
            .await?;
        let names = self.name_index().await?;

        Ok(ReportEngine::budget_summary(
            &budgets,
            &transactions,
            &names,
            currency,
            start,
            end,
        ))
    }

    /// Budget and actual series per month over a range.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails or the range is inverted.
    pub async fn trend(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
        category_id: Option<i32>,
        subcategory_id: Option<i32>,
    ) -> Result<SeriesData, ReportQueryError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end }.into());
        }
        let budgets = self
            .fetch_budgets(start, end, currency, category_id, subcategory_id)
            .await?;
        let transactions = self
            .fetch_transactions(start, end, currency, category_id, subcategory_id)
            .await?;

        Ok(ReportEngine::trend_series(
            &budgets,
            &transactions,
            start,
            end,
        )?)
    }

    /// Full breakdown of one calendar month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is invalid or a database query fails.
    pub async fn monthly_report(
        &self,
        year: i32,
        month: u32,
        currency: &str,
    ) -> Result<MonthlyReport, ReportQueryError> {
        let (month_start, month_end) = month_window(year, month)?;

        let budgets = self
            .fetch_budgets(month_start, month_end, currency, None, None)
            .await?;
        let transactions = self
            .fetch_transactions(month_start, month_end, currency, None, None)
            .await?;
        let names = self.name_index().await?;

        Ok(ReportEngine::monthly_report(
            year,
            month,
            &budgets,
            &transactions,
            &names,
        )?)
    }

    /// Grouped transaction totals over a period.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn transaction_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
        group_by: GroupBy,
    ) -> Result<TransactionSummary, ReportQueryError> {
        let transactions = self
            .fetch_transactions(start, end, currency, None, None)
            .await?;
        let names = self.name_index().await?;

        Ok(ReportEngine::transaction_summary(
            &transactions,
            &names,
            group_by,
            currency,
            start,
            end,
        ))
    }

    async fn fetch_budgets(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
        category_id: Option<i32>,
        subcategory_id: Option<i32>,
    ) -> Result<Vec<BudgetRecord>, DbErr> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::Currency.eq(currency))
            .filter(budgets::Column::StartDate.lte(end))
            .filter(budgets::Column::EndDate.gte(start));
        if let Some(category_id) = category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id));
        }
        if let Some(subcategory_id) = subcategory_id {
            query = query.filter(budgets::Column::SubcategoryId.eq(subcategory_id));
        }

        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| BudgetRecord {
                category_id: model.category_id,
                subcategory_id: model.subcategory_id,
                amount: model.amount,
                period_type: model.period_type.into(),
                start_date: model.start_date,
                end_date: model.end_date,
            })
            .collect())
    }

    async fn fetch_transactions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        currency: &str,
        category_id: Option<i32>,
        subcategory_id: Option<i32>,
    ) -> Result<Vec<TransactionRecord>, DbErr> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::Currency.eq(currency))
            .filter(transactions::Column::TransactionDate.gte(start))
            .filter(transactions::Column::TransactionDate.lte(end));
        if let Some(category_id) = category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(subcategory_id) = subcategory_id {
            query = query.filter(transactions::Column::SubcategoryId.eq(subcategory_id));
        }

        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| TransactionRecord {
                category_id: model.category_id,
                subcategory_id: model.subcategory_id,
                amount: model.amount,
                kind: model.kind.into(),
                date: model.transaction_date,
            })
            .collect())
    }

    async fn name_index(&self) -> Result<NameIndex, DbErr> {
        let mut names = NameIndex::new();
        for category in categories::Entity::find().all(&self.db).await? {
            names.insert_category(category.id, category.name, category.kind.into());
        }
        for subcategory in subcategories::Entity::find().all(&self.db).await? {
            names.insert_subcategory(subcategory.id, subcategory.name);
        }
        Ok(names)
    }
}

/// First and last day of a calendar month.
fn month_window(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), ReportError> {
    let month_start =
        NaiveDate::from_ymd_opt(year, month, 1).ok_or(ReportError::InvalidMonth(month))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let month_end = next
        .and_then(|d| d.pred_opt())
        .ok_or(ReportError::InvalidMonth(month))?;
    Ok((month_start, month_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_window_bounds() {
        assert_eq!(
            month_window(2024, 2).unwrap(),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_window(2023, 2).unwrap(),
            (date(2023, 2, 1), date(2023, 2, 28))
        );
        assert_eq!(
            month_window(2024, 12).unwrap(),
            (date(2024, 12, 1), date(2024, 12, 31))
        );
    }

    #[test]
    fn test_month_window_invalid_month() {
        assert_eq!(month_window(2024, 13), Err(ReportError::InvalidMonth(13)));
        assert_eq!(month_window(2024, 0), Err(ReportError::InvalidMonth(0)));
    }
}
