//! Currency rate repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::currency_rates;

/// Error types for currency rate operations.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyRateError {
    /// Rate not found.
    #[error("Currency rate not found: {0}")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a rate; an existing (from, to, date) row is
/// updated in place.
#[derive(Debug, Clone)]
pub struct UpsertCurrencyRateInput {
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Units of target currency per unit of source currency.
    pub rate: f64,
    /// Date the rate takes effect.
    pub effective_date: NaiveDate,
}

/// Filter for listing rates.
#[derive(Debug, Clone, Default)]
pub struct RateFilter {
    /// Restrict to one source currency.
    pub from_currency: Option<String>,
    /// Restrict to one target currency.
    pub to_currency: Option<String>,
}

/// Currency rate repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CurrencyRateRepository {
    db: DatabaseConnection,
}

impl CurrencyRateRepository {
    /// Creates a new currency rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a rate, replacing any existing rate for the same pair
    /// and effective date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert(
        &self,
        input: UpsertCurrencyRateInput,
    ) -> Result<currency_rates::Model, CurrencyRateError> {
        let now = chrono::Utc::now().into();
        let existing = currency_rates::Entity::find()
            .filter(currency_rates::Column::FromCurrency.eq(&input.from_currency))
            .filter(currency_rates::Column::ToCurrency.eq(&input.to_currency))
            .filter(currency_rates::Column::EffectiveDate.eq(input.effective_date))
            .one(&self.db)
            .await?;

        if let Some(existing) = existing {
            let mut active: currency_rates::ActiveModel = existing.into();
            active.rate = Set(input.rate);
            active.updated_at = Set(now);
            return Ok(active.update(&self.db).await?);
        }

        let rate = currency_rates::ActiveModel {
            from_currency: Set(input.from_currency),
            to_currency: Set(input.to_currency),
            rate: Set(input.rate),
            effective_date: Set(input.effective_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(rate.insert(&self.db).await?)
    }

    /// Lists rates matching a filter, most recent effective date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &RateFilter,
    ) -> Result<Vec<currency_rates::Model>, CurrencyRateError> {
        let mut query = currency_rates::Entity::find();
        if let Some(from) = &filter.from_currency {
            query = query.filter(currency_rates::Column::FromCurrency.eq(from));
        }
        if let Some(to) = &filter.to_currency {
            query = query.filter(currency_rates::Column::ToCurrency.eq(to));
        }
        Ok(query
            .order_by_desc(currency_rates::Column::EffectiveDate)
            .all(&self.db)
            .await?)
    }

    /// Deletes a rate.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyRateError::NotFound` if the rate does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), CurrencyRateError> {
        let result = currency_rates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CurrencyRateError::NotFound(id));
        }
        Ok(())
    }
}
