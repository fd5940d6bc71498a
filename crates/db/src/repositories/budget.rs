//! Budget repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{budgets, categories, sea_orm_active_enums::PeriodType, subcategories};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(i32),

    /// Referenced category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    /// Referenced subcategory not found or under a different category.
    #[error("Subcategory not found: {0}")]
    SubcategoryNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Category the budget applies to.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Budgeted amount for one period.
    pub amount: f64,
    /// Currency code.
    pub currency: String,
    /// Window start.
    pub start_date: NaiveDate,
    /// Window end.
    pub end_date: NaiveDate,
    /// Monthly or yearly.
    pub period_type: PeriodType,
}

/// Input for updating a budget. Unset fields are left unchanged;
/// `subcategory_id` distinguishes "leave as is" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New category.
    pub category_id: Option<i32>,
    /// New subcategory, or `Some(None)` to clear it.
    pub subcategory_id: Option<Option<i32>>,
    /// New amount.
    pub amount: Option<f64>,
    /// New currency code.
    pub currency: Option<String>,
    /// New window start.
    pub start_date: Option<NaiveDate>,
    /// New window end.
    pub end_date: Option<NaiveDate>,
    /// New period type.
    pub period_type: Option<PeriodType>,
}

/// Filter for listing budgets.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to one subcategory.
    pub subcategory_id: Option<i32>,
    /// Restrict to one currency.
    pub currency: Option<String>,
    /// Keep only budgets whose window overlaps this inclusive range.
    pub overlaps: Option<(NaiveDate, NaiveDate)>,
    /// Keep only budgets whose window contains this date.
    pub active_on: Option<NaiveDate>,
}

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new budget.
    ///
    /// # Errors
    ///
    /// Returns an error when the category is missing or the subcategory
    /// does not belong to it.
    pub async fn create(&self, input: CreateBudgetInput) -> Result<budgets::Model, BudgetError> {
        self.require_category(input.category_id).await?;
        if let Some(subcategory_id) = input.subcategory_id {
            self.require_subcategory(subcategory_id, input.category_id)
                .await?;
        }

        let now = chrono::Utc::now().into();
        let budget = budgets::ActiveModel {
            category_id: Set(input.category_id),
            subcategory_id: Set(input.subcategory_id),
            amount: Set(input.amount),
            currency: Set(input.currency),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            period_type: Set(input.period_type),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(budget.insert(&self.db).await?)
    }

    /// Lists budgets matching a filter, newest window first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &BudgetFilter) -> Result<Vec<budgets::Model>, BudgetError> {
        let mut query = budgets::Entity::find();
        if let Some(category_id) = filter.category_id {
            query = query.filter(budgets::Column::CategoryId.eq(category_id));
        }
        if let Some(subcategory_id) = filter.subcategory_id {
            query = query.filter(budgets::Column::SubcategoryId.eq(subcategory_id));
        }
        if let Some(currency) = &filter.currency {
            query = query.filter(budgets::Column::Currency.eq(currency));
        }
        if let Some((start, end)) = filter.overlaps {
            query = query
                .filter(budgets::Column::StartDate.lte(end))
                .filter(budgets::Column::EndDate.gte(start));
        }
        if let Some(on) = filter.active_on {
            query = query
                .filter(budgets::Column::StartDate.lte(on))
                .filter(budgets::Column::EndDate.gte(on));
        }
        Ok(query
            .order_by_desc(budgets::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Finds a budget by ID.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist.
    pub async fn get(&self, id: i32) -> Result<budgets::Model, BudgetError> {
        budgets::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// Applies a partial update to a budget.
    ///
    /// Referential checks run against the post-update values, so moving
    /// a budget to a new category requires its subcategory (kept or
    /// supplied) to belong to that category.
    ///
    /// # Errors
    ///
    /// Returns an error when the budget, category, or subcategory is missing.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateBudgetInput,
    ) -> Result<budgets::Model, BudgetError> {
        let budget = self.get(id).await?;

        let category_id = input.category_id.unwrap_or(budget.category_id);
        let subcategory_id = input.subcategory_id.unwrap_or(budget.subcategory_id);
        self.require_category(category_id).await?;
        if let Some(subcategory_id) = subcategory_id {
            self.require_subcategory(subcategory_id, category_id).await?;
        }

        let mut active: budgets::ActiveModel = budget.into();
        active.category_id = Set(category_id);
        active.subcategory_id = Set(subcategory_id);
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency);
        }
        if let Some(start_date) = input.start_date {
            active.start_date = Set(start_date);
        }
        if let Some(end_date) = input.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(period_type) = input.period_type {
            active.period_type = Set(period_type);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the budget does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), BudgetError> {
        let result = budgets::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id));
        }
        Ok(())
    }

    async fn require_category(&self, category_id: i32) -> Result<(), BudgetError> {
        categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::CategoryNotFound(category_id))?;
        Ok(())
    }

    async fn require_subcategory(
        &self,
        subcategory_id: i32,
        category_id: i32,
    ) -> Result<(), BudgetError> {
        let subcategory = subcategories::Entity::find_by_id(subcategory_id)
            .one(&self.db)
            .await?
            .ok_or(BudgetError::SubcategoryNotFound(subcategory_id))?;
        if subcategory.category_id != category_id {
            return Err(BudgetError::SubcategoryNotFound(subcategory_id));
        }
        Ok(())
    }
}
