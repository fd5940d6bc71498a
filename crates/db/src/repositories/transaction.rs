//! Transaction repository for database operations.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{
    categories, sea_orm_active_enums::CategoryKind, subcategories, transactions,
};

/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(i32),

    /// Referenced category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    /// Referenced subcategory not found or under a different category.
    #[error("Subcategory not found: {0}")]
    SubcategoryNotFound(i32),

    /// Transaction kind disagrees with the category's kind.
    #[error("Transaction kind does not match category kind")]
    KindMismatch,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Category the transaction is recorded under.
    pub category_id: i32,
    /// Optional subcategory refinement.
    pub subcategory_id: Option<i32>,
    /// Transaction amount.
    pub amount: f64,
    /// Currency code.
    pub currency: String,
    /// Date the transaction occurred.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: Option<String>,
    /// Income or expense; must match the category's kind.
    pub kind: CategoryKind,
}

/// Input for updating a transaction. Unset fields are left unchanged;
/// `subcategory_id` and `description` distinguish "leave as is"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// New category.
    pub category_id: Option<i32>,
    /// New subcategory, or `Some(None)` to clear it.
    pub subcategory_id: Option<Option<i32>>,
    /// New amount.
    pub amount: Option<f64>,
    /// New currency code.
    pub currency: Option<String>,
    /// New transaction date.
    pub transaction_date: Option<NaiveDate>,
    /// New description, or `Some(None)` to clear it.
    pub description: Option<Option<String>>,
    /// New kind.
    pub kind: Option<CategoryKind>,
}

/// Filter for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one category.
    pub category_id: Option<i32>,
    /// Restrict to one subcategory.
    pub subcategory_id: Option<i32>,
    /// Restrict to one currency.
    pub currency: Option<String>,
    /// Restrict to income or expense.
    pub kind: Option<CategoryKind>,
    /// Keep transactions on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Keep transactions on or before this date.
    pub end_date: Option<NaiveDate>,
}

/// Transaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when the category is missing, the subcategory
    /// does not belong to it, or the kind disagrees with the category.
    pub async fn create(
        &self,
        input: CreateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        self.check_references(input.category_id, input.subcategory_id, input.kind)
            .await?;

        let now = chrono::Utc::now().into();
        let transaction = transactions::ActiveModel {
            category_id: Set(input.category_id),
            subcategory_id: Set(input.subcategory_id),
            amount: Set(input.amount),
            currency: Set(input.currency),
            transaction_date: Set(input.transaction_date),
            description: Set(input.description),
            kind: Set(input.kind),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(transaction.insert(&self.db).await?)
    }

    /// Lists transactions matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<transactions::Model>, TransactionError> {
        let mut query = transactions::Entity::find();
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(subcategory_id) = filter.subcategory_id {
            query = query.filter(transactions::Column::SubcategoryId.eq(subcategory_id));
        }
        if let Some(currency) = &filter.currency {
            query = query.filter(transactions::Column::Currency.eq(currency));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind));
        }
        if let Some(start_date) = filter.start_date {
            query = query.filter(transactions::Column::TransactionDate.gte(start_date));
        }
        if let Some(end_date) = filter.end_date {
            query = query.filter(transactions::Column::TransactionDate.lte(end_date));
        }
        Ok(query
            .order_by_desc(transactions::Column::TransactionDate)
            .all(&self.db)
            .await?)
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn get(&self, id: i32) -> Result<transactions::Model, TransactionError> {
        transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::NotFound(id))
    }

    /// Applies a partial update to a transaction.
    ///
    /// Referential and kind checks run against the post-update values.
    ///
    /// # Errors
    ///
    /// Returns an error when the transaction, category, or subcategory is
    /// missing, or when the resulting kind disagrees with the category.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateTransactionInput,
    ) -> Result<transactions::Model, TransactionError> {
        let transaction = self.get(id).await?;

        let category_id = input.category_id.unwrap_or(transaction.category_id);
        let subcategory_id = input.subcategory_id.unwrap_or(transaction.subcategory_id);
        let kind = input.kind.unwrap_or(transaction.kind);
        self.check_references(category_id, subcategory_id, kind)
            .await?;

        let mut active: transactions::ActiveModel = transaction.into();
        active.category_id = Set(category_id);
        active.subcategory_id = Set(subcategory_id);
        active.kind = Set(kind);
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(currency) = input.currency {
            active.currency = Set(currency);
        }
        if let Some(transaction_date) = input.transaction_date {
            active.transaction_date = Set(transaction_date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotFound` if the transaction does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), TransactionError> {
        let result = transactions::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(TransactionError::NotFound(id));
        }
        Ok(())
    }

    async fn check_references(
        &self,
        category_id: i32,
        subcategory_id: Option<i32>,
        kind: CategoryKind,
    ) -> Result<(), TransactionError> {
        let category = categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(TransactionError::CategoryNotFound(category_id))?;
        if category.kind != kind {
            return Err(TransactionError::KindMismatch);
        }
        if let Some(subcategory_id) = subcategory_id {
            let subcategory = subcategories::Entity::find_by_id(subcategory_id)
                .one(&self.db)
                .await?
                .ok_or(TransactionError::SubcategoryNotFound(subcategory_id))?;
            if subcategory.category_id != category_id {
                return Err(TransactionError::SubcategoryNotFound(subcategory_id));
            }
        }
        Ok(())
    }
}
