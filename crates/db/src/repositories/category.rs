//! Category repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{categories, sea_orm_active_enums::CategoryKind};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Category name.
    pub name: String,
    /// Income or expense.
    pub kind: CategoryKind,
}

/// Filter and pagination for listing categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryFilter {
    /// Restrict to income or expense categories.
    pub kind: Option<CategoryKind>,
    /// Number of rows to skip.
    pub skip: Option<u64>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
}

/// Input for updating a category. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<CategoryKind>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateCategoryInput) -> Result<categories::Model, CategoryError> {
        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            name: Set(input.name),
            kind: Set(input.kind),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists categories ordered by name, optionally filtered and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: CategoryFilter) -> Result<Vec<categories::Model>, CategoryError> {
        let mut query = categories::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(categories::Column::Kind.eq(kind));
        }
        if let Some(skip) = filter.skip {
            query = query.offset(skip);
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        Ok(query
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn get(&self, id: i32) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    /// Applies a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.get(id).await?;

        let mut active: categories::ActiveModel = category.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category; subcategories, budgets, and transactions
    /// under it cascade.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), CategoryError> {
        let result = categories::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }
        Ok(())
    }
}
