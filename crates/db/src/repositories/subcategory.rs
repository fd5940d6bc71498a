//! Subcategory repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{categories, subcategories};

/// Error types for subcategory operations.
#[derive(Debug, thiserror::Error)]
pub enum SubcategoryError {
    /// Subcategory not found.
    #[error("Subcategory not found: {0}")]
    NotFound(i32),

    /// Parent category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a subcategory.
#[derive(Debug, Clone)]
pub struct CreateSubcategoryInput {
    /// Subcategory name.
    pub name: String,
    /// Parent category ID.
    pub category_id: i32,
}

/// Input for updating a subcategory. Unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubcategoryInput {
    /// New name.
    pub name: Option<String>,
    /// New parent category.
    pub category_id: Option<i32>,
}

/// Subcategory repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SubcategoryRepository {
    db: DatabaseConnection,
}

impl SubcategoryRepository {
    /// Creates a new subcategory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new subcategory under an existing category.
    ///
    /// # Errors
    ///
    /// Returns `SubcategoryError::CategoryNotFound` if the parent is missing.
    pub async fn create(
        &self,
        input: CreateSubcategoryInput,
    ) -> Result<subcategories::Model, SubcategoryError> {
        self.require_category(input.category_id).await?;

        let now = chrono::Utc::now().into();
        let subcategory = subcategories::ActiveModel {
            name: Set(input.name),
            category_id: Set(input.category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(subcategory.insert(&self.db).await?)
    }

    /// Lists subcategories, optionally restricted to one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        category_id: Option<i32>,
    ) -> Result<Vec<subcategories::Model>, SubcategoryError> {
        let mut query = subcategories::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(subcategories::Column::CategoryId.eq(category_id));
        }
        Ok(query
            .order_by_asc(subcategories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds a subcategory by ID.
    ///
    /// # Errors
    ///
    /// Returns `SubcategoryError::NotFound` if the subcategory does not exist.
    pub async fn get(&self, id: i32) -> Result<subcategories::Model, SubcategoryError> {
        subcategories::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(SubcategoryError::NotFound(id))
    }

    /// Applies a partial update to a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `SubcategoryError::NotFound` if the subcategory is missing,
    /// or `SubcategoryError::CategoryNotFound` when reparenting onto a
    /// category that does not exist.
    pub async fn update(
        &self,
        id: i32,
        input: UpdateSubcategoryInput,
    ) -> Result<subcategories::Model, SubcategoryError> {
        let subcategory = self.get(id).await?;

        if let Some(category_id) = input.category_id {
            self.require_category(category_id).await?;
        }

        let mut active: subcategories::ActiveModel = subcategory.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `SubcategoryError::NotFound` if the subcategory does not exist.
    pub async fn delete(&self, id: i32) -> Result<(), SubcategoryError> {
        let result = subcategories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SubcategoryError::NotFound(id));
        }
        Ok(())
    }

    async fn require_category(&self, category_id: i32) -> Result<(), SubcategoryError> {
        categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(SubcategoryError::CategoryNotFound(category_id))?;
        Ok(())
    }
}
