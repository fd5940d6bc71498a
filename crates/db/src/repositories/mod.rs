//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod category;
pub mod currency_rate;
pub mod report;
pub mod subcategory;
pub mod transaction;
pub mod user;

pub use budget::{BudgetError, BudgetFilter, BudgetRepository, CreateBudgetInput, UpdateBudgetInput};
pub use category::{
    CategoryError, CategoryFilter, CategoryRepository, CreateCategoryInput, UpdateCategoryInput,
};
pub use currency_rate::{
    CurrencyRateError, CurrencyRateRepository, RateFilter, UpsertCurrencyRateInput,
};
pub use report::{ReportQueryError, ReportRepository};
pub use subcategory::{
    CreateSubcategoryInput, SubcategoryError, SubcategoryRepository, UpdateSubcategoryInput,
};
pub use transaction::{
    CreateTransactionInput, TransactionError, TransactionFilter, TransactionRepository,
    UpdateTransactionInput,
};
pub use user::UserRepository;
