//! `SeaORM` entity definitions.

pub mod budgets;
pub mod categories;
pub mod currency_rates;
pub mod sea_orm_active_enums;
pub mod subcategories;
pub mod transactions;
pub mod users;
