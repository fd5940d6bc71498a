//! Database enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income/expense classification stored as the `category_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_kind")]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<CategoryKind> for moneta_shared::CategoryKind {
    fn from(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Income => Self::Income,
            CategoryKind::Expense => Self::Expense,
        }
    }
}

impl From<moneta_shared::CategoryKind> for CategoryKind {
    fn from(kind: moneta_shared::CategoryKind) -> Self {
        match kind {
            moneta_shared::CategoryKind::Income => Self::Income,
            moneta_shared::CategoryKind::Expense => Self::Expense,
        }
    }
}

/// Budget period stored as the `period_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_type")]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Amount applies per month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Amount applies per year.
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl From<PeriodType> for moneta_shared::PeriodType {
    fn from(period: PeriodType) -> Self {
        match period {
            PeriodType::Monthly => Self::Monthly,
            PeriodType::Yearly => Self::Yearly,
        }
    }
}

impl From<moneta_shared::PeriodType> for PeriodType {
    fn from(period: moneta_shared::PeriodType) -> Self {
        match period {
            moneta_shared::PeriodType::Monthly => Self::Monthly,
            moneta_shared::PeriodType::Yearly => Self::Yearly,
        }
    }
}
