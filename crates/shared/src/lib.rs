//! Shared types, errors, and configuration for Moneta.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management (server, database, JWT, currencies)
//! - JWT token handling and auth payload types

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, LoginRequest, RegisterRequest, TokenResponse, UserInfo};
pub use config::{AppConfig, CurrencyConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{CategoryKind, PeriodType};
