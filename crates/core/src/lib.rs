//! Core business logic for Moneta.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing
//! - `validation` - Cross-entity consistency checks
//! - `reports` - Aggregation engine for budget and transaction reports

pub mod auth;
pub mod reports;
pub mod validation;
