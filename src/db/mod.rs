//! Database layer
//!
//! SQLite persistence for the blog backend:
//! - Connection pool creation (`pool`)
//! - Embedded code migrations (`migrations`)
//! - Repository implementations (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
