//! Inkpost - a blog backend with posts, tags, comments, and a contact form
//!
//! The crate is layered bottom-up:
//! - `models` - entities and input types
//! - `db` - connection pool, migrations, repositories
//! - `services` - business logic (validation, authorization, email)
//! - `api` - axum handlers and routing
//! - `config` - YAML + environment configuration

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
