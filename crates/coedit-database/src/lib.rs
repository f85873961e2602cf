//! # coedit-database
//!
//! PostgreSQL connection management, migrations, and repositories.

pub mod connection;
pub mod migration;
pub mod repositories;
