//! # coedit-core
//!
//! Core crate for the CollaboraNexio co-editing session coordinator.
//! Contains configuration schemas and the unified error system.
//!
//! This crate has **no** internal dependencies on other coedit crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
