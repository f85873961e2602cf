//! Background job implementations.

pub mod sweep;
