//! # coedit-entity
//!
//! Typed records for every table the coordinator touches, plus the wire
//! payload types of the external editor's callback protocol.

pub mod audit;
pub mod callback;
pub mod file;
pub mod permission;
pub mod session;
pub mod user;
