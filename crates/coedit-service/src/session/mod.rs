//! Editor session lifecycle management.

pub mod store;

pub use store::SessionStore;
