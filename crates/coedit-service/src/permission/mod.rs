//! Editor capability resolution.

pub mod resolver;

pub use resolver::{ResolvedPermissions, resolve_permissions};
