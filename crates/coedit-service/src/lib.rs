//! # coedit-service
//!
//! Business logic for the co-editing coordinator.
//!
//! ## Modules
//!
//! - `context` — authenticated request context threaded through services
//! - `session` — editor session lifecycle (open, touch, close, sweep)
//! - `document` — content streaming, editor save callbacks, versioning
//! - `permission` — role-based editor capability resolution

pub mod context;
pub mod document;
pub mod permission;
pub mod session;

pub use context::RequestContext;
pub use document::callback::CallbackService;
pub use document::stream::DocumentStreamer;
pub use permission::resolver::{ResolvedPermissions, resolve_permissions};
pub use session::store::SessionStore;
