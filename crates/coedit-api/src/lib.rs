//! # coedit-api
//!
//! HTTP surface of the co-editing coordinator: the document endpoints
//! consumed by the parent platform and the external editor, plus health
//! checks.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
