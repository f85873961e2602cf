//! Repository implementations.
//!
//! Each repository owns the SQL for one table and returns typed records
//! from `coedit-entity`. All methods take explicit parameters; there is
//! no ambient request state at this layer.

pub mod audit;
pub mod file;
pub mod session;
pub mod user;
pub mod version;

pub use audit::AuditLogRepository;
pub use file::FileRepository;
pub use session::EditorSessionRepository;
pub use user::UserRepository;
pub use version::FileVersionRepository;
