//! Document content operations: streaming, save callbacks, versioning.

pub mod archive;
pub mod callback;
pub mod stream;

pub use archive::VersionArchiver;
pub use callback::CallbackService;
pub use stream::DocumentStreamer;
