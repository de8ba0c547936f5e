pub mod artifacts;
pub mod codec;
pub mod coordinator;
pub mod error;
pub mod sanitizer;
pub mod submitter;

pub mod test_support;

pub use artifacts::ArtifactPaths;
pub use coordinator::{Coordinator, HistorySource};
pub use error::BridgeError;
pub use sanitizer::{sanitize, SanitizeReport};
pub use submitter::Submitter;
