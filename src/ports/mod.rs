//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the extraction core and an
//! external system (time, filesystem, repository host, LLM, IDs).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod host;
pub mod llm;
pub mod system;

pub use filesystem::FileSystem;
pub use host::{HostFuture, RepoHost, RepoRef};
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use system::{Clock, IdGenerator};

/// Error type returned by every port method.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
