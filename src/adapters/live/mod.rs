//! Live adapters for real external interactions.

pub mod filesystem;
pub mod host;
pub mod llm;
pub mod system;

pub use filesystem::LiveFileSystem;
pub use host::GitHubHost;
pub use llm::LiveLlmClient;
pub use system::{LiveClock, LiveIdGenerator};
