//! CLI command implementations

pub mod download;
pub mod inspect;

pub use download::DownloadArgs;
pub use inspect::InspectArgs;
