//! ghdl core - network-free building blocks for downloading from GitHub
//!
//! This crate classifies GitHub web URLs, derives the repository coordinates
//! the API calls need, and holds configuration and credentials. Nothing in
//! here touches the network; see `ghdl-github` for that.

pub mod config;
pub mod deliverable;
pub mod error;
pub mod secrets;
pub mod target;

pub use config::{Config, DownloadConfig, GitHubConfig};
pub use deliverable::{archive_file_name, Deliverable};
pub use error::{Error, Result};
pub use secrets::{Credential, Secrets};
pub use target::{is_under_root, RepoCoordinates, TargetKind};
