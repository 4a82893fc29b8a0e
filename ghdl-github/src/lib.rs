//! ghdl GitHub - fetching and packaging for ghdl
//!
//! This crate turns a GitHub web URL into something downloadable: a zip of a
//! directory, the bytes of a single file, or the archive URL of a whole
//! repository. It probes repository visibility, lists trees, fetches file
//! content under the right strategy and assembles the archive.

mod archive;
mod client;
mod content;
mod dispatch;
mod error;
mod resolve;
mod tree;
mod visibility;

#[cfg(test)]
mod test_support;

pub use archive::{write_zip, ArchiveAssembler};
pub use client::GitHubClient;
pub use content::{select_fetcher, AuthenticatedContentFetcher, ContentFetcher, RawContentFetcher};
pub use dispatch::Downloader;
pub use error::{Error, Result};
pub use tree::{files_under, EntryType, TreeEntry};
pub use visibility::Visibility;
