//! Concurrent fetch of a directory's files into one zip archive

use std::io::{Cursor, Write};

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::{ContentFetcher, Error, Result, TreeEntry};

/// Fetches every entry and packs the results into a zip.
///
/// All or nothing: if any fetch fails the whole call fails and no archive is
/// produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveAssembler {
    max_concurrency: Option<usize>,
}

impl ArchiveAssembler {
    /// `None` issues every fetch at once; `Some(n)` keeps at most `n` in flight
    pub fn new(max_concurrency: Option<usize>) -> Self {
        Self {
            max_concurrency: max_concurrency.filter(|n| *n > 0),
        }
    }

    /// Fetch all entries, returning `(path, bytes)` in entry order
    pub async fn fetch_all(
        &self,
        entries: &[TreeEntry],
        fetcher: &dyn ContentFetcher,
    ) -> Result<Vec<(String, Vec<u8>)>> {
        let fetches = entries.iter().map(|entry| async move {
            let data = fetcher.fetch(entry).await?;
            debug!(path = %entry.path, bytes = data.len(), "Fetched file");
            Ok::<_, Error>((entry.path.clone(), data))
        });

        match self.max_concurrency {
            None => futures::future::try_join_all(fetches).await,
            Some(limit) => stream::iter(fetches).buffered(limit).try_collect().await,
        }
    }

    /// Fetch all entries and return the compressed archive bytes
    pub async fn assemble(
        &self,
        entries: &[TreeEntry],
        fetcher: &dyn ContentFetcher,
    ) -> Result<Vec<u8>> {
        info!(
            files = entries.len(),
            strategy = fetcher.name(),
            limit = ?self.max_concurrency,
            "Fetching directory contents"
        );

        let files = self.fetch_all(entries, fetcher).await?;
        let archive = write_zip(&files)?;

        info!(files = files.len(), bytes = archive.len(), "Built archive");
        Ok(archive)
    }
}

/// Write `(path, bytes)` pairs into a deflated zip, one entry per path
pub fn write_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, data) in files {
        zip.start_file(path.as_str(), options)?;
        zip.write_all(data)
            .map_err(|e| Error::Archive(format!("Failed to write {}: {}", path, e)))?;
    }

    Ok(zip.finish()?.into_inner())
}
