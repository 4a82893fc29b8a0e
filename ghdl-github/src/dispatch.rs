//! Route a GitHub web URL to the right download path

use ghdl_core::{
    archive_file_name, Credential, Deliverable, DownloadConfig, RepoCoordinates, TargetKind,
};
use tracing::info;

use crate::{select_fetcher, ArchiveAssembler, GitHubClient, Result};

/// Turns a GitHub web URL into a [`Deliverable`]
#[derive(Debug, Clone)]
pub struct Downloader {
    client: GitHubClient,
    assembler: ArchiveAssembler,
    default_branch: String,
}

impl Downloader {
    pub fn new(client: GitHubClient, config: &DownloadConfig) -> Self {
        Self {
            client,
            assembler: ArchiveAssembler::new(config.max_concurrency),
            default_branch: config.default_branch.clone(),
        }
    }

    /// The underlying client
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Classify `url` and run the matching download.
    ///
    /// The first error aborts the whole download.
    pub async fn download(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<Deliverable> {
        let kind = TargetKind::classify(url)?;
        info!(url, %kind, "Classified URL");

        match kind {
            TargetKind::Directory => self.download_directory(url, credential).await,
            TargetKind::File => self.download_file(url, credential).await,
            TargetKind::Repository => self.download_repository(url),
        }
    }

    /// Probe, list, fetch every file and zip them
    pub async fn download_directory(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<Deliverable> {
        let coords = RepoCoordinates::resolve(url)?;
        let visibility = self
            .client
            .probe_visibility(&coords.owner, &coords.repo, credential)
            .await?;
        let entries = self.client.list_files(&coords, credential).await?;

        let fetcher = select_fetcher(&self.client, &coords, visibility, credential)?;
        let data = self.assembler.assemble(&entries, fetcher.as_ref()).await?;

        Ok(Deliverable::Blob {
            file_name: archive_file_name(&coords.repo, &coords.root_path),
            data,
        })
    }

    /// Fetch a single file without probing visibility
    pub async fn download_file(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<Deliverable> {
        let coords = RepoCoordinates::resolve(url)?;
        let data = self.client.fetch_file(&coords, credential).await?;
        let file_name = coords.file_name().unwrap_or(&coords.repo).to_string();

        info!(file = %file_name, bytes = data.len(), "Fetched file");
        Ok(Deliverable::Blob { file_name, data })
    }

    /// Point at GitHub's branch archive; no API calls
    pub fn download_repository(&self, url: &str) -> Result<Deliverable> {
        let coords = RepoCoordinates::resolve_or_default(url, &self.default_branch)?;
        let url = self.client.archive_url(&coords)?;
        Ok(Deliverable::Redirect { url: url.to_string() })
    }
}
