//! Per-file content strategies for directory downloads
//!
//! Public repositories are read from the raw content host with no
//! credential. Private repositories are read through the blob API with the
//! credential attached, which answers with base64 content. The repository's
//! visibility picks the strategy; the two are not interchangeable.

use async_trait::async_trait;
use base64::Engine;
use ghdl_core::{Credential, RepoCoordinates};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result, TreeEntry, Visibility};

/// Fetches the bytes of one tree entry
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the full content of `entry`
    async fn fetch(&self, entry: &TreeEntry) -> Result<Vec<u8>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Unauthenticated fetch from `<raw_url>/<owner>/<repo>/<branch>/<path>`
#[derive(Debug, Clone)]
pub struct RawContentFetcher {
    client: GitHubClient,
    owner: String,
    repo: String,
    branch: String,
}

impl RawContentFetcher {
    pub fn new(client: GitHubClient, coords: &RepoCoordinates) -> Self {
        Self {
            client,
            owner: coords.owner.clone(),
            repo: coords.repo.clone(),
            branch: coords.branch.clone(),
        }
    }
}

#[async_trait]
impl ContentFetcher for RawContentFetcher {
    async fn fetch(&self, entry: &TreeEntry) -> Result<Vec<u8>> {
        let url = self.client.raw_endpoint([
            self.owner.as_str(),
            self.repo.as_str(),
            self.branch.as_str(),
            entry.path.as_str(),
        ])?;
        debug!(path = %entry.path, %url, "Fetching raw file");

        let response = self.client.get(url, None).send().await?;
        if !response.status().is_success() {
            return Err(Error::FetchFailed {
                path: entry.path.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn name(&self) -> &'static str {
        "raw"
    }
}

/// Authenticated fetch of the entry's blob API URL
#[derive(Debug, Clone)]
pub struct AuthenticatedContentFetcher {
    client: GitHubClient,
    credential: Credential,
}

impl AuthenticatedContentFetcher {
    pub fn new(client: GitHubClient, credential: Credential) -> Self {
        Self { client, credential }
    }
}

#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
    encoding: String,
}

#[async_trait]
impl ContentFetcher for AuthenticatedContentFetcher {
    async fn fetch(&self, entry: &TreeEntry) -> Result<Vec<u8>> {
        let url = url::Url::parse(&entry.api_url)
            .map_err(|e| Error::Parse(format!("Bad blob URL for {}: {}", entry.path, e)))?;
        debug!(path = %entry.path, "Fetching blob via API");

        let response = self.client.get(url, Some(&self.credential)).send().await?;
        if !response.status().is_success() {
            return Err(Error::FetchFailed {
                path: entry.path.clone(),
                status: response.status().as_u16(),
            });
        }

        let blob: BlobResponse = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse blob for {}: {}", entry.path, e)))?;
        decode_blob(&entry.path, &blob)
    }

    fn name(&self) -> &'static str {
        "authenticated"
    }
}

fn decode_blob(path: &str, blob: &BlobResponse) -> Result<Vec<u8>> {
    if blob.encoding != "base64" {
        return Err(Error::Decode(format!(
            "Unexpected encoding {} for {}",
            blob.encoding, path
        )));
    }

    // GitHub wraps the payload at 60 columns
    let compact: String = blob
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| Error::Decode(format!("Invalid base64 content for {}: {}", path, e)))
}

/// Pick the content strategy for a repository of the given visibility
pub fn select_fetcher(
    client: &GitHubClient,
    coords: &RepoCoordinates,
    visibility: Visibility,
    credential: Option<&Credential>,
) -> Result<Box<dyn ContentFetcher>> {
    let fetcher: Box<dyn ContentFetcher> = match (visibility, credential) {
        (Visibility::Public, _) => Box::new(RawContentFetcher::new(client.clone(), coords)),
        (Visibility::Private, Some(credential)) => Box::new(AuthenticatedContentFetcher::new(
            client.clone(),
            credential.clone(),
        )),
        (Visibility::Private, None) => {
            return Err(Error::NotFoundOrPrivate {
                context: format!("{}/{}", coords.owner, coords.repo),
            })
        }
    };

    info!(strategy = fetcher.name(), ?visibility, "Selected content strategy");
    Ok(fetcher)
}
