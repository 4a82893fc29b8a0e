//! Shortcuts for single files and whole repositories
//!
//! Neither probes visibility or lists the tree. A file goes straight to the
//! contents endpoint (with the credential when there is one), and a
//! repository is handed back as GitHub's own archive URL.

use ghdl_core::{Credential, RepoCoordinates};
use reqwest::header;
use tracing::debug;
use url::Url;

use crate::client::RAW_MEDIA_TYPE;
use crate::{Error, GitHubClient, Result};

impl GitHubClient {
    /// Fetch one file's raw bytes through the contents API
    pub async fn fetch_file(
        &self,
        coords: &RepoCoordinates,
        credential: Option<&Credential>,
    ) -> Result<Vec<u8>> {
        if coords.root_path.is_empty() {
            return Err(Error::InvalidUrl(format!(
                "{} names no file",
                coords.web_path(ghdl_core::target::BLOB_MARKER)
            )));
        }

        let mut url = self.api_endpoint([
            "repos",
            coords.owner.as_str(),
            coords.repo.as_str(),
            "contents",
            coords.root_path.as_str(),
        ])?;
        url.query_pairs_mut().append_pair("ref", &coords.branch);
        debug!(%url, "Fetching single file");

        let request = self
            .get(url, credential)
            .header(header::ACCEPT, RAW_MEDIA_TYPE);
        let response = self
            .api_get(request, credential.is_some(), &coords.root_path)
            .await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// `<web_url>/<owner>/<repo>/archive/<branch>.zip`
    pub fn archive_url(&self, coords: &RepoCoordinates) -> Result<Url> {
        let file = format!("{}.zip", coords.branch);
        self.web_endpoint([
            coords.owner.as_str(),
            coords.repo.as_str(),
            "archive",
            file.as_str(),
        ])
    }
}
