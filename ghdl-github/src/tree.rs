//! Recursive tree listing

use ghdl_core::{is_under_root, Credential, RepoCoordinates};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{Error, GitHubClient, Result};

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A file
    Blob,
    /// A subdirectory
    Tree,
    /// Submodules and anything else GitHub may add
    #[serde(other)]
    Other,
}

/// One entry of `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Blob API URL, used by the authenticated content strategy
    #[serde(rename = "url", default)]
    pub api_url: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

impl GitHubClient {
    /// List every file under `coords.root_path` on `coords.branch`.
    ///
    /// Fails with [`Error::IncompleteListing`] when GitHub truncates the tree
    /// rather than returning a partial set.
    pub async fn list_files(
        &self,
        coords: &RepoCoordinates,
        credential: Option<&Credential>,
    ) -> Result<Vec<TreeEntry>> {
        let mut url = self.api_endpoint([
            "repos",
            coords.owner.as_str(),
            coords.repo.as_str(),
            "git",
            "trees",
            coords.branch.as_str(),
        ])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        debug!(%url, "Listing repository tree");

        let context = format!("{}/{}@{}", coords.owner, coords.repo, coords.branch);
        let response = self
            .api_get(self.get(url, credential), credential.is_some(), &context)
            .await?;
        let listing: TreeResponse = response.json().await?;

        if listing.truncated {
            return Err(Error::IncompleteListing {
                owner: coords.owner.clone(),
                repo: coords.repo.clone(),
                branch: coords.branch.clone(),
            });
        }

        let total = listing.tree.len();
        let files = files_under(listing.tree, &coords.root_path);
        info!(total, matched = files.len(), root = %coords.root_path, "Enumerated tree");
        Ok(files)
    }
}

/// Keep blob entries inside `root`, in listing order
pub fn files_under(entries: Vec<TreeEntry>, root: &str) -> Vec<TreeEntry> {
    entries
        .into_iter()
        .filter(|e| e.entry_type == EntryType::Blob && is_under_root(&e.path, root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, token};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(path: &str, entry_type: EntryType) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            entry_type,
            api_url: String::new(),
        }
    }

    fn coords(root_path: &str) -> RepoCoordinates {
        RepoCoordinates {
            owner: "facebook".to_string(),
            repo: "react".to_string(),
            branch: "main".to_string(),
            root_path: root_path.to_string(),
        }
    }

    fn react_tree() -> serde_json::Value {
        serde_json::json!({
            "sha": "abc",
            "truncated": false,
            "tree": [
                {"path": "package.json", "type": "blob", "url": "u0"},
                {"path": "packages", "type": "tree", "url": "u1"},
                {"path": "packages/react-client", "type": "tree", "url": "u2"},
                {"path": "packages/react-client/index.js", "type": "blob", "url": "u3"},
                {"path": "packages/react-client/src", "type": "tree", "url": "u4"},
                {"path": "packages/react-client/src/ReactFlight.js", "type": "blob", "url": "u5"},
                {"path": "packages/react-client-extra/index.js", "type": "blob", "url": "u6"},
                {"path": "packages/vendored", "type": "commit"}
            ]
        })
    }

    #[test]
    fn test_files_under_drops_trees_and_siblings() {
        let entries = vec![
            entry("src", EntryType::Tree),
            entry("src/lib.rs", EntryType::Blob),
            entry("src-new/lib.rs", EntryType::Blob),
            entry("src/nested", EntryType::Tree),
            entry("src/nested/mod.rs", EntryType::Blob),
            entry("src/sub", EntryType::Other),
        ];

        let files = files_under(entries, "src");
        let paths: Vec<&str> = files.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src/lib.rs", "src/nested/mod.rs"]);
    }

    #[tokio::test]
    async fn test_list_files_scopes_to_root() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/git/trees/main"))
            .and(query_param("recursive", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(react_tree()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let files = client
            .list_files(&coords("packages/react-client"), None)
            .await
            .unwrap();

        let paths: Vec<&str> = files.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "packages/react-client/index.js",
                "packages/react-client/src/ReactFlight.js"
            ]
        );
        assert_eq!(files[0].api_url, "u3");
        assert!(files.iter().all(|e| e.entry_type == EntryType::Blob));
    }

    #[tokio::test]
    async fn test_list_files_empty_root_takes_all_blobs() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/git/trees/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(react_tree()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let files = client.list_files(&coords(""), None).await.unwrap();
        assert_eq!(files.len(), 4);
    }

    #[tokio::test]
    async fn test_truncated_listing_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/git/trees/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": "abc",
                "truncated": true,
                "tree": [{"path": "packages/react-client/index.js", "type": "blob", "url": "u"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .list_files(&coords("packages/react-client"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteListing { ref branch, .. } if branch == "main"));
    }

    #[tokio::test]
    async fn test_listing_uses_shared_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/facebook/react/git/trees/main"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let credential = token();
        let err = client
            .list_files(&coords("packages"), Some(&credential))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { ref context } if context == "facebook/react@main"));
    }
}
