//! Helpers shared by the wiremock-backed tests

use ghdl_core::{Credential, GitHubConfig};
use wiremock::MockServer;

use crate::{EntryType, GitHubClient, TreeEntry};

/// Client whose API, raw and web bases all point at `server`
pub fn client_for(server: &MockServer) -> GitHubClient {
    let config = GitHubConfig {
        api_url: server.uri(),
        raw_url: server.uri(),
        web_url: server.uri(),
        ..GitHubConfig::default()
    };
    GitHubClient::new(&config).unwrap()
}

pub fn token() -> Credential {
    Credential::new("ghp_test").unwrap()
}

pub fn blob_entry(path: &str, api_url: &str) -> TreeEntry {
    TreeEntry {
        path: path.to_string(),
        entry_type: EntryType::Blob,
        api_url: api_url.to_string(),
    }
}
