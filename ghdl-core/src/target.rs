//! GitHub web URL classification and coordinate resolution
//!
//! Both operations are purely structural: they look at the path segments of
//! a URL and never ask GitHub whether the target exists.
//!
//! Branch names containing `/` are not supported. The branch is always the
//! single segment after the `tree`/`blob` marker, and anything after it is
//! treated as the path inside the repository. Owner, repository and branch
//! that decode to more than one segment (`feature%2Fx`, `..%2Fx`) are
//! rejected, as are `.` and `..` anywhere in the path.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::{Error, Result};

/// Marker segment for directory and branch-root URLs
pub const TREE_MARKER: &str = "tree";

/// Marker segment for single-file URLs
pub const BLOB_MARKER: &str = "blob";

/// What a GitHub web URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// `owner/repo/blob/<branch>/<path>`
    File,
    /// `owner/repo/tree/<branch>/<path>`
    Directory,
    /// `owner/repo` or `owner/repo/tree/<branch>`
    Repository,
}

impl TargetKind {
    /// Classify a GitHub web URL.
    ///
    /// Checks run in a fixed order (directory, file, repository) and the
    /// first match wins.
    pub fn classify(url: &str) -> Result<Self> {
        let segments = path_segments(url)?;

        if is_directory(&segments) {
            Ok(TargetKind::Directory)
        } else if is_file(&segments) {
            Ok(TargetKind::File)
        } else if is_repository(&segments) {
            Ok(TargetKind::Repository)
        } else {
            Err(Error::InvalidUrl(format!(
                "{} is not a GitHub repository, directory or file URL",
                url
            )))
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TargetKind::File => "file",
            TargetKind::Directory => "directory",
            TargetKind::Repository => "repository",
        };
        f.write_str(name)
    }
}

fn is_directory(segments: &[String]) -> bool {
    segments.len() >= 5 && segments[2] == TREE_MARKER
}

fn is_file(segments: &[String]) -> bool {
    segments.get(2).is_some_and(|s| s == BLOB_MARKER)
}

fn is_repository(segments: &[String]) -> bool {
    segments.len() == 2 || (segments.len() == 4 && segments[2] == TREE_MARKER)
}

/// Everything needed to address a target through the GitHub APIs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    /// Repository owner/organization
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch (or tag/sha) the URL is pinned to
    pub branch: String,
    /// Path inside the repository, empty for a branch root
    pub root_path: String,
}

impl RepoCoordinates {
    /// Decompose `owner/repo/{tree|blob}/branch[/path...]`
    pub fn resolve(url: &str) -> Result<Self> {
        let segments = path_segments(url)?;
        if segments.len() < 4 {
            return Err(Error::InvalidUrl(format!(
                "{} does not name a branch. Expected owner/repo/tree/<branch>/...",
                url
            )));
        }
        Self::from_segments(url, &segments, segments[3].clone())
    }

    /// Like [`resolve`](Self::resolve), but accepts a bare `owner/repo` URL
    /// and falls back to `default_branch`
    pub fn resolve_or_default(url: &str, default_branch: &str) -> Result<Self> {
        let segments = path_segments(url)?;
        if segments.len() < 2 {
            return Err(Error::InvalidUrl(format!(
                "{} does not name a repository. Expected owner/repo",
                url
            )));
        }
        let branch = segments
            .get(3)
            .cloned()
            .unwrap_or_else(|| default_branch.to_string());
        Self::from_segments(url, &segments, branch)
    }

    fn from_segments(url: &str, segments: &[String], branch: String) -> Result<Self> {
        check_name(url, "owner", &segments[0])?;
        check_name(url, "repository", &segments[1])?;
        check_name(url, "branch", &branch)?;

        let rest = segments.get(4..).unwrap_or_default();
        if let Some(bad) = rest
            .iter()
            .flat_map(|s| s.split('/'))
            .find(|s| is_dot_segment(s))
        {
            return Err(Error::InvalidUrl(format!(
                "{}: path segment '{}' is not allowed",
                url, bad
            )));
        }

        Ok(Self {
            owner: segments[0].clone(),
            repo: segments[1].clone(),
            branch,
            root_path: rest.join("/"),
        })
    }

    /// Rebuild the web pathname, e.g. `/owner/repo/tree/main/src`
    pub fn web_path(&self, marker: &str) -> String {
        let mut path = format!("/{}/{}/{}/{}", self.owner, self.repo, marker, self.branch);
        if !self.root_path.is_empty() {
            path.push('/');
            path.push_str(&self.root_path);
        }
        path
    }

    /// Final segment of the root path, if any
    pub fn file_name(&self) -> Option<&str> {
        self.root_path.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// Whether `path` lies inside the directory `root`.
///
/// Compares whole path segments, so `src-new/lib.rs` is not under `src`.
/// An empty root contains everything.
pub fn is_under_root(path: &str, root: &str) -> bool {
    let root = root.trim_matches('/');
    if root.is_empty() {
        return true;
    }
    match path.strip_prefix(root) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Non-empty, percent-decoded path segments of a URL
/// Owner, repository and branch must each decode to exactly one path segment
fn check_name(url: &str, what: &str, value: &str) -> Result<()> {
    if value.is_empty() || value.contains(['/', '\\']) || is_dot_segment(value) {
        return Err(Error::InvalidUrl(format!(
            "{}: invalid {} name '{}'",
            url, what, value
        )));
    }
    Ok(())
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

fn path_segments(input: &str) -> Result<Vec<String>> {
    let url = Url::parse(input.trim())
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", input, e)))?;

    Ok(url
        .path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_directory() {
        for url in [
            "https://github.com/facebook/react/tree/main/packages/react-client",
            "https://github.com/facebook/react/tree/main/.circleci",
            "https://github.com/facebook/react/tree/main/packages/react-client/src/",
        ] {
            assert_eq!(TargetKind::classify(url).unwrap(), TargetKind::Directory, "{}", url);
        }
    }

    #[test]
    fn test_classify_file() {
        for url in [
            "https://github.com/facebook/react/blob/main/package.json",
            "https://github.com/facebook/react/blob/main/packages/react-pg/index.js",
        ] {
            assert_eq!(TargetKind::classify(url).unwrap(), TargetKind::File, "{}", url);
        }
    }

    #[test]
    fn test_classify_repository() {
        for url in [
            "https://github.com/facebook/react",
            "https://github.com/facebook/react/",
            "https://github.com/facebook/react/tree/17.0.2",
            "https://github.com/facebook/react?tab=readme",
        ] {
            assert_eq!(TargetKind::classify(url).unwrap(), TargetKind::Repository, "{}", url);
        }
    }

    #[test]
    fn test_branch_root_is_repository_not_directory() {
        // satisfies the loose "contains tree" pattern but is not a subdirectory
        let kind = TargetKind::classify("https://github.com/facebook/react/tree/main").unwrap();
        assert_eq!(kind, TargetKind::Repository);
    }

    #[test]
    fn test_classify_invalid() {
        for url in [
            "https://github.com/facebook",
            "https://github.com/facebook/react/issues",
            "https://github.com/facebook/react/pull/1",
            "https://github.com/",
            "not a url",
        ] {
            let err = TargetKind::classify(url).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{}", url);
        }
    }

    #[test]
    fn test_resolve_directory() {
        let url = "https://github.com/facebook/react/tree/main/packages/react-client";
        let coords = RepoCoordinates::resolve(url).unwrap();
        assert_eq!(coords.owner, "facebook");
        assert_eq!(coords.repo, "react");
        assert_eq!(coords.branch, "main");
        assert_eq!(coords.root_path, "packages/react-client");
    }

    #[test]
    fn test_resolve_branch_root_has_empty_root_path() {
        let coords =
            RepoCoordinates::resolve("https://github.com/facebook/react/tree/17.0.2/").unwrap();
        assert_eq!(coords.branch, "17.0.2");
        assert_eq!(coords.root_path, "");
        assert_eq!(coords.file_name(), None);
    }

    #[test]
    fn test_resolve_decodes_segments() {
        let coords =
            RepoCoordinates::resolve("https://github.com/o/r/blob/dev/docs/my%20notes.md").unwrap();
        assert_eq!(coords.root_path, "docs/my notes.md");
        assert_eq!(coords.file_name(), Some("my notes.md"));
    }

    #[test]
    fn test_resolve_requires_branch() {
        assert!(RepoCoordinates::resolve("https://github.com/facebook/react").is_err());
    }

    #[test]
    fn test_resolve_or_default() {
        let coords =
            RepoCoordinates::resolve_or_default("https://github.com/facebook/react", "master")
                .unwrap();
        assert_eq!(coords.branch, "master");

        let coords = RepoCoordinates::resolve_or_default(
            "https://github.com/facebook/react/tree/17.0.2",
            "master",
        )
        .unwrap();
        assert_eq!(coords.branch, "17.0.2");

        assert!(
            RepoCoordinates::resolve_or_default("https://github.com/facebook", "master").is_err()
        );
    }

    #[test]
    fn test_resolve_rejects_encoded_slash_in_names() {
        for url in [
            "https://github.com/o/r/tree/feature%2Fx/src",
            "https://github.com/o/..%2Fx/tree/main/src",
            "https://github.com/o%2F..%2F..%2Frepos/r/blob/main/a.txt",
        ] {
            let err = RepoCoordinates::resolve(url).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{}", url);
        }

        let err = RepoCoordinates::resolve_or_default("https://github.com/o/..%2Fx", "main")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_resolve_rejects_dot_segments_in_path() {
        for url in [
            "https://github.com/o/r/tree/main/a%2F..%2F..%2Fb",
            "https://github.com/o/r/blob/main/docs%2F..",
        ] {
            let err = RepoCoordinates::resolve(url).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{}", url);
        }
    }

    #[test]
    fn test_resolve_rejects_bad_default_branch() {
        for branch in ["", "..", "release/1.x"] {
            let result = RepoCoordinates::resolve_or_default("https://github.com/o/r", branch);
            assert!(matches!(result, Err(Error::InvalidUrl(_))), "{:?}", branch);
        }
    }

    #[test]
    fn test_web_path_round_trip() {
        for (path, marker) in [
            ("/facebook/react/tree/main/packages/react-client", TREE_MARKER),
            ("/facebook/react/blob/main/package.json", BLOB_MARKER),
            ("/facebook/react/tree/17.0.2", TREE_MARKER),
            ("/o/r/tree/dev/a/b/c/d", TREE_MARKER),
        ] {
            let url = format!("https://github.com{}", path);
            let coords = RepoCoordinates::resolve(&url).unwrap();
            assert_eq!(coords.web_path(marker), path);
        }
    }

    #[test]
    fn test_is_under_root_respects_segments() {
        assert!(is_under_root("src/lib.rs", "src"));
        assert!(is_under_root("src/a/b.rs", "src/"));
        assert!(is_under_root("src", "src"));
        assert!(!is_under_root("src-new/lib.rs", "src"));
        assert!(!is_under_root("packages/react-client-extra/index.js", "packages/react-client"));
        assert!(!is_under_root("lib/src/x.rs", "src"));
    }

    #[test]
    fn test_is_under_empty_root() {
        assert!(is_under_root("anything/at/all", ""));
        assert!(is_under_root("README.md", "/"));
    }
}
