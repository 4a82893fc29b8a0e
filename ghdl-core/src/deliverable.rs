//! The uniform result of every download

/// What a download produced.
///
/// Either bytes the host should save under a file name, or a URL the host
/// should navigate to and let GitHub serve directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deliverable {
    /// In-memory bytes to save locally
    Blob { file_name: String, data: Vec<u8> },
    /// A URL to hand to the host for navigation
    Redirect { url: String },
}

impl Deliverable {
    /// File name for blob deliverables
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Deliverable::Blob { file_name, .. } => Some(file_name),
            Deliverable::Redirect { .. } => None,
        }
    }
}

/// Name of the zip produced for a directory download:
/// `<repo>-<root path with slashes as dashes>.zip`
pub fn archive_file_name(repo: &str, root_path: &str) -> String {
    let root = root_path.trim_matches('/');
    if root.is_empty() {
        format!("{}.zip", repo)
    } else {
        format!("{}-{}.zip", repo, root.replace('/', "-"))
    }
}
