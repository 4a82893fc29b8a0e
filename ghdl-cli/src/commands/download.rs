//! Download command - fetch a file, directory or repository

use std::path::{Component, Path, PathBuf};

use clap::Args;
use ghdl_core::{Config, Deliverable, Secrets};
use ghdl_github::{Downloader, GitHubClient};
use url::Url;

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// GitHub URL of a file, directory or repository
    #[arg(required = true)]
    pub url: String,

    /// Directory to save into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// For repositories, download GitHub's archive instead of printing its URL
    #[arg(long)]
    pub follow: bool,

    /// Do not send the configured token
    #[arg(long)]
    pub anonymous: bool,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        let credential = if self.anonymous {
            None
        } else {
            Secrets::load()?.credential()
        };

        if verbose {
            tracing::info!(
                url = %self.url,
                output = %self.output.display(),
                authenticated = credential.is_some(),
                "Starting download"
            );
        }

        let client = GitHubClient::new(&config.github)?;
        let downloader = Downloader::new(client, &config.download);

        match downloader.download(&self.url, credential.as_ref()).await? {
            Deliverable::Blob { file_name, data } => {
                let path = save(&self.output, &file_name, &data)?;
                println!("Saved {} ({} bytes)", path.display(), data.len());
            }
            Deliverable::Redirect { url } if self.follow => {
                let data = downloader.client().fetch_url(&url).await?;
                let path = save(&self.output, &archive_save_name(&url), &data)?;
                println!("Saved {} ({} bytes)", path.display(), data.len());
            }
            Deliverable::Redirect { url } => {
                println!("{}", url);
            }
        }

        Ok(())
    }
}

/// Write `data` to `dir/file_name`, creating `dir` if needed.
///
/// `file_name` must be a single plain path component.
fn save(dir: &Path, file_name: &str, data: &[u8]) -> anyhow::Result<PathBuf> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => anyhow::bail!("Refusing to save outside {}: {}", dir.display(), file_name),
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, data)?;
    Ok(path)
}

/// `<repo>-<branch>.zip` for `.../<owner>/<repo>/archive/<branch>.zip`
fn archive_save_name(url: &str) -> String {
    let segments: Vec<String> = Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments().map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
        })
        .unwrap_or_default();

    match segments.as_slice() {
        [.., repo, archive, file] if archive == "archive" => format!("{}-{}", repo, file),
        [.., file] if file.ends_with(".zip") => file.clone(),
        _ => "archive.zip".to_string(),
    }
}
