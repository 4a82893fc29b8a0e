//! Inspect command - show how a URL would be downloaded, without network access

use clap::Args;
use ghdl_core::{archive_file_name, Config, RepoCoordinates, TargetKind};

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// GitHub URL to inspect
    #[arg(required = true)]
    pub url: String,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        for line in describe(&self.url, config)? {
            println!("{}", line);
        }
        Ok(())
    }
}

fn describe(url: &str, config: &Config) -> anyhow::Result<Vec<String>> {
    let kind = TargetKind::classify(url)?;
    let coords = match kind {
        TargetKind::Repository => {
            RepoCoordinates::resolve_or_default(url, &config.download.default_branch)?
        }
        TargetKind::File | TargetKind::Directory => RepoCoordinates::resolve(url)?,
    };

    let mut lines = vec![
        format!("kind:   {}", kind),
        format!("owner:  {}", coords.owner),
        format!("repo:   {}", coords.repo),
        format!("branch: {}", coords.branch),
    ];

    match kind {
        TargetKind::Directory => {
            lines.push(format!("path:   {}", coords.root_path));
            lines.push(format!(
                "saves:  {}",
                archive_file_name(&coords.repo, &coords.root_path)
            ));
        }
        TargetKind::File => {
            lines.push(format!("path:   {}", coords.root_path));
            lines.push(format!("saves:  {}", coords.file_name().unwrap_or(&coords.repo)));
        }
        TargetKind::Repository => {
            lines.push("saves:  GitHub branch archive (redirect)".to_string());
        }
    }

    Ok(lines)
}
