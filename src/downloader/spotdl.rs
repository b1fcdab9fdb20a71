//! spotDL as the music-service downloader

use crate::downloader::process::run_tool;
use crate::downloader::traits::MusicServiceDownloader;
use crate::utils::error::ToolError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Runs `spotdl <url>`, or `python -m spotdl <url>` when only the Python
/// module is installed.
#[derive(Debug, Clone)]
pub struct SpotDlDownloader {
    program: PathBuf,
    prefix_args: Vec<OsString>,
}

impl SpotDlDownloader {
    pub fn detect() -> Self {
        if let Ok(path) = which::which("spotdl") {
            info!("Found spotdl at: {}", path.display());
            return Self::with_command(path, Vec::<OsString>::new());
        }

        for python in ["python3", "python"] {
            if let Ok(path) = which::which(python) {
                info!("Using spotdl module through {}", path.display());
                return Self::with_command(path, ["-m", "spotdl"]);
            }
        }

        warn!("spotdl not found. Music-service downloads will fail until it is installed");
        Self::with_command("python", ["-m", "spotdl"])
    }

    /// `program` is called with `prefix_args` followed by the URL.
    pub fn with_command<I, S>(program: impl Into<PathBuf>, prefix_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            prefix_args: prefix_args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn build_args(&self, url: &str) -> Vec<OsString> {
        let mut args = self.prefix_args.clone();
        args.push(url.into());
        args
    }
}

#[async_trait]
impl MusicServiceDownloader for SpotDlDownloader {
    fn id(&self) -> &'static str {
        "spotdl"
    }

    async fn download(&self, url: &str) -> Result<(), ToolError> {
        debug!("spotdl download: {}", url);
        run_tool(&self.program, self.build_args(url)).await
    }
}
