//! Error handling for Unidown

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the settings store. All of them abort startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "configuration directory {} does not exist. Please create the configuration directory first",
        .dir.display()
    )]
    MissingDirectory { dir: PathBuf },

    #[error("Failed to write settings to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read settings from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file {} is not valid: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of one external tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} not found. Please install {0}")]
    NotFound(&'static str),

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    Exited {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Closed set of download failure kinds reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    MusicServiceFailed,
    GenericDownloadFailed,
    Busy,
    EmptyInput,
}

/// Errors on the download path. They never escape the dispatch boundary as
/// panics; the shell renders them and returns to ready.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Music-service download failed: {0}")]
    MusicServiceFailed(#[source] ToolError),

    /// `direct` is the first attempt, `cause` is the search fallback failure.
    #[error("Download failed ({direct}); search fallback failed too: {cause}")]
    GenericDownloadFailed {
        direct: ToolError,
        #[source]
        cause: ToolError,
    },

    #[error("A download is already in progress")]
    Busy,

    #[error("Nothing to download: the link is empty")]
    EmptyInput,
}

impl DownloadError {
    pub fn kind(&self) -> DownloadErrorKind {
        match self {
            Self::MusicServiceFailed(_) => DownloadErrorKind::MusicServiceFailed,
            Self::GenericDownloadFailed { .. } => DownloadErrorKind::GenericDownloadFailed,
            Self::Busy => DownloadErrorKind::Busy,
            Self::EmptyInput => DownloadErrorKind::EmptyInput,
        }
    }
}

/// Opening a directory in a file manager failed. Never fatal.
#[derive(Debug, Error)]
pub enum RevealError {
    #[error("Failed to launch file manager {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No file manager could open {}: {source}", .dir.display())]
    Open {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_message_is_actionable() {
        let err = ConfigError::MissingDirectory {
            dir: PathBuf::from("/opt/unidown/config"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/opt/unidown/config"));
        assert!(msg.contains("create the configuration directory first"));
    }

    #[test]
    fn exited_reports_status_or_signal() {
        let with_code = ToolError::Exited {
            program: "yt-dlp".to_string(),
            code: Some(1),
            stderr: "ERROR: Unsupported URL".to_string(),
        };
        assert!(with_code.to_string().contains("status 1"));

        let killed = ToolError::Exited {
            program: "spotdl".to_string(),
            code: None,
            stderr: String::new(),
        };
        assert!(killed.to_string().contains("a signal"));
    }

    #[test]
    fn generic_failure_keeps_both_attempts() {
        let err = DownloadError::GenericDownloadFailed {
            direct: ToolError::NotFound("yt-dlp"),
            cause: ToolError::Exited {
                program: "yt-dlp".to_string(),
                code: Some(2),
                stderr: "no results".to_string(),
            },
        };
        assert_eq!(err.kind(), DownloadErrorKind::GenericDownloadFailed);
        let msg = err.to_string();
        assert!(msg.contains("yt-dlp not found"));
        assert!(msg.contains("no results"));
    }
}
