//! yt-dlp as the generic downloader
//!
//! The settings record is translated into yt-dlp command-line options and the
//! binary is run once per target. Both bundled yt-dlp (next to the executable)
//! and system-installed yt-dlp are supported.

use crate::downloader::process::run_tool;
use crate::downloader::traits::GenericDownloader;
use crate::utils::config::{SettingsRecord, FFMPEG_EXTRACT_AUDIO};
use crate::utils::error::ToolError;
use crate::utils::platform::exe_extension;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Generic downloader backed by the yt-dlp binary
#[derive(Debug, Clone)]
pub struct YtDlpDownloader {
    ytdlp_path: PathBuf,
}

impl YtDlpDownloader {
    /// Locate yt-dlp and fail if it is nowhere to be found.
    ///
    /// Search order:
    /// 1. Bundled yt-dlp next to the executable
    /// 2. System PATH
    /// 3. Common installation paths
    pub fn new() -> Result<Self, ToolError> {
        match find_ytdlp() {
            Some(path) => {
                info!("Found yt-dlp at: {}", path.display());
                Ok(Self::with_binary(path))
            }
            None => Err(ToolError::NotFound("yt-dlp")),
        }
    }

    /// Like [`YtDlpDownloader::new`], but keeps going with a bare `yt-dlp`
    /// so the failure surfaces when a download is attempted.
    pub fn detect() -> Self {
        Self::new().unwrap_or_else(|e| {
            warn!("{}. Downloads of regular links will fail until it is installed", e);
            Self::with_binary("yt-dlp")
        })
    }

    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp_path: path.into(),
        }
    }

    /// Command-line options equivalent to `record`, followed by `target`.
    pub fn build_args(record: &SettingsRecord, target: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--no-warnings".into(),
            "-o".into(),
            record.output_template.clone().into(),
            "-f".into(),
            record.format_selector.clone().into(),
        ];

        for pp in record.postprocessors.iter().flatten() {
            if pp.key == FFMPEG_EXTRACT_AUDIO {
                args.push("-x".into());
                args.push("--audio-format".into());
                args.push(pp.preferred_codec.clone().into());
                args.push("--audio-quality".into());
                args.push(audio_quality_arg(&pp.preferred_quality).into());
            } else {
                warn!("Skipping unsupported postprocessor: {}", pp.key);
            }
        }

        // Targets may start with '-' (search terms); keep them out of option parsing.
        args.push("--".into());
        args.push(target.into());
        args
    }
}

/// yt-dlp reads a bare number as a VBR level (0-9), so bitrates get a `K` suffix.
fn audio_quality_arg(quality: &str) -> String {
    let quality = quality.trim();
    if !quality.is_empty() && quality.chars().all(|c| c.is_ascii_digit()) {
        format!("{}K", quality)
    } else {
        quality.to_string()
    }
}

#[async_trait]
impl GenericDownloader for YtDlpDownloader {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(&self, record: &SettingsRecord, target: &str) -> Result<(), ToolError> {
        debug!("yt-dlp download: {} (format {})", target, record.format_selector);
        run_tool(&self.ytdlp_path, Self::build_args(record, target)).await
    }
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp binary with priority:
/// 1. Bundled (next to the executable)
/// 2. System PATH
/// 3. Common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Some(bundled) = find_bundled_ytdlp() {
        info!("Using bundled yt-dlp: {:?}", bundled);
        return Some(bundled);
    }

    if let Ok(system) = which::which("yt-dlp") {
        info!("Using system yt-dlp: {:?}", system);
        return Some(system);
    }

    if let Some(common) = find_in_common_paths() {
        info!("Using yt-dlp from common path: {:?}", common);
        return Some(common);
    }

    warn!("yt-dlp not found anywhere!");
    None
}

fn find_bundled_ytdlp() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let exe_dir = exe_path.parent()?;

    let bundled = exe_dir.join(format!("yt-dlp{}", exe_extension()));
    debug!("Checking bundled path: {:?}", bundled);
    if bundled.is_file() && is_executable(&bundled) {
        return Some(bundled);
    }

    None
}

fn find_in_common_paths() -> Option<PathBuf> {
    let common_paths = [
        // macOS Homebrew (Apple Silicon)
        "/opt/homebrew/bin/yt-dlp",
        // macOS Homebrew (Intel)
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        // pip user install
        "~/.local/bin/yt-dlp",
    ];

    common_paths
        .iter()
        .map(|p| expand_home(p))
        .find(|p| p.exists() && is_executable(p))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::Postprocessor;

    fn record() -> SettingsRecord {
        SettingsRecord::with_output_dir(Path::new("/media/out"))
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_video_args() {
        let args = strings(YtDlpDownloader::build_args(
            &record(),
            "https://www.youtube.com/watch?v=abc",
        ));
        let template = Path::new("/media/out")
            .join("%(title)s.%(ext)s")
            .to_string_lossy()
            .into_owned();

        assert_eq!(
            args,
            vec![
                "--no-warnings".to_string(),
                "-o".to_string(),
                template,
                "-f".to_string(),
                "137+140".to_string(),
                "--".to_string(),
                "https://www.youtube.com/watch?v=abc".to_string(),
            ]
        );
    }

    #[test]
    fn test_audio_postprocessor_args() {
        let mut rec = record();
        rec.set_audio_only(true);
        let args = strings(YtDlpDownloader::build_args(&rec, "ytsearch1:some song"));

        let f = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[f + 1], "bestaudio/best");
        assert!(args.contains(&"-x".to_string()));
        let fmt = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[fmt + 1], "mp3");
        let q = args.iter().position(|a| a == "--audio-quality").unwrap();
        assert_eq!(args[q + 1], "192K");
        assert_eq!(args.last().unwrap(), "ytsearch1:some song");
    }

    #[test]
    fn test_unknown_postprocessor_skipped() {
        let mut rec = record();
        rec.postprocessors = Some(vec![Postprocessor {
            key: "EmbedThumbnail".to_string(),
            preferred_codec: String::new(),
            preferred_quality: String::new(),
        }]);
        let args = strings(YtDlpDownloader::build_args(&rec, "x"));
        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.iter().any(|a| a == "EmbedThumbnail"));
    }

    #[test]
    fn test_audio_quality_arg() {
        assert_eq!(audio_quality_arg("192"), "192K");
        assert_eq!(audio_quality_arg("320K"), "320K");
        assert_eq!(audio_quality_arg(""), "");
    }

    #[test]
    fn test_find_ytdlp() {
        let result = find_ytdlp();
        println!("yt-dlp found at: {:?}", result);
        // Don't assert - yt-dlp might not be installed in CI
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/usr/bin/yt-dlp"), PathBuf::from("/usr/bin/yt-dlp"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.local/bin/yt-dlp"), home.join(".local/bin/yt-dlp"));
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary_reports_exit() {
        let downloader = YtDlpDownloader::with_binary("false");
        let err = downloader.download(&record(), "badurl").await.unwrap_err();
        assert!(matches!(err, ToolError::Exited { code: Some(1), .. }));
    }
}
