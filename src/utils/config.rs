//! Settings record and its on-disk store
//!
//! The record mirrors the option names yt-dlp understands (`outtmpl`, `format`,
//! `postprocessors`) so the file stays readable next to yt-dlp documentation.

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Combined video+audio track requested by default.
pub const DEFAULT_FORMAT: &str = "137+140";

/// Format requested when only the audio track is wanted.
pub const AUDIO_FORMAT: &str = "bestaudio/best";

/// File name pattern appended to the output directory.
pub const FILENAME_PATTERN: &str = "%(title)s.%(ext)s";

/// Postprocessor key for audio extraction + transcode.
pub const FFMPEG_EXTRACT_AUDIO: &str = "FFmpegExtractAudio";

/// The single persisted settings record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsRecord {
    /// Output directory + filename pattern with placeholders
    #[serde(rename = "outtmpl")]
    pub output_template: String,

    /// Stream/quality selection passed to the generic downloader
    #[serde(rename = "format")]
    pub format_selector: String,

    /// Present only while audio-only mode is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postprocessors: Option<Vec<Postprocessor>>,

    /// Keys this program does not act on. Kept so a save does not lose them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One post-download transformation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Postprocessor {
    pub key: String,

    #[serde(rename = "preferredcodec")]
    pub preferred_codec: String,

    #[serde(rename = "preferredquality")]
    pub preferred_quality: String,
}

impl Postprocessor {
    /// Extract audio and transcode to 192 kbps mp3.
    pub fn extract_audio() -> Self {
        Self {
            key: FFMPEG_EXTRACT_AUDIO.to_string(),
            preferred_codec: "mp3".to_string(),
            preferred_quality: "192".to_string(),
        }
    }
}

impl SettingsRecord {
    /// Default record writing into `output_dir`.
    pub fn with_output_dir(output_dir: &Path) -> Self {
        Self {
            output_template: output_dir
                .join(FILENAME_PATTERN)
                .to_string_lossy()
                .into_owned(),
            format_selector: DEFAULT_FORMAT.to_string(),
            postprocessors: None,
            extra: Map::new(),
        }
    }

    pub fn is_audio_only(&self) -> bool {
        self.postprocessors.is_some()
    }

    /// Toggle audio-only mode. Format and postprocessors always change together.
    ///
    /// Disabling a record that is not in audio mode leaves it untouched, so a
    /// hand-picked format survives.
    pub fn set_audio_only(&mut self, enabled: bool) {
        if enabled {
            self.format_selector = AUDIO_FORMAT.to_string();
            self.postprocessors = Some(vec![Postprocessor::extract_audio()]);
        } else if self.postprocessors.take().is_some() {
            self.format_selector = DEFAULT_FORMAT.to_string();
        }
    }
}

/// Free-function form of [`SettingsRecord::set_audio_only`].
pub fn set_audio_only(record: &mut SettingsRecord, enabled: bool) {
    record.set_audio_only(enabled);
}

/// Load the settings file, creating it with defaults on first run.
///
/// `default_output_dir` is only used when the file does not exist yet. The
/// configuration directory itself is never created here: a missing directory
/// is reported as [`ConfigError::MissingDirectory`].
pub fn load(location: &Path, default_output_dir: &Path) -> Result<SettingsRecord, ConfigError> {
    match fs::read_to_string(location) {
        Ok(contents) => {
            let record: SettingsRecord =
                serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: location.to_path_buf(),
                    source,
                })?;
            debug!("Loaded settings from {}: {:?}", location.display(), record);
            if !record.extra.is_empty() {
                let keys: Vec<&str> = record.extra.keys().map(String::as_str).collect();
                warn!(
                    "Ignoring unsupported settings in {}: {}",
                    location.display(),
                    keys.join(", ")
                );
            }
            Ok(record)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Writing default settings to {}", location.display());
            let record = SettingsRecord::with_output_dir(default_output_dir);
            save(location, &record)?;
            Ok(record)
        }
        Err(source) => Err(ConfigError::Read {
            path: location.to_path_buf(),
            source,
        }),
    }
}

/// Persist the full record, replacing whatever was there.
pub fn save(location: &Path, record: &SettingsRecord) -> Result<(), ConfigError> {
    let dir = location
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    if !dir.is_dir() {
        return Err(ConfigError::MissingDirectory { dir });
    }

    let json = serde_json::to_string_pretty(record).map_err(|e| ConfigError::Write {
        path: location.to_path_buf(),
        source: e.into(),
    })?;

    fs::write(location, json).map_err(|source| ConfigError::Write {
        path: location.to_path_buf(),
        source,
    })
}
