//! Unidown library

pub mod backend;
pub mod downloader;
pub mod gui;
pub mod policy;
pub mod utils;

// Re-export main types for easier use
pub use backend::{DownloadSession, PendingDownload};
pub use downloader::{GenericDownloader, MusicServiceDownloader, SpotDlDownloader, YtDlpDownloader};
pub use policy::{classify, Dispatcher, DownloadOutcome, DownloadRequest, UrlKind};
pub use utils::{AppPaths, ConfigError, DownloadError, SettingsRecord};
