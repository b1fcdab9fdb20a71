use crate::utils::config::SettingsRecord;
use crate::utils::error::ToolError;
use async_trait::async_trait;

/// A downloader that resolves arbitrary hosting URLs and `ytsearch1:` queries.
///
/// Options come from the settings record; `target` is the single URL or
/// search term to fetch.
#[async_trait]
pub trait GenericDownloader: Send + Sync {
    /// Short identifier used in logs (e.g. "yt-dlp")
    fn id(&self) -> &'static str;

    async fn download(&self, record: &SettingsRecord, target: &str) -> Result<(), ToolError>;
}

/// A downloader dedicated to music-streaming links. It picks its own format.
#[async_trait]
pub trait MusicServiceDownloader: Send + Sync {
    fn id(&self) -> &'static str;

    async fn download(&self, url: &str) -> Result<(), ToolError>;
}
