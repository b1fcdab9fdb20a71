//! External downloader tools

pub mod process;
pub mod spotdl;
pub mod traits;
pub mod ytdlp;

pub use spotdl::SpotDlDownloader;
pub use traits::{GenericDownloader, MusicServiceDownloader};
pub use ytdlp::YtDlpDownloader;
