pub mod session;

pub use session::{DownloadSession, PendingDownload};
