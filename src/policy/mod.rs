//! Download policy: which tool runs, with what target, and what happens on failure

pub mod classify;
pub mod dispatch;
pub mod output;

pub use classify::{classify, search_target, UrlKind, MUSIC_SERVICE_PREFIX, SEARCH_PREFIX};
pub use dispatch::{DispatchState, Dispatcher, DownloadOutcome, DownloadRequest, Route};
pub use output::output_dir_from_template;
