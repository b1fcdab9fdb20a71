//! Per-session download state
//!
//! The session owns the settings record and guarantees that at most one
//! download is in flight. Each download runs from a [`PendingDownload`] that
//! carries its own snapshot of the settings and a cancellation token.

use crate::policy::{DispatchState, Dispatcher, DownloadOutcome, DownloadRequest};
use crate::utils::config::SettingsRecord;
use crate::utils::error::DownloadError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct DownloadSession {
    settings: SettingsRecord,
    dispatcher: Dispatcher,
    in_flight: Arc<AtomicBool>,
}

impl DownloadSession {
    pub fn new(settings: SettingsRecord, dispatcher: Dispatcher) -> Self {
        Self {
            settings,
            dispatcher,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn settings(&self) -> &SettingsRecord {
        &self.settings
    }

    pub fn audio_only(&self) -> bool {
        self.settings.is_audio_only()
    }

    pub fn set_audio_only(&mut self, enabled: bool) {
        self.settings.set_audio_only(enabled);
        debug!("Audio-only set to {}: format {}", enabled, self.settings.format_selector);
    }

    /// Directory the current settings download into.
    pub fn output_dir(&self) -> PathBuf {
        crate::policy::output_dir_from_template(&self.settings.output_template)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the session for one download of `input`.
    ///
    /// Fails with [`DownloadError::EmptyInput`] for blank input and with
    /// [`DownloadError::Busy`] while another download holds the session.
    pub fn start(
        &self,
        input: &str,
        force_music_service: bool,
    ) -> Result<PendingDownload, DownloadError> {
        let url = input.trim();
        if url.is_empty() {
            return Err(DownloadError::EmptyInput);
        }

        let guard = InFlightGuard::acquire(&self.in_flight).ok_or(DownloadError::Busy)?;
        info!("Starting download of {}", url);

        Ok(PendingDownload {
            request: DownloadRequest {
                url: url.to_string(),
                audio_only: self.audio_only(),
                force_music_service,
            },
            settings: self.settings.clone(),
            dispatcher: self.dispatcher.clone(),
            cancel: CancellationToken::new(),
            guard,
        })
    }
}

/// A claimed download that has not run yet
pub struct PendingDownload {
    request: DownloadRequest,
    settings: SettingsRecord,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
    guard: InFlightGuard,
}

impl PendingDownload {
    pub fn request(&self) -> &DownloadRequest {
        &self.request
    }

    /// Token that cancels this download, usable from anywhere.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(self) -> DownloadOutcome {
        self.run_observed(|_| {}).await
    }

    /// Run the download, releasing the session on every exit path.
    pub async fn run_observed<F>(self, observer: F) -> DownloadOutcome
    where
        F: FnMut(DispatchState) + Send,
    {
        let Self {
            request,
            settings,
            dispatcher,
            cancel,
            guard,
        } = self;

        let outcome = dispatcher
            .dispatch_observed(&request, &settings, &cancel, observer)
            .await;
        drop(guard);
        outcome
    }
}

/// Clears the in-flight flag when dropped, including on unwind or when the
/// pending download is discarded without running.
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
