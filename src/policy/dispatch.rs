//! Download dispatch
//!
//! Routes one request to the music-service or the generic downloader and
//! applies the single search fallback for generic links.
//!
//! ```text
//! Idle -> Classifying -> MusicService ---------------> Succeeded | Failed | Cancelled -> Idle
//!                     -> Attempting -(fail)-> Retrying -> Succeeded | Failed | Cancelled -> Idle
//! ```

use crate::downloader::traits::{GenericDownloader, MusicServiceDownloader};
use crate::policy::classify::{classify, search_target, UrlKind};
use crate::utils::config::SettingsRecord;
use crate::utils::error::{DownloadError, ToolError};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub audio_only: bool,
    pub force_music_service: bool,
}

/// Which path produced a successful download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    MusicService,
    Direct,
    SearchFallback,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    /// `target` is what the tool was finally called with.
    Succeeded { route: Route, target: String },
    Failed(DownloadError),
    Cancelled,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Observable steps of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Classifying,
    MusicService,
    Attempting,
    Retrying,
    Succeeded,
    Failed,
    Cancelled,
}

/// Stateless between calls; share it freely.
#[derive(Clone)]
pub struct Dispatcher {
    generic: Arc<dyn GenericDownloader>,
    music: Arc<dyn MusicServiceDownloader>,
}

impl Dispatcher {
    pub fn new(generic: Arc<dyn GenericDownloader>, music: Arc<dyn MusicServiceDownloader>) -> Self {
        Self { generic, music }
    }

    pub async fn dispatch(
        &self,
        request: &DownloadRequest,
        record: &SettingsRecord,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        self.dispatch_observed(request, record, cancel, |_| {}).await
    }

    /// [`Dispatcher::dispatch`], reporting every state change to `observer`.
    ///
    /// The observer always sees a terminal state followed by `Idle`.
    pub async fn dispatch_observed<F>(
        &self,
        request: &DownloadRequest,
        record: &SettingsRecord,
        cancel: &CancellationToken,
        mut observer: F,
    ) -> DownloadOutcome
    where
        F: FnMut(DispatchState) + Send,
    {
        observer(DispatchState::Classifying);
        let kind = classify(&request.url, request.force_music_service);
        debug!("Classified {} as {:?}", request.url, kind);

        let outcome = match kind {
            UrlKind::MusicService => {
                observer(DispatchState::MusicService);
                self.run_music_service(request, cancel).await
            }
            UrlKind::Generic => {
                observer(DispatchState::Attempting);
                self.run_generic(request, record, cancel, &mut observer).await
            }
        };

        observer(match &outcome {
            DownloadOutcome::Succeeded { .. } => DispatchState::Succeeded,
            DownloadOutcome::Failed(_) => DispatchState::Failed,
            DownloadOutcome::Cancelled => DispatchState::Cancelled,
        });
        observer(DispatchState::Idle);
        outcome
    }

    async fn run_music_service(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> DownloadOutcome {
        if request.audio_only {
            debug!("{} picks its own format; audio-only flag ignored", self.music.id());
        }
        info!("Downloading {} with {}", request.url, self.music.id());

        match cancellable(cancel, self.music.download(&request.url)).await {
            None => DownloadOutcome::Cancelled,
            Some(Ok(())) => DownloadOutcome::Succeeded {
                route: Route::MusicService,
                target: request.url.clone(),
            },
            Some(Err(e)) => DownloadOutcome::Failed(DownloadError::MusicServiceFailed(e)),
        }
    }

    async fn run_generic<F>(
        &self,
        request: &DownloadRequest,
        record: &SettingsRecord,
        cancel: &CancellationToken,
        observer: &mut F,
    ) -> DownloadOutcome
    where
        F: FnMut(DispatchState) + Send,
    {
        info!("Downloading {} with {}", request.url, self.generic.id());

        let direct = match self.attempt(record, &request.url, cancel).await {
            None => return DownloadOutcome::Cancelled,
            Some(Ok(())) => {
                return DownloadOutcome::Succeeded {
                    route: Route::Direct,
                    target: request.url.clone(),
                }
            }
            Some(Err(e)) => e,
        };

        // Any failure falls back to a search, network errors included.
        let fallback = search_target(&request.url);
        warn!("Direct download failed ({}); retrying as {}", direct, fallback);
        observer(DispatchState::Retrying);

        match self.attempt(record, &fallback, cancel).await {
            None => DownloadOutcome::Cancelled,
            Some(Ok(())) => DownloadOutcome::Succeeded {
                route: Route::SearchFallback,
                target: fallback,
            },
            Some(Err(cause)) => {
                DownloadOutcome::Failed(DownloadError::GenericDownloadFailed { direct, cause })
            }
        }
    }

    async fn attempt(
        &self,
        record: &SettingsRecord,
        target: &str,
        cancel: &CancellationToken,
    ) -> Option<Result<(), ToolError>> {
        cancellable(cancel, self.generic.download(record, target)).await
    }
}

/// `None` when `cancel` fires first; the tool future is dropped, which kills
/// its child process.
async fn cancellable<T>(cancel: &CancellationToken, fut: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            info!("Download cancelled");
            None
        }
        result = fut => Some(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::DownloadErrorKind;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    /// Generic downloader failing the first `failures` calls.
    struct FlakyGeneric {
        failures: usize,
        calls: Mutex<Vec<String>>,
    }

    impl FlakyGeneric {
        fn new(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenericDownloader for FlakyGeneric {
        fn id(&self) -> &'static str {
            "flaky"
        }

        async fn download(&self, _record: &SettingsRecord, target: &str) -> Result<(), ToolError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(target.to_string());
            if calls.len() <= self.failures {
                Err(ToolError::Exited {
                    program: "flaky".to_string(),
                    code: Some(1),
                    stderr: format!("ERROR: Unsupported URL: {}", target),
                })
            } else {
                Ok(())
            }
        }
    }

    struct RecordingMusic {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MusicServiceDownloader for RecordingMusic {
        fn id(&self) -> &'static str {
            "recording"
        }

        async fn download(&self, url: &str) -> Result<(), ToolError> {
            self.calls.lock().unwrap().push(url.to_string());
            if self.fail {
                Err(ToolError::NotFound("spotdl"))
            } else {
                Ok(())
            }
        }
    }

    fn music(fail: bool) -> Arc<RecordingMusic> {
        Arc::new(RecordingMusic {
            fail,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn request(url: &str, force: bool) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            audio_only: false,
            force_music_service: force,
        }
    }

    fn record() -> SettingsRecord {
        SettingsRecord::with_output_dir(Path::new("out"))
    }

    #[tokio::test]
    async fn test_direct_success_has_no_retry() {
        let generic = FlakyGeneric::new(0);
        let dispatcher = Dispatcher::new(generic.clone(), music(false));
        let mut states = Vec::new();

        let outcome = dispatcher
            .dispatch_observed(
                &request("https://youtu.be/abc", false),
                &record(),
                &CancellationToken::new(),
                |s| states.push(s),
            )
            .await;

        assert!(matches!(
            outcome,
            DownloadOutcome::Succeeded { route: Route::Direct, .. }
        ));
        assert_eq!(generic.calls(), vec!["https://youtu.be/abc".to_string()]);
        assert_eq!(
            states,
            vec![
                DispatchState::Classifying,
                DispatchState::Attempting,
                DispatchState::Succeeded,
                DispatchState::Idle,
            ]
        );
    }

    #[tokio::test]
    async fn test_search_fallback_succeeds() {
        let generic = FlakyGeneric::new(1);
        let dispatcher = Dispatcher::new(generic.clone(), music(false));

        let outcome = dispatcher
            .dispatch(&request("never gonna", false), &record(), &CancellationToken::new())
            .await;

        match outcome {
            DownloadOutcome::Succeeded { route, target } => {
                assert_eq!(route, Route::SearchFallback);
                assert_eq!(target, "ytsearch1:never gonna");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(generic.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_music_service_failure_is_not_retried() {
        let generic = FlakyGeneric::new(0);
        let spotdl = music(true);
        let dispatcher = Dispatcher::new(generic.clone(), spotdl.clone());
        let mut states = Vec::new();

        let outcome = dispatcher
            .dispatch_observed(
                &request("https://open.spotify.com/album/xyz", false),
                &record(),
                &CancellationToken::new(),
                |s| states.push(s),
            )
            .await;

        match outcome {
            DownloadOutcome::Failed(e) => assert_eq!(e.kind(), DownloadErrorKind::MusicServiceFailed),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(spotdl.calls.lock().unwrap().len(), 1);
        assert!(generic.calls().is_empty());
        assert_eq!(states.last(), Some(&DispatchState::Idle));
        assert!(states.contains(&DispatchState::Failed));
        assert!(!states.contains(&DispatchState::Retrying));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let generic = FlakyGeneric::new(0);
        let dispatcher = Dispatcher::new(generic.clone(), music(false));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut states = Vec::new();

        let outcome = dispatcher
            .dispatch_observed(&request("https://youtu.be/abc", false), &record(), &cancel, |s| {
                states.push(s)
            })
            .await;

        assert!(matches!(outcome, DownloadOutcome::Cancelled));
        assert!(generic.calls().is_empty());
        assert_eq!(
            &states[states.len() - 2..],
            &[DispatchState::Cancelled, DispatchState::Idle]
        );
    }
}
