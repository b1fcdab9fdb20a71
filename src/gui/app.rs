//! Main GUI application

use crate::backend::DownloadSession;
use crate::gui::clipboard;
use crate::gui::views::main_view;
use crate::policy::{search_target, DispatchState, DownloadOutcome, Route};
use crate::utils::{AppPaths, Revealer};
use iced::{Application, Command, Element, Subscription, Theme};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Everything the window needs, prepared before it opens
pub struct AppFlags {
    pub session: DownloadSession,
    pub paths: AppPaths,
    pub revealer: Revealer,
}

/// Main application state
pub struct UnidownApp {
    session: DownloadSession,
    paths: AppPaths,
    revealer: Revealer,

    // UI State
    url_input: String,
    use_spotdl: bool,
    status: Status,

    /// Set while a download is in flight
    in_flight: Option<InFlight>,
}

/// Handles on the running download
struct InFlight {
    url: String,
    cancel: CancellationToken,
    progress: watch::Receiver<DispatchState>,
}

/// Text shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Downloading(String),
    Searching(String),
    Finished(String),
    Failed(String),
    Cancelled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => write!(f, "Ready"),
            Status::Downloading(url) => write!(f, "Downloading {}", url),
            Status::Searching(query) => write!(f, "Link failed, trying {}", query),
            Status::Finished(msg) => write!(f, "{}", msg),
            Status::Failed(msg) => write!(f, "{}", msg),
            Status::Cancelled => write!(f, "Download cancelled"),
        }
    }
}

impl Status {
    /// Status for a download of `url` that is still running; `None` once it
    /// has reached a terminal state.
    fn from_progress(state: DispatchState, url: &str) -> Option<Self> {
        match state {
            DispatchState::Classifying
            | DispatchState::MusicService
            | DispatchState::Attempting => Some(Status::Downloading(url.to_string())),
            DispatchState::Retrying => Some(Status::Searching(search_target(url))),
            _ => None,
        }
    }

    fn from_outcome(outcome: &DownloadOutcome) -> Self {
        match outcome {
            DownloadOutcome::Succeeded { route, target } => Status::Finished(match route {
                Route::SearchFallback => format!("Downloaded first search result for {}", target),
                _ => "Download complete".to_string(),
            }),
            DownloadOutcome::Failed(e) => Status::Failed(e.to_string()),
            DownloadOutcome::Cancelled => Status::Cancelled,
        }
    }
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Input events
    UrlInputChanged(String),
    PasteFromClipboard,
    AudioOnlyToggled(bool),
    SpotDlToggled(bool),

    // Download events
    DownloadButtonPressed,
    CancelPressed,
    DownloadFinished(Arc<DownloadOutcome>),
    Tick,

    // System
    OpenConfigFolder,
}

impl Application for UnidownApp {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = AppFlags;

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let app = Self {
            session: flags.session,
            paths: flags.paths,
            revealer: flags.revealer,
            url_input: String::new(),
            use_spotdl: false,
            status: Status::Ready,
            in_flight: None,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from("youtube downloader")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::UrlInputChanged(url) => {
                self.url_input = url;
                Command::none()
            }

            Message::PasteFromClipboard => {
                match clipboard::get_clipboard_content() {
                    Ok(content) => self.url_input = content,
                    Err(e) => self.status = Status::Failed(e),
                }
                Command::none()
            }

            Message::AudioOnlyToggled(enabled) => {
                self.session.set_audio_only(enabled);
                Command::none()
            }

            Message::SpotDlToggled(enabled) => {
                self.use_spotdl = enabled;
                Command::none()
            }

            Message::DownloadButtonPressed => {
                if self.in_flight.is_some() {
                    return Command::none();
                }

                match self.session.start(&self.url_input, self.use_spotdl) {
                    Ok(pending) => {
                        let url = pending.request().url.clone();
                        let (tx, rx) = watch::channel(DispatchState::Classifying);
                        self.status = Status::Downloading(url.clone());
                        self.in_flight = Some(InFlight {
                            url,
                            cancel: pending.cancel_token(),
                            progress: rx,
                        });
                        Command::perform(
                            pending.run_observed(move |state| {
                                tx.send_replace(state);
                            }),
                            |outcome| Message::DownloadFinished(Arc::new(outcome)),
                        )
                    }
                    Err(e) => {
                        // Blank input is ignored silently, like an unpressed button.
                        if !matches!(e, crate::utils::error::DownloadError::EmptyInput) {
                            self.status = Status::Failed(e.to_string());
                        }
                        Command::none()
                    }
                }
            }

            Message::CancelPressed => {
                if let Some(in_flight) = &self.in_flight {
                    info!("Cancelling download");
                    in_flight.cancel.cancel();
                }
                Command::none()
            }

            Message::Tick => {
                if let Some(in_flight) = &mut self.in_flight {
                    if in_flight.progress.has_changed().unwrap_or(false) {
                        let state = *in_flight.progress.borrow_and_update();
                        if let Some(status) = Status::from_progress(state, &in_flight.url) {
                            self.status = status;
                        }
                    }
                }
                Command::none()
            }

            Message::DownloadFinished(outcome) => {
                // Back to ready whatever happened.
                self.in_flight = None;
                self.status = Status::from_outcome(&outcome);

                if outcome.is_success() {
                    let output_dir = self.session.output_dir();
                    if let Err(e) = self.revealer.reveal(&output_dir) {
                        warn!("Could not open {}: {}", output_dir.display(), e);
                    }
                }
                Command::none()
            }

            Message::OpenConfigFolder => {
                let config_dir = self.paths.config_dir();
                if let Err(e) = self.revealer.reveal(&config_dir) {
                    warn!("Could not open {}: {}", config_dir.display(), e);
                }
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        main_view(
            &self.url_input,
            self.session.audio_only(),
            self.use_spotdl,
            self.in_flight.is_some(),
            &self.status,
        )
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.in_flight.is_some() {
            iced::time::every(Duration::from_millis(100)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn theme(&self) -> Self::Theme {
        Theme::Dark
    }
}

/// Open the main window and block until it closes.
pub fn run(flags: AppFlags) -> iced::Result {
    UnidownApp::run(iced::Settings {
        window: iced::window::Settings {
            size: iced::Size::new(520.0, 260.0),
            resizable: false,
            ..Default::default()
        },
        ..iced::Settings::with_flags(flags)
    })
}
