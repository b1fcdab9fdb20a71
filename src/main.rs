//! Unidown - paste a link, get the media
//!
//! Regular links go through yt-dlp (with a first-result search as fallback),
//! music-streaming links go through spotDL.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use unidown::backend::DownloadSession;
use unidown::downloader::{SpotDlDownloader, YtDlpDownloader};
use unidown::gui;
use unidown::policy::{Dispatcher, DownloadOutcome};
use unidown::utils::{config, AppPaths, Revealer};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Download this link without opening the window
    #[arg(long, value_name = "URL")]
    download: Option<String>,

    /// Extract audio (mp3, 192 kbps) instead of keeping the video
    #[arg(long)]
    audio: bool,

    /// Send the link to spotdl whatever it looks like
    #[arg(long)]
    spotdl: bool,

    /// Directory holding config/ and output/ (defaults to the executable's directory)
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let paths = args
        .base_dir
        .clone()
        .map(AppPaths::new)
        .unwrap_or_else(AppPaths::from_install_dir);
    info!("Using base directory {}", paths.base().display());

    // Only configuration errors are allowed to stop the process.
    let settings = config::load(&paths.settings_file(), &paths.default_output_dir())?;

    let dispatcher = Dispatcher::new(
        Arc::new(YtDlpDownloader::detect()),
        Arc::new(SpotDlDownloader::detect()),
    );
    let mut session = DownloadSession::new(settings, dispatcher);

    if let Some(url) = args.download {
        if args.audio {
            session.set_audio_only(true);
        }
        let rt = tokio::runtime::Runtime::new()?;
        return Ok(rt.block_on(download_cli(session, url, args.spotdl)));
    }

    gui::app::run(gui::AppFlags {
        session,
        paths,
        revealer: Revealer::detect(),
    })?;

    Ok(ExitCode::SUCCESS)
}

async fn download_cli(session: DownloadSession, url: String, spotdl: bool) -> ExitCode {
    let pending = match session.start(&url, spotdl) {
        Ok(pending) => pending,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let cancel = pending.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    println!("Downloading {}...", pending.request().url);
    match pending.run().await {
        DownloadOutcome::Succeeded { target, .. } => {
            println!("Downloaded {} into {}", target, session.output_dir().display());
            ExitCode::SUCCESS
        }
        DownloadOutcome::Failed(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
        DownloadOutcome::Cancelled => {
            eprintln!("Download cancelled");
            ExitCode::from(130)
        }
    }
}
