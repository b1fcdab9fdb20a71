//! URL classification

/// Links with this prefix always go to the music-service downloader.
pub const MUSIC_SERVICE_PREFIX: &str = "https://open.spotify.com/";

/// Prefix turning a generic-downloader target into "search and take the first hit".
pub const SEARCH_PREFIX: &str = "ytsearch1:";

/// Which downloader a link is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    MusicService,
    Generic,
}

pub fn classify(url: &str, force_music_service: bool) -> UrlKind {
    if force_music_service || url.starts_with(MUSIC_SERVICE_PREFIX) {
        UrlKind::MusicService
    } else {
        UrlKind::Generic
    }
}

/// Fallback target treating `input` as a search query.
pub fn search_target(input: &str) -> String {
    format!("{}{}", SEARCH_PREFIX, input)
}
