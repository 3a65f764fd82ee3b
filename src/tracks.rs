//! Catalog of ambient music tracks.
//!
//! Settings only store a track key; this table maps keys to something a
//! music collaborator can play.

/// Key of the track selected on first launch.
pub const DEFAULT_TRACK: &str = "lofi";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub key: &'static str,
    pub label: &'static str,
    pub url: &'static str,
}

pub const CATALOG: &[Track] = &[
    Track {
        key: "lofi",
        label: "Lo-fi Beats",
        url: "https://www.youtube.com/embed/jfKfPfyJRdk?autoplay=1&loop=1&playlist=jfKfPfyJRdk",
    },
    Track {
        key: "nature",
        label: "Nature Sounds",
        url: "https://www.youtube.com/embed/eKFTSSKCzWA?autoplay=1&loop=1&playlist=eKFTSSKCzWA",
    },
    Track {
        key: "ambient",
        label: "Ambient",
        url: "https://www.youtube.com/embed/l7TxwBhtNEU?autoplay=1&loop=1&playlist=l7TxwBhtNEU",
    },
    Track {
        key: "piano",
        label: "Piano",
        url: "https://www.youtube.com/embed/3jWRrafhO7M?autoplay=1&loop=1&playlist=3jWRrafhO7M",
    },
];

/// Looks up a track by key.
pub fn lookup(key: &str) -> Option<&'static Track> {
    CATALOG.iter().find(|track| track.key == key)
}
