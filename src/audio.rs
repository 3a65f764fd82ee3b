//! Audio feedback: the completion chime and the ambient music indicator.

use crate::tracks::{self, Track};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to initialize audio output: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("Failed to play audio: {0}")]
    Play(#[from] rodio::PlayError),
}

pub struct AudioPlayer {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioPlayer {
    /// Creates a new audio player.
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Plays the completion chime at the given volume (0-100).
    pub fn play_chime(&self, volume: u8) {
        if let Err(e) = self.play_generated_tone(chime_gain(volume)) {
            warn!(error = %e, "failed to play chime");
        }
    }

    fn play_generated_tone(&self, gain: f32) -> Result<(), AudioError> {
        use rodio::source::{SineWave, Source};

        let sink = Sink::try_new(&self.handle)?;

        // Two-tone chime: A5 then C6
        let tone1 = SineWave::new(880.0)
            .take_duration(Duration::from_millis(150))
            .amplify(gain);

        let silence =
            rodio::source::Zero::<f32>::new(1, 44100).take_duration(Duration::from_millis(50));

        let tone2 = SineWave::new(1046.5)
            .take_duration(Duration::from_millis(200))
            .amplify(gain);

        sink.append(tone1);
        sink.append(silence);
        sink.append(tone2);
        sink.detach(); // Play in background

        Ok(())
    }
}

/// Maps the 0-100 volume setting onto the chime's amplitude.
fn chime_gain(volume: u8) -> f32 {
    0.6 * f32::from(volume.min(100)) / 100.0
}

/// Tracks which ambient track is "on" while the clock runs.
///
/// Catalog entries are remote streams, so this only keeps the selection and
/// reports it; the menu shows it as a now-playing indicator.
#[derive(Debug, Default)]
pub struct AmbientMusic {
    now_playing: Option<&'static Track>,
}

impl AmbientMusic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to the track with the given key. Unknown keys stop the music.
    pub fn play(&mut self, key: &str, volume: u8) -> Option<&'static Track> {
        self.stop();
        match tracks::lookup(key) {
            Some(track) => {
                info!(track = track.label, url = track.url, volume, "playing ambient music");
                self.now_playing = Some(track);
            }
            None => warn!(key, "unknown music track"),
        }
        self.now_playing
    }

    pub fn stop(&mut self) {
        if let Some(track) = self.now_playing.take() {
            info!(track = track.label, "stopped ambient music");
        }
    }

    pub fn now_playing(&self) -> Option<&'static Track> {
        self.now_playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_player_creation() {
        // This test may fail on systems without audio output
        // That's acceptable for CI environments
        let result = AudioPlayer::new();
        // Don't assert success, just ensure it doesn't panic
        match result {
            Ok(_) => println!("Audio player created successfully"),
            Err(e) => println!("Audio player creation failed (expected on CI): {}", e),
        }
    }

    #[test]
    fn test_chime_gain_scales_with_volume() {
        assert_eq!(chime_gain(0), 0.0);
        assert!((chime_gain(50) - 0.3).abs() < 1e-6);
        assert!((chime_gain(100) - 0.6).abs() < 1e-6);
        assert_eq!(chime_gain(200), chime_gain(100));
    }

    #[test]
    fn test_music_play_and_stop() {
        let mut music = AmbientMusic::new();
        assert!(music.now_playing().is_none());

        let track = music.play("nature", 40).unwrap();
        assert_eq!(track.key, "nature");
        assert_eq!(music.now_playing().map(|t| t.key), Some("nature"));

        music.stop();
        assert!(music.now_playing().is_none());
    }

    #[test]
    fn test_music_unknown_track_stops_playback() {
        let mut music = AmbientMusic::new();
        music.play("lofi", 50);
        assert!(music.play("polka", 50).is_none());
        assert!(music.now_playing().is_none());
    }
}
