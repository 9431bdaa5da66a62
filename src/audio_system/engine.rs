/// Audio engine seam
///
/// The registry never decodes or mixes anything itself. It asks an
/// `AudioEngine` to turn a locator into a `PlayerHandle` and drives that.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::options::PlaybackOptions;
use crate::error::SoundError;

/// A constructed player that can be started and stopped
pub trait PlayerHandle: Send + Sync {
    /// Start playback from the beginning
    fn play(&self) -> Result<(), SoundError>;

    /// Stop playback; stopping an idle player does nothing
    fn stop(&self);
}

/// Builds players from source locators
pub trait AudioEngine: Send + Sync {
    /// Create a player for `locator`; it does not start until `play`
    fn create_player(
        &self,
        locator: &str,
        options: &PlaybackOptions,
    ) -> Result<Arc<dyn PlayerHandle>, SoundError>;
}

/// Engine that plays nothing
///
/// Used when no output device is available so the rest of the application
/// keeps working.
#[derive(Debug, Default)]
pub struct SilentEngine;

impl SilentEngine {
    pub fn new() -> Self {
        Self
    }
}

impl AudioEngine for SilentEngine {
    fn create_player(
        &self,
        locator: &str,
        options: &PlaybackOptions,
    ) -> Result<Arc<dyn PlayerHandle>, SoundError> {
        tracing::debug!("Silent player for {} ({:?})", locator, options);
        Ok(Arc::new(SilentPlayer {
            locator: locator.to_string(),
            playing: AtomicBool::new(false),
        }))
    }
}

struct SilentPlayer {
    locator: String,
    playing: AtomicBool,
}

impl PlayerHandle for SilentPlayer {
    fn play(&self) -> Result<(), SoundError> {
        tracing::debug!("Silent play: {}", self.locator);
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            tracing::debug!("Silent stop: {}", self.locator);
        }
    }
}
