/// Playback slot kinds
///
/// Music and ambience each own one exclusive slot: starting a track in a slot
/// stops whatever that slot was playing. The two slots play side by side.
use std::fmt;

use super::options::PlaybackOptions;

/// Exclusive playback channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Background music
    Music,

    /// Looping ambience bed
    Ambience,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Music => write!(f, "Music"),
            SlotKind::Ambience => write!(f, "Ambience"),
        }
    }
}

impl SlotKind {
    /// Defaults applied under the caller's options
    pub fn default_options(&self) -> PlaybackOptions {
        match self {
            SlotKind::Music => PlaybackOptions::none().with_loop(true).with_volume(0.75),
            SlotKind::Ambience => PlaybackOptions::none().with_loop(true),
        }
    }
}
