/// Minimal music playlist
///
/// An ordered list of names with per-entry options and a cursor that wraps.
use serde::{Deserialize, Serialize};

use crate::audio_system::PlaybackOptions;
use crate::error::SoundError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    #[serde(default)]
    pub options: PlaybackOptions,
}

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    entries: Vec<PlaylistEntry>,
    index: usize,
}

impl Playlist {
    /// Build entries from names, common options and optional per-index overrides
    pub fn new<S: AsRef<str>>(
        names: &[S],
        common: &PlaybackOptions,
        per_index: &[Option<PlaybackOptions>],
    ) -> Self {
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let options = match per_index.get(i) {
                    Some(Some(individual)) => common.merged(individual),
                    _ => *common,
                };
                PlaylistEntry {
                    name: name.as_ref().to_string(),
                    options,
                }
            })
            .collect();

        Self { entries, index: 0 }
    }

    /// Jump to `index`, or step forward by one; wraps around the end
    pub fn advance(&mut self, index: Option<usize>) -> Result<&PlaylistEntry, SoundError> {
        if self.is_empty() {
            return Err(SoundError::EmptyPlaylist);
        }

        let next = index.unwrap_or(self.index + 1);
        self.index = next % self.entries.len();
        Ok(&self.entries[self.index])
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }
}
