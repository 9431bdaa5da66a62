use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::{resolve_locator, PlaybackOptions};
use crate::error::ConfigError;
use crate::registry::Playable;

/// One listing entry: a locator, or a list meaning "pick one at random"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestEntry {
    Source(String),
    Choice(Vec<ManifestEntry>),
}

impl ManifestEntry {
    /// Locators must stay valid UTF-8 once joined onto `base_dir`
    fn to_playable(&self, name: &str, base_dir: Option<&Path>) -> Result<Playable, ConfigError> {
        match self {
            ManifestEntry::Source(locator) => {
                let path = resolve_locator(base_dir, locator);
                let locator = path.to_str().ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "locator for {} is not valid UTF-8: {}",
                        name,
                        path.display()
                    ))
                })?;
                Ok(Playable::Source(locator.to_string()))
            }
            ManifestEntry::Choice(items) => Ok(Playable::Choice(
                items
                    .iter()
                    .map(|item| item.to_playable(name, base_dir))
                    .collect::<Result<_, _>>()?,
            )),
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        match self {
            ManifestEntry::Source(locator) if locator.trim().is_empty() => {
                Err(ConfigError::Invalid(format!("empty locator for {}", name)))
            }
            ManifestEntry::Choice(items) if items.is_empty() => {
                Err(ConfigError::Invalid(format!("empty choice for {}", name)))
            }
            ManifestEntry::Choice(items) => items.iter().try_for_each(|item| item.validate(name)),
            ManifestEntry::Source(_) => Ok(()),
        }
    }
}

/// Playlist to start with, mirroring `SoundRegistry::play_list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistConfig {
    pub names: Vec<String>,

    #[serde(default)]
    pub options: PlaybackOptions,

    /// Overrides by position; `null` keeps the common options
    #[serde(default)]
    pub per_index: Vec<Option<PlaybackOptions>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundManifest {
    /// Directory relative locators are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Sound effects by name
    #[serde(default)]
    pub sounds: BTreeMap<String, ManifestEntry>,

    /// Music and ambience tracks by name
    #[serde(default)]
    pub music: BTreeMap<String, ManifestEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistConfig>,
}

impl SoundManifest {
    /// Load and validate a manifest
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let manifest: SoundManifest =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        manifest.validate()?;

        tracing::info!(
            "Loaded manifest from {} ({} sounds, {} music)",
            path.display(),
            manifest.sounds.len(),
            manifest.music.len()
        );
        Ok(manifest)
    }

    /// Save manifest to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// Default manifest location in the user config folder
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("SoundCue"))
            .unwrap_or_else(|| PathBuf::from("config"))
            .join("manifest.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, entry) in self.sounds.iter().chain(self.music.iter()) {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("entry with empty name".to_string()));
            }
            entry.validate(name)?;
        }

        if let Some(playlist) = &self.playlist {
            if let Some(missing) = playlist.names.iter().find(|n| !self.music.contains_key(*n)) {
                return Err(ConfigError::Invalid(format!(
                    "playlist entry {} is not a music track",
                    missing
                )));
            }
        }

        Ok(())
    }

    /// Sound effect listing with locators resolved against `base_dir`
    pub fn sound_listing(&self) -> Result<Vec<(String, Playable)>, ConfigError> {
        Self::listing(&self.sounds, self.base_dir.as_deref())
    }

    pub fn music_listing(&self) -> Result<Vec<(String, Playable)>, ConfigError> {
        Self::listing(&self.music, self.base_dir.as_deref())
    }

    fn listing(
        entries: &BTreeMap<String, ManifestEntry>,
        base_dir: Option<&Path>,
    ) -> Result<Vec<(String, Playable)>, ConfigError> {
        entries
            .iter()
            .map(|(name, entry)| Ok((name.clone(), entry.to_playable(name, base_dir)?)))
            .collect()
    }
}
