/// Playback and cue options
///
/// `PlaybackOptions` travel to the audio engine when a locator is turned into
/// a player. `CueOptions` only steer `SoundRegistry::play`.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options handed to the audio engine when building a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Repeat the track forever
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,

    /// Volume multiplier (0.0-1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,

    /// Playback speed, 1.0 is normal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,
}

impl PlaybackOptions {
    /// Options with nothing set; the engine falls back to its defaults
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    /// Set volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume.clamp(0.0, 1.0));
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = Some(rate.max(0.0));
        self
    }

    /// Shallow merge; fields set in `overrides` win
    pub fn merged(&self, overrides: &PlaybackOptions) -> PlaybackOptions {
        PlaybackOptions {
            looping: overrides.looping.or(self.looping),
            volume: overrides.volume.or(self.volume),
            rate: overrides.rate.or(self.rate),
        }
    }

    /// Fill unset fields from `defaults`
    pub fn or_defaults(&self, defaults: &PlaybackOptions) -> PlaybackOptions {
        defaults.merged(self)
    }

    pub fn is_looping(&self) -> bool {
        self.looping.unwrap_or(false)
    }

    /// Effective volume, clamped
    pub fn effective_volume(&self) -> f32 {
        self.volume.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    pub fn effective_rate(&self) -> f32 {
        self.rate.unwrap_or(1.0)
    }
}

/// Options for a fire-and-forget sound effect
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CueOptions {
    /// Wait this long before the cue fires
    pub delay: Option<Duration>,

    /// Probability in [0, 1] that the cue actually plays
    pub random: Option<f64>,

    /// Log a warning when the name is not registered
    pub warn_missing: bool,
}

impl CueOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_delay_ms(self, ms: u64) -> Self {
        self.with_delay(Duration::from_millis(ms))
    }

    /// 1.0 always plays, 0.0 never plays
    pub fn with_random(mut self, probability: f64) -> Self {
        self.random = Some(probability.clamp(0.0, 1.0));
        self
    }

    pub fn warn_missing(mut self) -> Self {
        self.warn_missing = true;
        self
    }

    /// Delay to wait, if any; zero counts as none
    pub fn effective_delay(&self) -> Option<Duration> {
        self.delay.filter(|d| !d.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_options_builder() {
        let options = PlaybackOptions::none()
            .with_loop(true)
            .with_volume(0.5)
            .with_rate(1.25);

        assert_eq!(options.looping, Some(true));
        assert_eq!(options.volume, Some(0.5));
        assert_eq!(options.rate, Some(1.25));
    }

    #[test]
    fn test_volume_clamping() {
        let options = PlaybackOptions::none().with_volume(1.5);
        assert_eq!(options.volume, Some(1.0)); // Clamped

        let options = PlaybackOptions::none().with_volume(-0.5);
        assert_eq!(options.volume, Some(0.0)); // Clamped
    }

    #[test]
    fn test_merge_override_wins() {
        let common = PlaybackOptions::none().with_volume(0.4).with_loop(true);
        let individual = PlaybackOptions::none().with_volume(0.9);

        let merged = common.merged(&individual);
        assert_eq!(merged.volume, Some(0.9));
        assert_eq!(merged.looping, Some(true));
        assert_eq!(merged.rate, None);
    }

    #[test]
    fn test_or_defaults_keeps_explicit_values() {
        let defaults = PlaybackOptions::none().with_loop(true).with_volume(0.75);
        let explicit = PlaybackOptions::none().with_loop(false);

        let resolved = explicit.or_defaults(&defaults);
        assert_eq!(resolved.looping, Some(false));
        assert_eq!(resolved.volume, Some(0.75));
    }

    #[test]
    fn test_effective_values() {
        let options = PlaybackOptions::none();
        assert!(!options.is_looping());
        assert_eq!(options.effective_volume(), 1.0);
        assert_eq!(options.effective_rate(), 1.0);
    }

    #[test]
    fn test_options_deserialize_loop_key() {
        let options: PlaybackOptions = serde_json::from_str(r#"{"loop": false, "volume": 0.3}"#).unwrap();
        assert_eq!(options.looping, Some(false));
        assert_eq!(options.volume, Some(0.3));
    }

    #[test]
    fn test_cue_options() {
        let cue = CueOptions::new().with_delay_ms(250).with_random(2.0).warn_missing();
        assert_eq!(cue.delay, Some(Duration::from_millis(250)));
        assert_eq!(cue.random, Some(1.0));
        assert!(cue.warn_missing);

        let cue = CueOptions::new().with_delay_ms(0);
        assert_eq!(cue.effective_delay(), None);
    }
}
