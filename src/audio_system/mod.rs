pub mod engine;
pub mod options;
pub mod player;
/// Audio engine collaborator
///
/// Everything that actually touches audio lives here; the registry only sees
/// the `AudioEngine` and `PlayerHandle` traits.
///
/// ## Architecture
///
/// ```text
/// SoundRegistry
///   └── Arc<dyn AudioEngine>
///       ├── RodioEngine  (files preloaded into memory, one Sink per play)
///       └── SilentEngine (no output device)
///
/// AudioEngine::create_player(locator, PlaybackOptions)
///   └── PlayerHandle { play(), stop() }
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// use audio_system::{AudioOutput, PlaybackOptions};
///
/// let output = AudioOutput::try_default(Some("assets".into()))?;
/// let engine = output.engine();
///
/// let player = engine.create_player(
///     "music/theme.ogg",
///     &PlaybackOptions::none().with_loop(true).with_volume(0.75),
/// )?;
/// player.play()?;
/// ```
pub mod source;

// Re-export commonly used types
pub use engine::{AudioEngine, PlayerHandle, SilentEngine};
pub use options::{CueOptions, PlaybackOptions};
pub use player::{resolve_locator, AudioOutput, RodioEngine, RodioPlayer};
pub use source::SlotKind;
