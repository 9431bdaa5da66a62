/// Sound registry module
///
/// Name lookup, playable dispatch, the exclusive music/ambience slots and the
/// playlist.
///
/// ## Usage
///
/// ```rust,ignore
/// let registry = SoundRegistry::builder(engine)
///     .sound("click", "sfx/click.mp3")
///     .sound("step", vec!["sfx/step1.mp3", "sfx/step2.mp3"])
///     .music("theme", "music/theme.ogg")
///     .build()?;
///
/// registry.play("step", &CueOptions::new().with_random(0.5))?;
/// let stop = registry.play_music("theme", &PlaybackOptions::none())?;
/// stop.stop();
/// ```

pub mod controller;
pub mod playable;
pub mod playlist;
pub mod random;
pub mod scheduler;
pub mod slot;

// Re-export commonly used types
pub use controller::{SoundRegistry, SoundRegistryBuilder};
pub use playable::{Generator, Playable, StopHandle};
pub use playlist::{Playlist, PlaylistEntry};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use scheduler::DelayScheduler;
pub use slot::{Slot, SlotState, StartOutcome};
