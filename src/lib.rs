//! Named sound effects, music and ambience for games.
//!
//! A thin layer over rodio: look a name up, resolve it to a player (a file,
//! a prebuilt player, a callback or a random pick among several), keep one
//! music track and one ambience track playing at a time, and step through a
//! simple playlist.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod logging;
pub mod registry;

pub use audio_system::{
    AudioEngine, AudioOutput, CueOptions, PlaybackOptions, PlayerHandle, RodioEngine,
    SilentEngine, SlotKind,
};
pub use config::{ManifestEntry, PlaylistConfig, SoundManifest};
pub use error::{ConfigError, SoundError};
pub use registry::{Generator, Playable, SoundRegistry, StopHandle};
