/// Sound registry
///
/// Maps names to playables for sound effects and for music/ambience, resolves
/// them through the audio engine, and keeps the music and ambience slots
/// exclusive.
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::playable::{Playable, StopHandle};
use super::playlist::Playlist;
use super::random::{RandomSource, ThreadRandom};
use super::scheduler::DelayScheduler;
use super::slot::{Slot, StartOutcome};
use crate::audio_system::{AudioEngine, CueOptions, PlaybackOptions, SlotKind};
use crate::config::SoundManifest;
use crate::error::SoundError;

/// Which enabled flag gates a playback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Effects,
    Slot(SlotKind),
}

struct RegistryState {
    sounds_enabled: bool,
    ambience_enabled: bool,
    music_enabled: bool,
    music: Slot,
    ambience: Slot,
    playlist: Playlist,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            sounds_enabled: true,
            ambience_enabled: true,
            music_enabled: true,
            music: Slot::new(SlotKind::Music),
            ambience: Slot::new(SlotKind::Ambience),
            playlist: Playlist::default(),
        }
    }

    fn enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Effects => self.sounds_enabled,
            Channel::Slot(SlotKind::Music) => self.music_enabled,
            Channel::Slot(SlotKind::Ambience) => self.ambience_enabled,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut Slot {
        match kind {
            SlotKind::Music => &mut self.music,
            SlotKind::Ambience => &mut self.ambience,
        }
    }
}

struct Shared {
    engine: Arc<dyn AudioEngine>,
    sounds: HashMap<String, Playable>,
    music: HashMap<String, Playable>,
    random: Mutex<Box<dyn RandomSource>>,
    state: Mutex<RegistryState>,
    scheduler: DelayScheduler,
}

/// Named sound effects, music and ambience on top of an audio engine
///
/// Cloning is cheap and every clone drives the same registry.
#[derive(Clone)]
pub struct SoundRegistry {
    shared: Arc<Shared>,
}

impl SoundRegistry {
    /// Build a registry from the two raw listings
    ///
    /// Sound effect locators are turned into players right away; music
    /// entries are kept as given until played.
    pub fn new<S, M>(engine: Arc<dyn AudioEngine>, sounds: S, music: M) -> Result<Self, SoundError>
    where
        S: IntoIterator<Item = (String, Playable)>,
        M: IntoIterator<Item = (String, Playable)>,
    {
        let mut builder = Self::builder(engine);
        builder.sounds.extend(sounds);
        builder.music.extend(music);
        builder.build()
    }

    pub fn builder(engine: Arc<dyn AudioEngine>) -> SoundRegistryBuilder {
        SoundRegistryBuilder {
            engine,
            sounds: Vec::new(),
            music: Vec::new(),
            random: None,
        }
    }

    /// Build a registry from a loaded manifest
    pub fn from_manifest(
        engine: Arc<dyn AudioEngine>,
        manifest: &SoundManifest,
    ) -> Result<Self, SoundError> {
        Self::new(engine, manifest.sound_listing()?, manifest.music_listing()?)
    }

    /// Fire a sound effect
    ///
    /// With a delay the cue fires later on its own thread; errors from that
    /// thread are logged since there is no caller left to receive them.
    pub fn play(&self, name: &str, cue: &CueOptions) -> Result<(), SoundError> {
        if !self.sounds_enabled() {
            return Ok(());
        }

        let Some(playable) = self.shared.sounds.get(name).cloned() else {
            if cue.warn_missing {
                tracing::warn!("No sound found for {}", name);
            }
            return Ok(());
        };

        match cue.effective_delay() {
            Some(delay) => {
                let registry = self.clone();
                let name = name.to_string();
                let chance = cue.random;
                tracing::debug!("Delaying sound {} by {:?}", name, delay);

                self.shared.scheduler.schedule(delay, move || {
                    if !registry.sounds_enabled() {
                        return;
                    }
                    if let Err(e) = registry.fire_cue(&playable, &name, chance) {
                        tracing::warn!("Delayed sound {} failed: {}", name, e);
                    }
                });
                Ok(())
            }
            None => self.fire_cue(&playable, name, cue.random),
        }
    }

    fn fire_cue(&self, playable: &Playable, name: &str, chance: Option<f64>) -> Result<(), SoundError> {
        if let Some(p) = chance {
            if !self.shared.random.lock().chance(p) {
                tracing::debug!("Skipped sound {} (chance {})", name, p);
                return Ok(());
            }
        }

        self.dispatch(playable, name, &PlaybackOptions::none(), Channel::Effects)
            .map(|_| ())
    }

    /// Start a music track, stopping the previous one
    pub fn play_music(&self, name: &str, options: &PlaybackOptions) -> Result<StopHandle, SoundError> {
        self.play_slot(SlotKind::Music, name, options)
    }

    /// Start an ambience track, stopping the previous one
    pub fn play_ambience(
        &self,
        name: &str,
        options: &PlaybackOptions,
    ) -> Result<StopHandle, SoundError> {
        self.play_slot(SlotKind::Ambience, name, options)
    }

    fn play_slot(
        &self,
        kind: SlotKind,
        name: &str,
        options: &PlaybackOptions,
    ) -> Result<StopHandle, SoundError> {
        let channel = Channel::Slot(kind);
        if !self.shared.state.lock().enabled(channel) {
            return Ok(StopHandle::noop());
        }

        let Some(playable) = self.shared.music.get(name) else {
            tracing::warn!("No {} found for {}", kind.to_string().to_lowercase(), name);
            return Ok(StopHandle::noop());
        };

        let (previous, generation) = {
            let mut state = self.shared.state.lock();
            if !state.enabled(channel) {
                return Ok(StopHandle::noop());
            }
            state.slot_mut(kind).begin()
        };
        previous.stop();

        let options = options.or_defaults(&kind.default_options());
        tracing::debug!("Starting {} {} ({})", kind, name, playable.kind());
        let started = self.dispatch(playable, name, &options, channel)?;

        // A stop, toggle or newer start may have landed while dispatching
        let outcome = {
            let mut state = self.shared.state.lock();
            if state.enabled(channel) {
                state.slot_mut(kind).finish(generation, started)
            } else {
                StartOutcome::Superseded(started.unwrap_or_default())
            }
        };

        match outcome {
            StartOutcome::Started(handle) => Ok(handle),
            StartOutcome::Superseded(handle) => {
                handle.stop();
                Ok(StopHandle::noop())
            }
        }
    }

    /// Resolve a playable and start it
    fn dispatch(
        &self,
        playable: &Playable,
        name: &str,
        options: &PlaybackOptions,
        channel: Channel,
    ) -> Result<Option<StopHandle>, SoundError> {
        match playable {
            Playable::Generator(generator) => Ok(generator.call(name)),
            Playable::Choice(items) => {
                if items.is_empty() {
                    tracing::debug!("Empty choice for {}", name);
                    return Ok(None);
                }
                let picked = self.shared.random.lock().pick(items.len());
                // options are not carried into the picked entry
                self.dispatch(&items[picked], name, &PlaybackOptions::none(), channel)
            }
            Playable::Handle(player) => {
                player.play()?;
                Ok(Some(StopHandle::for_player(Arc::clone(player))))
            }
            Playable::Source(locator) => {
                if !self.shared.state.lock().enabled(channel) {
                    return Ok(None);
                }
                let player = self.shared.engine.create_player(locator, options)?;
                player.play()?;
                Ok(Some(StopHandle::for_player(player)))
            }
        }
    }

    /// Play a bare locator through the engine, gated by the sounds flag
    pub fn play_handle(&self, locator: &str, options: &PlaybackOptions) -> Result<StopHandle, SoundError> {
        let started = self.dispatch(
            &Playable::source(locator),
            locator,
            options,
            Channel::Effects,
        )?;
        Ok(started.unwrap_or_default())
    }

    /// Replace the playlist and start its first entry
    pub fn play_list<S: AsRef<str>>(
        &self,
        names: &[S],
        common: &PlaybackOptions,
        per_index: &[Option<PlaybackOptions>],
    ) -> Result<StopHandle, SoundError> {
        self.shared.state.lock().playlist = Playlist::new(names, common, per_index);
        self.play_next(Some(0))
    }

    /// Jump to `index`, or advance by one, and play that entry as music
    pub fn play_next(&self, index: Option<usize>) -> Result<StopHandle, SoundError> {
        let entry = self.shared.state.lock().playlist.advance(index)?.clone();
        tracing::debug!("Playlist advanced to {}", entry.name);
        self.play_music(&entry.name, &entry.options)
    }

    pub fn stop_music(&self) {
        self.stop_slot(SlotKind::Music);
    }

    pub fn stop_ambience(&self) {
        self.stop_slot(SlotKind::Ambience);
    }

    fn stop_slot(&self, kind: SlotKind) {
        let handle = self.shared.state.lock().slot_mut(kind).take();
        handle.stop();
    }

    /// Gate sound effects and ambience together
    ///
    /// Turning off stops the ambience slot and cancels pending delayed cues.
    pub fn turn_sounds_on(&self, on: bool) {
        {
            let mut state = self.shared.state.lock();
            state.sounds_enabled = on;
            state.ambience_enabled = on;
        }
        if !on {
            self.shared.scheduler.cancel_all();
            self.stop_ambience();
        }
        tracing::debug!("Sounds {}", if on { "on" } else { "off" });
    }

    pub fn turn_sounds_off(&self, off: bool) {
        self.turn_sounds_on(!off);
    }

    /// Gate sound effects only
    pub fn turn_effects_on(&self, on: bool) {
        self.shared.state.lock().sounds_enabled = on;
        if !on {
            self.shared.scheduler.cancel_all();
        }
    }

    pub fn turn_effects_off(&self, off: bool) {
        self.turn_effects_on(!off);
    }

    /// Gate ambience only
    pub fn turn_ambience_on(&self, on: bool) {
        self.shared.state.lock().ambience_enabled = on;
        if !on {
            self.stop_ambience();
        }
    }

    pub fn turn_ambience_off(&self, off: bool) {
        self.turn_ambience_on(!off);
    }

    pub fn turn_music_on(&self, on: bool) {
        self.shared.state.lock().music_enabled = on;
        if !on {
            self.stop_music();
        }
        tracing::debug!("Music {}", if on { "on" } else { "off" });
    }

    pub fn turn_music_off(&self, off: bool) {
        self.turn_music_on(!off);
    }

    pub fn sounds_enabled(&self) -> bool {
        self.shared.state.lock().sounds_enabled
    }

    pub fn music_enabled(&self) -> bool {
        self.shared.state.lock().music_enabled
    }

    pub fn ambience_enabled(&self) -> bool {
        self.shared.state.lock().ambience_enabled
    }

    pub fn is_music_playing(&self) -> bool {
        self.shared.state.lock().music.is_playing()
    }

    pub fn is_ambience_playing(&self) -> bool {
        self.shared.state.lock().ambience.is_playing()
    }

    pub fn playlist_index(&self) -> usize {
        self.shared.state.lock().playlist.index()
    }

    pub fn playlist_len(&self) -> usize {
        self.shared.state.lock().playlist.len()
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.shared.sounds.contains_key(name)
    }

    pub fn has_music(&self, name: &str) -> bool {
        self.shared.music.contains_key(name)
    }

    /// Delayed cues that have neither fired nor been cancelled
    pub fn pending_cues(&self) -> usize {
        self.shared.scheduler.pending()
    }
}

pub struct SoundRegistryBuilder {
    engine: Arc<dyn AudioEngine>,
    sounds: Vec<(String, Playable)>,
    music: Vec<(String, Playable)>,
    random: Option<Box<dyn RandomSource>>,
}

impl SoundRegistryBuilder {
    pub fn sound(mut self, name: impl Into<String>, playable: impl Into<Playable>) -> Self {
        self.sounds.push((name.into(), playable.into()));
        self
    }

    pub fn music(mut self, name: impl Into<String>, playable: impl Into<Playable>) -> Self {
        self.music.push((name.into(), playable.into()));
        self
    }

    /// Replace the thread RNG, e.g. with a seeded one
    pub fn random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    pub fn build(self) -> Result<SoundRegistry, SoundError> {
        let mut sounds = HashMap::with_capacity(self.sounds.len());
        for (name, entry) in self.sounds {
            let normalized = normalize_sound(self.engine.as_ref(), entry)?;
            sounds.insert(name, normalized);
        }
        tracing::info!(
            "Sound registry ready: {} sounds, {} music tracks",
            sounds.len(),
            self.music.len()
        );

        Ok(SoundRegistry {
            shared: Arc::new(Shared {
                engine: self.engine,
                sounds,
                music: self.music.into_iter().collect(),
                random: Mutex::new(self.random.unwrap_or_else(|| Box::new(ThreadRandom))),
                state: Mutex::new(RegistryState::new()),
                scheduler: DelayScheduler::default(),
            }),
        })
    }
}

/// Turn sound effect locators into players, one level deep into choices
fn normalize_sound(engine: &dyn AudioEngine, entry: Playable) -> Result<Playable, SoundError> {
    let to_player = |entry: Playable| -> Result<Playable, SoundError> {
        match entry {
            Playable::Source(locator) => Ok(Playable::Handle(
                engine.create_player(&locator, &PlaybackOptions::none())?,
            )),
            other => Ok(other),
        }
    };

    match entry {
        Playable::Choice(items) => Ok(Playable::Choice(
            items.into_iter().map(&to_player).collect::<Result<_, _>>()?,
        )),
        other => to_player(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::{PlayerHandle, SilentEngine};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingEngine {
        created: AtomicUsize,
    }

    struct NullPlayer;

    impl PlayerHandle for NullPlayer {
        fn play(&self) -> Result<(), SoundError> {
            Ok(())
        }

        fn stop(&self) {}
    }

    impl AudioEngine for CountingEngine {
        fn create_player(
            &self,
            _locator: &str,
            _options: &PlaybackOptions,
        ) -> Result<Arc<dyn PlayerHandle>, SoundError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NullPlayer))
        }
    }

    #[test]
    fn test_sounds_are_normalized_eagerly() {
        let engine = Arc::new(CountingEngine::default());
        let registry = SoundRegistry::builder(engine.clone())
            .sound("click", "click.mp3")
            .sound("step", vec!["step1.mp3", "step2.mp3"])
            .music("theme", "theme.ogg")
            .build()
            .unwrap();

        assert_eq!(engine.created.load(Ordering::SeqCst), 3);
        assert!(registry.has_sound("click"));
        assert!(registry.has_music("theme"));
        assert!(!registry.has_music("click"));
    }

    #[test]
    fn test_nested_choices_are_left_lazy() {
        let engine = CountingEngine::default();
        let nested = Playable::choice([Playable::source("a.mp3"), vec!["b.mp3", "c.mp3"].into()]);

        let normalized = normalize_sound(&engine, nested).unwrap();
        assert_eq!(engine.created.load(Ordering::SeqCst), 1);
        match normalized {
            Playable::Choice(items) => {
                assert_eq!(items[0].kind(), "handle");
                assert_eq!(items[1].kind(), "choice");
            }
            other => panic!("expected choice, got {:?}", other),
        }
    }

    #[test]
    fn test_default_flags() {
        let registry = SoundRegistry::builder(Arc::new(SilentEngine::new())).build().unwrap();
        assert!(registry.sounds_enabled());
        assert!(registry.music_enabled());
        assert!(registry.ambience_enabled());
        assert!(!registry.is_music_playing());
        assert_eq!(registry.playlist_len(), 0);
    }

    #[test]
    fn test_sounds_toggle_also_gates_ambience() {
        let registry = SoundRegistry::builder(Arc::new(SilentEngine::new())).build().unwrap();

        registry.turn_sounds_off(true);
        assert!(!registry.sounds_enabled());
        assert!(!registry.ambience_enabled());
        assert!(registry.music_enabled());

        registry.turn_sounds_on(true);
        registry.turn_effects_off(true);
        assert!(!registry.sounds_enabled());
        assert!(registry.ambience_enabled());
    }

    #[test]
    fn test_empty_choice_plays_nothing() {
        let registry = SoundRegistry::builder(Arc::new(SilentEngine::new()))
            .music("nothing", Playable::choice(Vec::new()))
            .build()
            .unwrap();

        let handle = registry.play_music("nothing", &PlaybackOptions::none()).unwrap();
        assert!(handle.is_noop());
        assert!(!registry.is_music_playing());
    }
}
