/// Rodio-backed audio engine
///
/// Locators are file paths, resolved against an optional base directory.
/// File contents are preloaded into memory once per path and shared by every
/// player built from that path.
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::engine::{AudioEngine, PlayerHandle};
use super::options::PlaybackOptions;
use crate::error::SoundError;

/// Owns the output stream; dropping it silences every player
pub struct AudioOutput {
    _stream: OutputStream,
    engine: Arc<RodioEngine>,
}

impl AudioOutput {
    /// Open the default output device
    pub fn try_default(base_dir: Option<PathBuf>) -> Result<Self, SoundError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| SoundError::StreamInitFailed(Box::new(e)))?;

        Ok(Self {
            _stream: stream,
            engine: Arc::new(RodioEngine::new(stream_handle, base_dir)),
        })
    }

    pub fn engine(&self) -> Arc<RodioEngine> {
        Arc::clone(&self.engine)
    }
}

/// Engine creating one rodio sink per started player
pub struct RodioEngine {
    stream_handle: OutputStreamHandle,
    base_dir: Option<PathBuf>,
    cache: Mutex<HashMap<PathBuf, Arc<Vec<u8>>>>,
}

impl RodioEngine {
    pub fn new(stream_handle: OutputStreamHandle, base_dir: Option<PathBuf>) -> Self {
        Self {
            stream_handle,
            base_dir,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        resolve_locator(self.base_dir.as_deref(), locator)
    }

    /// Read audio data into memory, once per path
    fn load(&self, path: &Path) -> Result<Arc<Vec<u8>>, SoundError> {
        if let Some(data) = self.cache.lock().get(path) {
            return Ok(Arc::clone(data));
        }

        let audio_data = std::fs::read(path).map_err(|e| SoundError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        tracing::info!("Loaded audio {} ({} bytes)", path.display(), audio_data.len());

        // Verify the audio can be decoded before anyone tries to play it
        Decoder::new(Cursor::new(audio_data.clone()))
            .map_err(|e| SoundError::DecodeFailed(Box::new(e)))?;

        let data = Arc::new(audio_data);
        self.cache.lock().insert(path.to_path_buf(), Arc::clone(&data));
        Ok(data)
    }
}

impl AudioEngine for RodioEngine {
    fn create_player(
        &self,
        locator: &str,
        options: &PlaybackOptions,
    ) -> Result<Arc<dyn PlayerHandle>, SoundError> {
        let path = self.resolve(locator);
        let audio_data = self.load(&path)?;

        tracing::debug!(
            "Created player for {}: loop={}, volume={}, rate={}",
            locator,
            options.is_looping(),
            options.effective_volume(),
            options.effective_rate()
        );

        Ok(Arc::new(RodioPlayer {
            locator: locator.to_string(),
            stream_handle: self.stream_handle.clone(),
            audio_data,
            options: *options,
            sinks: Mutex::new(SinkSet::default()),
        }))
    }
}

/// Join relative locators onto `base_dir`
pub fn resolve_locator(base_dir: Option<&Path>, locator: &str) -> PathBuf {
    let path = Path::new(locator);
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Sinks started by one player
///
/// Repeated plays layer on top of each other, so a sound effect fired twice
/// in a row is heard twice. Sinks that finished are dropped on the next push.
#[derive(Default)]
struct SinkSet {
    sinks: Vec<Sink>,
}

impl SinkSet {
    fn push(&mut self, sink: Sink) {
        self.sinks.retain(|s| !s.empty());
        self.sinks.push(sink);
    }

    /// Stop every sink; returns how many were still held
    fn stop_all(&mut self) -> usize {
        let count = self.sinks.len();
        for sink in self.sinks.drain(..) {
            sink.stop();
        }
        count
    }

    fn len(&self) -> usize {
        self.sinks.len()
    }
}

/// Player for one preloaded file
pub struct RodioPlayer {
    locator: String,
    stream_handle: OutputStreamHandle,
    audio_data: Arc<Vec<u8>>,
    options: PlaybackOptions,
    sinks: Mutex<SinkSet>,
}

impl PlayerHandle for RodioPlayer {
    fn play(&self) -> Result<(), SoundError> {
        tracing::debug!("Playing audio: {}", self.locator);

        // Note: We must clone here as rodio's Decoder requires owned data with 'static lifetime
        let cursor = Cursor::new((*self.audio_data).clone());
        let decoder = Decoder::new(cursor).map_err(|e| SoundError::DecodeFailed(Box::new(e)))?;

        // Each transformation returns a different type, so we use dynamic dispatch
        let mut source: Box<dyn Source<Item = i16> + Send> = Box::new(decoder);

        let rate = self.options.effective_rate();
        if rate > 0.0 && (rate - 1.0).abs() > f32::EPSILON {
            source = Box::new(source.speed(rate));
        }

        if self.options.is_looping() {
            source = Box::new(source.repeat_infinite());
        }

        // A stopped sink stays stopped, so every start gets a fresh one
        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|e| SoundError::PlaybackFailed(Box::new(e)))?;
        sink.set_volume(self.options.effective_volume());
        sink.append(source);
        sink.play();

        let mut sinks = self.sinks.lock();
        sinks.push(sink);
        tracing::trace!("{} active sinks for {}", sinks.len(), self.locator);

        Ok(())
    }

    fn stop(&self) {
        let stopped = self.sinks.lock().stop_all();
        if stopped > 0 {
            tracing::debug!("Stopping audio: {} ({} sinks)", self.locator, stopped);
        }
    }
}
