/// Registry entries and the stop handles playback hands back
use std::fmt;
use std::sync::Arc;

use crate::audio_system::PlayerHandle;

/// Zero-argument callable that halts a previously started playback
///
/// Cloning shares the same underlying callable. The no-op handle stands in
/// wherever nothing is playing, so "nothing to stop" never needs a special
/// case.
#[derive(Clone)]
pub struct StopHandle {
    stop: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl StopHandle {
    pub fn noop() -> Self {
        Self { stop: None }
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            stop: Some(Arc::new(f)),
        }
    }

    /// Handle that stops `player`
    pub fn for_player(player: Arc<dyn PlayerHandle>) -> Self {
        Self::from_fn(move || player.stop())
    }

    pub fn stop(&self) {
        if let Some(stop) = &self.stop {
            stop();
        }
    }

    pub fn is_noop(&self) -> bool {
        self.stop.is_none()
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noop() {
            f.write_str("StopHandle(noop)")
        } else {
            f.write_str("StopHandle(..)")
        }
    }
}

/// Custom playback logic; invoked with the entry's name and expected to start
/// playback itself
#[derive(Clone)]
pub struct Generator(Arc<dyn Fn(&str) -> Option<StopHandle> + Send + Sync>);

impl Generator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<StopHandle> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, name: &str) -> Option<StopHandle> {
        (self.0)(name)
    }
}

/// One registry entry
///
/// `Choice` is resolved to one element per play. Nesting must bottom out in
/// a concrete entry; resolution recurses as deep as the structure goes.
#[derive(Clone)]
pub enum Playable {
    /// Locator resolved into a player on demand
    Source(String),

    /// Already constructed player
    Handle(Arc<dyn PlayerHandle>),

    /// Custom playback callback
    Generator(Generator),

    /// Uniform random pick among the elements
    Choice(Vec<Playable>),
}

impl Playable {
    pub fn source(locator: impl Into<String>) -> Self {
        Playable::Source(locator.into())
    }

    pub fn handle(player: Arc<dyn PlayerHandle>) -> Self {
        Playable::Handle(player)
    }

    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&str) -> Option<StopHandle> + Send + Sync + 'static,
    {
        Playable::Generator(Generator::new(f))
    }

    pub fn choice(options: impl IntoIterator<Item = Playable>) -> Self {
        Playable::Choice(options.into_iter().collect())
    }

    /// Short description for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Playable::Source(_) => "source",
            Playable::Handle(_) => "handle",
            Playable::Generator(_) => "generator",
            Playable::Choice(_) => "choice",
        }
    }
}

impl From<&str> for Playable {
    fn from(locator: &str) -> Self {
        Playable::Source(locator.to_string())
    }
}

impl From<String> for Playable {
    fn from(locator: String) -> Self {
        Playable::Source(locator)
    }
}

impl<T: Into<Playable>> From<Vec<T>> for Playable {
    fn from(items: Vec<T>) -> Self {
        Playable::Choice(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for Playable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Playable::Source(locator) => f.debug_tuple("Source").field(locator).finish(),
            Playable::Handle(_) => f.write_str("Handle(..)"),
            Playable::Generator(_) => f.write_str("Generator(..)"),
            Playable::Choice(items) => f.debug_tuple("Choice").field(items).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_noop_handle() {
        let handle = StopHandle::noop();
        assert!(handle.is_noop());
        handle.stop();
        assert_eq!(format!("{:?}", handle), "StopHandle(noop)");
    }

    #[test]
    fn test_clones_share_callable() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let handle = StopHandle::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let copy = handle.clone();
        handle.stop();
        copy.stop();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!copy.is_noop());
    }

    #[test]
    fn test_generator_receives_name() {
        let generator = Generator::new(|name| {
            assert_eq!(name, "thunder");
            None
        });
        assert!(generator.call("thunder").is_none());
    }

    #[test]
    fn test_conversions() {
        let single: Playable = "click.mp3".into();
        assert_eq!(single.kind(), "source");

        let choice: Playable = vec!["a.mp3", "b.mp3"].into();
        match choice {
            Playable::Choice(items) => assert_eq!(items.len(), 2),
            other => panic!("expected choice, got {:?}", other),
        }
    }
}
