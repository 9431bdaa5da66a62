/// Exclusive playback slot
///
/// A slot holds at most one active stop handle. The handle is a no-op while
/// idle, so stopping an idle slot is always safe.
///
/// Starting a track is split in two: `begin` detaches the previous handle and
/// hands out a generation, `finish` stores the new handle only if no other
/// start or stop happened in between. A superseded start gets its handle back
/// so the caller can stop it.
use super::playable::StopHandle;
use crate::audio_system::SlotKind;

/// State of a slot
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SlotState {
    /// Nothing started through this slot
    #[default]
    Idle,

    /// A track was started and not stopped since
    Playing,
}

/// Result of `Slot::finish`
#[derive(Debug)]
pub enum StartOutcome {
    /// The handle now owns the slot
    Started(StopHandle),

    /// Another start or stop came first; the handle was not stored
    Superseded(StopHandle),
}

#[derive(Debug)]
pub struct Slot {
    kind: SlotKind,
    state: SlotState,
    stop: StopHandle,
    generation: u64,
}

impl Slot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            state: SlotState::Idle,
            stop: StopHandle::noop(),
            generation: 0,
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SlotState::Playing
    }

    /// Detach the current handle, leaving the slot idle
    ///
    /// Any start still in flight is superseded. The caller invokes the
    /// returned handle outside any lock.
    pub fn take(&mut self) -> StopHandle {
        self.generation = self.generation.wrapping_add(1);
        self.state = SlotState::Idle;
        std::mem::take(&mut self.stop)
    }

    /// Claim the slot for a new track
    ///
    /// Returns the previous handle to stop and the generation to pass to
    /// `finish`.
    pub fn begin(&mut self) -> (StopHandle, u64) {
        let previous = self.take();
        (previous, self.generation)
    }

    /// Store the handle of a track started under `generation`
    pub fn finish(&mut self, generation: u64, handle: Option<StopHandle>) -> StartOutcome {
        let handle = handle.unwrap_or_default();
        if generation != self.generation {
            tracing::debug!("{} start superseded", self.kind);
            return StartOutcome::Superseded(handle);
        }

        self.state = if handle.is_noop() {
            SlotState::Idle
        } else {
            SlotState::Playing
        };
        self.stop = handle.clone();
        tracing::debug!("{} slot is now {:?}", self.kind, self.state);
        StartOutcome::Started(handle)
    }
}
