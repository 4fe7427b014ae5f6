//! World change notifications.
//!
//! The world emits a [`WorldEvent`] for every accepted block placement
//! (including placements of Air, i.e. removals) and every chunk that becomes
//! loaded. Consumers such as mesh builders read them from a
//! [`WorldEventBuffer`], which is double-buffered per frame.

use crate::block::BlockState;
use crate::coords::ChunkPos;

#[derive(Clone, Debug, PartialEq)]
pub enum WorldEvent {
    /// A block changed. `new` is Air for removals.
    BlockPlaced {
        chunk: ChunkPos,
        old: BlockState,
        new: BlockState,
    },
    /// A chunk was generated or inserted into the world.
    ChunkLoaded { chunk: ChunkPos },
}

impl WorldEvent {
    /// The chunk the event concerns.
    pub fn chunk(&self) -> ChunkPos {
        match self {
            WorldEvent::BlockPlaced { chunk, .. } | WorldEvent::ChunkLoaded { chunk } => *chunk,
        }
    }
}

/// Double-buffered event storage.
///
/// Events written in the current frame are readable in the current and next
/// frame. After two [`swap`](WorldEventBuffer::swap) calls they are dropped.
#[derive(Debug, Default)]
pub struct WorldEventBuffer {
    prev: Vec<WorldEvent>,
    current: Vec<WorldEvent>,
}

impl WorldEventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, event: WorldEvent) {
        self.current.push(event);
    }

    /// All readable events, oldest first.
    pub fn read(&self) -> impl Iterator<Item = &WorldEvent> {
        self.prev.iter().chain(self.current.iter())
    }

    pub fn len(&self) -> usize {
        self.prev.len() + self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Advances the frame: previous events are dropped, current becomes
    /// previous. Call once per frame.
    pub fn swap(&mut self) {
        self.prev.clear();
        std::mem::swap(&mut self.prev, &mut self.current);
    }

    pub fn clear(&mut self) {
        self.prev.clear();
        self.current.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
