//! Block capabilities: ticking, lifecycle hooks, and placement rules.
//!
//! Callbacks never mutate the world directly. They read through a
//! [`BlockAccess`] view and record follow-up work in a [`BlockCommands`]
//! buffer, which the world applies once the current pass has finished. This
//! keeps chunk indices stable while they are being iterated.

use glam::IVec3;
use tracing::trace;

use crate::block::{BlockPayload, BlockState, BlockType};
use crate::coords::BlockPos;

/// Seconds a sugar cane block waits between growth attempts.
pub const SUGAR_CANE_SECONDS_TO_GROW: f32 = 1.0;

/// Tallest column a sugar cane plant grows to on its own.
pub const SUGAR_CANE_MAX_LENGTH: u32 = 4;

/// Seconds between placing TNT and its self-removal.
pub const TNT_FUSE_SECONDS: f32 = 4.0;

/// Read-only block queries against a world.
///
/// The query is total: unloaded chunks, missing sections, and empty slots all
/// report Air.
pub trait BlockAccess {
    /// The block at `pos`.
    fn block_at(&self, pos: BlockPos) -> BlockState;

    /// The type of the block at `pos`.
    fn block_type_at(&self, pos: BlockPos) -> BlockType {
        self.block_at(pos).block_type
    }
}

/// A deferred world mutation requested by a block callback.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockCommand {
    /// Replace the block at this position with Air.
    Remove(BlockPos),
    /// Place this state at its cached position, subject to its placement rule.
    Add(BlockState),
}

/// Ordered buffer of deferred world mutations.
#[derive(Clone, Debug, Default)]
pub struct BlockCommands {
    commands: Vec<BlockCommand>,
}

impl BlockCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request removal of the block at `pos`.
    pub fn queue_remove(&mut self, pos: BlockPos) {
        self.commands.push(BlockCommand::Remove(pos));
    }

    /// Request placement of `state` at `state.position`.
    pub fn queue_add(&mut self, state: BlockState) {
        self.commands.push(BlockCommand::Add(state));
    }

    /// Appends every command of `other`, preserving order.
    pub fn append(&mut self, other: &mut BlockCommands) {
        self.commands.append(&mut other.commands);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockCommand> {
        self.commands.iter()
    }

    /// Removes and returns all commands in the order they were queued.
    pub fn drain(&mut self) -> std::vec::Drain<'_, BlockCommand> {
        self.commands.drain(..)
    }
}

impl IntoIterator for BlockCommands {
    type Item = BlockCommand;
    type IntoIter = std::vec::IntoIter<BlockCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

impl BlockType {
    /// Periodic update for tickable blocks.
    ///
    /// `state` is a working copy; the caller writes payload changes back once
    /// the whole chunk has been ticked. `dt` is the time since the previous
    /// tick of this block.
    pub fn on_tick(
        self,
        state: &mut BlockState,
        world: &dyn BlockAccess,
        dt: f32,
        commands: &mut BlockCommands,
    ) {
        let pos = state.position;
        match (self, &mut state.payload) {
            (BlockType::SugarCane, BlockPayload::SugarCane { growth_timer }) => {
                *growth_timer += dt;
                if *growth_timer < SUGAR_CANE_SECONDS_TO_GROW {
                    return;
                }
                *growth_timer = 0.0;

                let above = pos + IVec3::Y;
                if world.block_type_at(above).is_air()
                    && cane_length(world, pos) < SUGAR_CANE_MAX_LENGTH
                {
                    trace!("sugar cane at {pos} grows");
                    commands.queue_add(BlockState::new(BlockType::SugarCane, above));
                }
            }
            (BlockType::Tnt, BlockPayload::Tnt { fuse }) => {
                *fuse -= dt;
                if *fuse <= 0.0 {
                    trace!("tnt at {pos} fuse expired");
                    commands.queue_remove(pos);
                }
            }
            _ => {}
        }
    }

    /// Called after `state` has been stored in the world.
    pub fn on_added(
        self,
        state: &BlockState,
        world: &dyn BlockAccess,
        commands: &mut BlockCommands,
    ) {
        if self == BlockType::SugarCane && !self.can_add_block_at(world, state.position) {
            // Unsupported cane breaks on the next drain.
            commands.queue_remove(state.position);
        }
    }

    /// Called after `state` has been replaced by Air.
    ///
    /// Breaking sugar cane breaks the whole stack above it in one drain.
    pub fn on_destroy(
        self,
        state: &BlockState,
        world: &dyn BlockAccess,
        commands: &mut BlockCommands,
    ) {
        if self == BlockType::SugarCane {
            let mut above = state.position + IVec3::Y;
            while world.block_type_at(above) == BlockType::SugarCane {
                commands.queue_remove(above);
                above += IVec3::Y;
            }
        }
    }

    /// Whether a block of this type may be placed at `pos`.
    pub fn can_add_block_at(self, world: &dyn BlockAccess, pos: BlockPos) -> bool {
        match self {
            BlockType::SugarCane => matches!(
                world.block_type_at(pos - IVec3::Y),
                BlockType::Sand | BlockType::Grass | BlockType::Dirt | BlockType::SugarCane
            ),
            _ => true,
        }
    }
}

/// Number of consecutive sugar cane blocks ending at `top`, inclusive.
fn cane_length(world: &dyn BlockAccess, top: BlockPos) -> u32 {
    let mut length = 1;
    let mut pos = top - IVec3::Y;
    while world.block_type_at(pos) == BlockType::SugarCane {
        length += 1;
        pos -= IVec3::Y;
    }
    length
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Minimal in-memory world for exercising callbacks.
    #[derive(Default)]
    struct MapWorld(HashMap<BlockPos, BlockType>);

    impl MapWorld {
        fn with(mut self, pos: BlockPos, block_type: BlockType) -> Self {
            self.0.insert(pos, block_type);
            self
        }
    }

    impl BlockAccess for MapWorld {
        fn block_at(&self, pos: BlockPos) -> BlockState {
            BlockState::new(self.0.get(&pos).copied().unwrap_or_default(), pos)
        }
    }

    #[test]
    fn test_sugar_cane_needs_soil() {
        let base = IVec3::new(0, 10, 0);
        let world = MapWorld::default().with(base - IVec3::Y, BlockType::Sand);
        assert!(BlockType::SugarCane.can_add_block_at(&world, base));

        let world = MapWorld::default().with(base - IVec3::Y, BlockType::Stone);
        assert!(!BlockType::SugarCane.can_add_block_at(&world, base));
        assert!(BlockType::Stone.can_add_block_at(&world, base));
    }

    #[test]
    fn test_sugar_cane_grows_after_timer() {
        let pos = IVec3::new(0, 10, 0);
        let world = MapWorld::default()
            .with(pos - IVec3::Y, BlockType::Grass)
            .with(pos, BlockType::SugarCane);
        let mut state = BlockState::new(BlockType::SugarCane, pos);
        let mut commands = BlockCommands::new();

        BlockType::SugarCane.on_tick(&mut state, &world, 0.5, &mut commands);
        assert!(commands.is_empty(), "no growth before the timer elapses");

        BlockType::SugarCane.on_tick(&mut state, &world, 0.6, &mut commands);
        assert_eq!(
            commands.iter().collect::<Vec<_>>(),
            vec![&BlockCommand::Add(BlockState::new(
                BlockType::SugarCane,
                pos + IVec3::Y
            ))]
        );
        assert_eq!(state.payload, BlockPayload::SugarCane { growth_timer: 0.0 });
    }

    #[test]
    fn test_sugar_cane_stops_at_max_length() {
        let top = IVec3::new(0, 13, 0);
        let mut world = MapWorld::default().with(IVec3::new(0, 9, 0), BlockType::Dirt);
        for y in 10..=13 {
            world = world.with(IVec3::new(0, y, 0), BlockType::SugarCane);
        }
        let mut state = BlockState::new(BlockType::SugarCane, top);
        let mut commands = BlockCommands::new();
        BlockType::SugarCane.on_tick(&mut state, &world, 2.0, &mut commands);
        assert!(commands.is_empty(), "column of {SUGAR_CANE_MAX_LENGTH} must not grow");
    }

    #[test]
    fn test_tnt_queues_self_removal() {
        let pos = IVec3::new(4, 20, 4);
        let world = MapWorld::default().with(pos, BlockType::Tnt);
        let mut state = BlockState::new(BlockType::Tnt, pos);
        let mut commands = BlockCommands::new();

        BlockType::Tnt.on_tick(&mut state, &world, TNT_FUSE_SECONDS - 1.0, &mut commands);
        assert!(commands.is_empty());

        BlockType::Tnt.on_tick(&mut state, &world, 1.0, &mut commands);
        assert_eq!(
            commands.into_iter().collect::<Vec<_>>(),
            vec![BlockCommand::Remove(pos)]
        );
    }

    #[test]
    fn test_destroying_cane_queues_whole_stack_above() {
        let pos = IVec3::new(0, 10, 0);
        let world = MapWorld::default()
            .with(pos + IVec3::Y, BlockType::SugarCane)
            .with(pos + IVec3::Y * 2, BlockType::SugarCane)
            .with(pos + IVec3::Y * 3, BlockType::SugarCane)
            // Separated from the stack by an air gap.
            .with(pos + IVec3::Y * 5, BlockType::SugarCane);
        let mut commands = BlockCommands::new();
        BlockType::SugarCane.on_destroy(
            &BlockState::new(BlockType::SugarCane, pos),
            &world,
            &mut commands,
        );
        assert_eq!(
            commands.into_iter().collect::<Vec<_>>(),
            vec![
                BlockCommand::Remove(pos + IVec3::Y),
                BlockCommand::Remove(pos + IVec3::Y * 2),
                BlockCommand::Remove(pos + IVec3::Y * 3),
            ]
        );
    }

    #[test]
    fn test_unsupported_cane_breaks_when_added() {
        let pos = IVec3::new(0, 10, 0);
        let world = MapWorld::default().with(pos, BlockType::SugarCane);
        let mut commands = BlockCommands::new();
        BlockType::SugarCane.on_added(
            &BlockState::new(BlockType::SugarCane, pos),
            &world,
            &mut commands,
        );
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_commands_preserve_order() {
        let mut a = BlockCommands::new();
        a.queue_remove(IVec3::X);
        let mut b = BlockCommands::new();
        b.queue_add(BlockState::new(BlockType::Stone, IVec3::Y));
        b.queue_remove(IVec3::Z);
        a.append(&mut b);
        assert!(b.is_empty());
        let drained: Vec<_> = a.drain().collect();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0], BlockCommand::Remove(IVec3::X));
        assert_eq!(drained[2], BlockCommand::Remove(IVec3::Z));
        assert!(a.is_empty());
    }
}
