//! Storage error types.

use crate::coords::BUILD_HEIGHT;

/// Errors raised by section and chunk storage operations.
///
/// Both variants indicate a caller bug: the world validates positions and
/// routes Air through the removal path before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoxelError {
    /// A chunk operation addressed a Y coordinate outside `[0, BUILD_HEIGHT)`.
    #[error("y = {y} is outside the build height [0, {BUILD_HEIGHT})")]
    OutsideBuildHeight { y: i32 },

    /// Air was passed to an add operation. Use removal instead.
    #[error("air cannot be stored explicitly")]
    AirPlacement,
}
