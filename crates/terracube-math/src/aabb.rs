use glam::{IVec3, Vec3};

/// Axis-aligned bounding box in world block units.
///
/// Invariant: `min <= max` on every axis. The constructor enforces this by
/// swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from two corners, sorting components so that
    /// `min <= max` on every axis.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB spanning `min .. min + size`.
    pub fn from_min_size(min: Vec3, size: Vec3) -> Self {
        Self::new(min, min + size)
    }

    /// The unit cube occupied by the block at `pos`.
    pub fn block(pos: IVec3) -> Self {
        let min = pos.as_vec3();
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Returns true if the volumes strictly overlap.
    ///
    /// Boxes that only share a face, edge, or corner do not intersect, so an
    /// entity resting on a block or sliding along a wall is not colliding.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Returns this box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns the smallest AABB enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
