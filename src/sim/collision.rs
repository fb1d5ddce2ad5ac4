//! Axis-aligned bounding box collision
//!
//! Every entity is a rectangle anchored at its top-left corner. Two boxes
//! collide only when they overlap with positive area: boxes that merely
//! share an edge do not.

use glam::Vec2;

/// An axis-aligned rectangle (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }
}

/// Anything with a bounding box
pub trait Bounded {
    fn bounds(&self) -> Aabb;
}

impl Bounded for Aabb {
    fn bounds(&self) -> Aabb {
        *self
    }
}

/// True iff the bounding boxes of `a` and `b` overlap
#[inline]
pub fn is_colliding(a: &impl Bounded, b: &impl Bounded) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Clamp a box's position so it stays inside `[0, area]`
pub fn clamp_into(pos: Vec2, size: Vec2, area: Vec2) -> Vec2 {
    let max = (area - size).max(Vec2::ZERO);
    pos.clamp(Vec2::ZERO, max)
}
