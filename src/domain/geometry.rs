/// Axis-aligned rectangles: static colliders, hurtboxes, attack hitboxes.
///
/// One overlap predicate used everywhere: strict open-interval overlap.
/// Touching edges do NOT count as intersecting, so an actor clamped
/// flush against a wall (at `wall.x - half_width`) is not colliding,
/// and a hitbox grazing the edge of a hurtbox deals nothing.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Validated constructor for load boundaries (arena files).
    /// Hot paths build literals from already-validated constants instead.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Rect, String> {
        if !x.is_finite() || !y.is_finite() || !w.is_finite() || !h.is_finite() {
            return Err(format!("rect with non-finite component: ({}, {}, {}, {})", x, y, w, h));
        }
        if w <= 0.0 || h <= 0.0 {
            return Err(format!("rect with non-positive size: {}x{}", w, h));
        }
        Ok(Rect { x, y, w, h })
    }

    /// Strict overlap against an explicit box. Touching edges don't count.
    #[inline]
    pub fn intersects(&self, ox: f32, oy: f32, ow: f32, oh: f32) -> bool {
        self.x < ox + ow && self.x + self.w > ox
            && self.y < oy + oh && self.y + self.h > oy
    }

    /// Strict overlap against another rect.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersects(other.x, other.y, other.w, other.h)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
