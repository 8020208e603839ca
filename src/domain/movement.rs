/// Axis-separated movement resolution against static colliders.
///
/// Both actor archetypes share one collision footprint: a small box
/// anchored at the feet, offset down from the sprite center so bodies
/// overlap visually while feet collide. `(x, y)` everywhere in the
/// simulation is the sprite center, never the box corner.
///
/// ## Resolution order
///
/// X is resolved fully first, then Y using the already-resolved X.
/// Each axis clamps to the collider edge nearest the direction of
/// travel. Overlapping colliders re-clamp in sequence, so with several
/// candidates the last one applied wins; no geometric minimum is
/// computed. Because the Y pass sees the corrected X, a diagonal step
/// can never cut through a corner.

use super::geometry::Rect;

/// Collision footprint shared by player and enemy.
pub const COLLIDER_W: f32 = 16.0;
pub const COLLIDER_H: f32 = 10.0;
/// Vertical distance from sprite center down to the feet line.
pub const FOOT_OFFSET_Y: f32 = 24.0;

/// Collision box for an actor whose sprite center is at (x, y).
#[inline]
pub fn collision_box(x: f32, y: f32) -> Rect {
    Rect {
        x: x - COLLIDER_W / 2.0,
        y: y + FOOT_OFFSET_Y - COLLIDER_H,
        w: COLLIDER_W,
        h: COLLIDER_H,
    }
}

/// Resolve a proposed per-tick displacement (dx, dy) for an actor
/// centered at (x, y). Returns the corrected center position; the
/// collision box at the result overlaps no static collider.
pub fn resolve_move(x: f32, y: f32, dx: f32, dy: f32, colliders: &[Rect]) -> (f32, f32) {
    // ── X axis ──
    let mut new_x = x + dx;
    let mut col_x = new_x - COLLIDER_W / 2.0;
    let col_y = y + FOOT_OFFSET_Y - COLLIDER_H;
    for c in colliders {
        if c.intersects(col_x, col_y, COLLIDER_W, COLLIDER_H) {
            if dx > 0.0 {
                new_x = c.x - COLLIDER_W / 2.0;
            } else if dx < 0.0 {
                new_x = c.x + c.w + COLLIDER_W / 2.0;
            }
            col_x = new_x - COLLIDER_W / 2.0;
        }
    }

    // ── Y axis (with resolved X) ──
    let mut new_y = y + dy;
    let col_x = new_x - COLLIDER_W / 2.0;
    let mut col_y = new_y + FOOT_OFFSET_Y - COLLIDER_H;
    for c in colliders {
        if c.intersects(col_x, col_y, COLLIDER_W, COLLIDER_H) {
            if dy > 0.0 {
                new_y = c.y - FOOT_OFFSET_Y;
            } else if dy < 0.0 {
                new_y = c.y + c.h - FOOT_OFFSET_Y + COLLIDER_H;
            }
            col_y = new_y + FOOT_OFFSET_Y - COLLIDER_H;
        }
    }

    (new_x, new_y)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
