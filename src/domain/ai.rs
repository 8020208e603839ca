/// Warrior AI — radius-gated chase with a stop-and-swing rule.
///
/// Three outcomes each tick:
///   1. **Hold** — player outside aggro range, or in reach but the
///      swing cooldown has not expired.
///   2. **Chase** — player inside aggro range but outside stop range:
///      move straight at them.
///   3. **Attack** — player inside stop range with the cooldown spent.
///
/// Distances compare squared against squared radii; both bounds are
/// inclusive. Decisions are pure so the gating tests without a world.

use super::entity::Facing;

/// What the warrior wants this tick. Chase carries a unit direction;
/// the caller scales it by chase speed and dt.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AiDecision {
    Hold,
    Chase { dx: f32, dy: f32 },
    Attack,
}

/// Decide from the vector `(vx, vy)` pointing at the player.
pub fn decide(
    vx: f32,
    vy: f32,
    aggro_radius: f32,
    stop_radius: f32,
    cooldown_ready: bool,
) -> AiDecision {
    let dist_sq = vx * vx + vy * vy;
    let in_aggro = dist_sq <= aggro_radius * aggro_radius;
    let in_stop = dist_sq <= stop_radius * stop_radius;

    if in_aggro && in_stop {
        if cooldown_ready {
            return AiDecision::Attack;
        }
        return AiDecision::Hold;
    }
    if in_aggro {
        let len = dist_sq.sqrt();
        if len < 1e-4 {
            return AiDecision::Hold;
        }
        return AiDecision::Chase { dx: vx / len, dy: vy / len };
    }
    AiDecision::Hold
}

/// Horizontal-dominant facing: ties go to the horizontal axis, and a
/// vertical-dominant vector leaves the current facing alone. The
/// warrior keeps tracking the player with this even mid-swing.
#[inline]
pub fn face_toward(facing: Facing, vx: f32, vy: f32) -> Facing {
    if vx.abs() >= vy.abs() {
        if vx < 0.0 { Facing::Left } else { Facing::Right }
    } else {
        facing
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const AGGRO: f32 = 220.0;
    const STOP: f32 = 44.0;

    // ── gating ──

    #[test]
    fn far_player_is_ignored() {
        assert_eq!(decide(300.0, 0.0, AGGRO, STOP, true), AiDecision::Hold);
    }

    #[test]
    fn aggro_boundary_is_inclusive() {
        assert!(matches!(decide(220.0, 0.0, AGGRO, STOP, true), AiDecision::Chase { .. }));
        assert_eq!(decide(220.1, 0.0, AGGRO, STOP, true), AiDecision::Hold);
    }

    #[test]
    fn stop_boundary_is_inclusive() {
        assert_eq!(decide(44.0, 0.0, AGGRO, STOP, true), AiDecision::Attack);
        assert!(matches!(decide(44.1, 0.0, AGGRO, STOP, true), AiDecision::Chase { .. }));
    }

    #[test]
    fn in_reach_without_cooldown_holds() {
        assert_eq!(decide(30.0, 0.0, AGGRO, STOP, false), AiDecision::Hold);
    }

    #[test]
    fn overlapping_player_never_chases() {
        assert_eq!(decide(0.0, 0.0, AGGRO, STOP, false), AiDecision::Hold);
        assert_eq!(decide(0.0, 0.0, AGGRO, STOP, true), AiDecision::Attack);
    }

    // ── chase vector ──

    #[test]
    fn chase_direction_is_unit_length() {
        match decide(30.0, 40.0, AGGRO, STOP, true) {
            AiDecision::Chase { dx, dy } => {
                assert!((dx - 0.6).abs() < 1e-6);
                assert!((dy - 0.8).abs() < 1e-6);
            }
            other => panic!("expected chase, got {:?}", other),
        }
    }

    #[test]
    fn chase_points_at_the_player() {
        match decide(-100.0, 0.0, AGGRO, STOP, true) {
            AiDecision::Chase { dx, dy } => {
                assert_eq!((dx, dy), (-1.0, 0.0));
            }
            other => panic!("expected chase, got {:?}", other),
        }
    }

    // ── facing ──

    #[test]
    fn facing_follows_horizontal_dominance() {
        assert_eq!(face_toward(Facing::Right, -5.0, 2.0), Facing::Left);
        assert_eq!(face_toward(Facing::Left, 5.0, 2.0), Facing::Right);
    }

    #[test]
    fn horizontal_tie_still_updates_facing() {
        assert_eq!(face_toward(Facing::Right, -3.0, 3.0), Facing::Left);
    }

    #[test]
    fn vertical_dominance_keeps_current_facing() {
        assert_eq!(face_toward(Facing::Left, 1.0, -5.0), Facing::Left);
        assert_eq!(face_toward(Facing::Right, -1.0, 5.0), Facing::Right);
    }
}
