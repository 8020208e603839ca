/// Actors: the player and the enemy warrior. Both carry the same
/// combat core; they differ in where intent comes from (input edges
/// vs. AI decisions), in tuning, and in hitbox projection.

use super::ai;
use super::anim::{select_kind, AnimKind, ClipKey, MoveDir, Playback, SpriteTimings};
use super::combat::{
    self, AttackId, AttackIdGen, AttackPhase, CombatState, HitOutcome, HitResponse,
};
use super::geometry::Rect;
use super::movement;

const PLAYER_HITBOX_W: f32 = 60.0;
const PLAYER_HITBOX_H: f32 = 90.0;
const WARRIOR_HITBOX: f32 = 54.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// One tick of player intent. Movement and guard are level (held);
/// attack is the held state too, edge-detected inside the update
/// against the previous tick.
#[derive(Clone, Copy, Default, Debug)]
pub struct FrameInput {
    pub move_x: f32,
    pub move_y: f32,
    pub attack_held: bool,
    pub guard_held: bool,
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// Player tuning. Config may override the hp/damage/speed numbers.
#[derive(Clone, Copy, Debug)]
pub struct PlayerTuning {
    pub max_hp: i32,
    pub attack_damage: i32,
    pub move_speed: f32,
    pub combo_window_ticks: u32,
    pub hit_response: HitResponse,
    pub guard_kb_ticks: u32,
    pub guard_kb_speed: f32,
    pub fade_ticks: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        PlayerTuning {
            max_hp: 100,
            attack_damage: 10,
            move_speed: 80.0,
            combo_window_ticks: 60,
            hit_response: HitResponse { invuln_ticks: 24, kb_ticks: 10, kb_speed: 260.0 },
            guard_kb_ticks: 8,
            guard_kb_speed: 240.0,
            fade_ticks: 36,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Sprite center; the foot collider sits 24 px below.
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub move_dir: MoveDir,
    pub combat: CombatState,
    pub playback: Playback,
    pub timings: SpriteTimings,
    pub tuning: PlayerTuning,
    last_attack_pressed: bool,
}

impl Player {
    pub fn new(x: f32, y: f32, tuning: PlayerTuning) -> Self {
        Player {
            x,
            y,
            facing: Facing::Right,
            move_dir: MoveDir::Down,
            combat: CombatState::new(tuning.max_hp),
            playback: Playback::new(ClipKey::new(AnimKind::Idle, MoveDir::Down)),
            timings: SpriteTimings::player(),
            tuning,
            last_attack_pressed: false,
        }
    }

    /// One simulation tick: movement with knockback override, then the
    /// attack/guard machine, then animation. Returns the phase of a
    /// swing started this tick.
    pub fn update(
        &mut self,
        input: FrameInput,
        colliders: &[Rect],
        ids: &mut AttackIdGen,
        dt: f32,
    ) -> Option<AttackPhase> {
        if !self.combat.alive() {
            self.combat.advance_fade(self.tuning.fade_ticks);
            self.playback.update(self.timings.timing(self.playback.key.kind));
            self.last_attack_pressed = input.attack_held;
            return None;
        }

        // Movement intent; holding guard plants the feet
        let (ix, iy) = if input.guard_held {
            (0.0, 0.0)
        } else {
            (
                input.move_x * self.tuning.move_speed * dt,
                input.move_y * self.tuning.move_speed * dt,
            )
        };
        // Knockback overrides intent while its ticks last
        let (dx, dy) = match self.combat.knockback_delta(dt) {
            Some(kb) => kb,
            None => (ix, iy),
        };
        let (nx, ny) = movement::resolve_move(self.x, self.y, dx, dy, colliders);
        self.x = nx;
        self.y = ny;

        self.combat.tick_invuln();

        let mut attack_edge = input.attack_held && !self.last_attack_pressed;
        self.combat.guarding = input.guard_held;

        if self.combat.guarding {
            attack_edge = false;
            self.combat.combo_ticks = 0;
            if self.combat.attack.is_none() {
                self.playback.set(ClipKey::new(AnimKind::Guard, self.move_dir));
                self.playback.update(self.timings.guard);
                self.last_attack_pressed = input.attack_held;
                return None;
            }
        }

        let mut started = None;
        if attack_edge && self.combat.attack.is_none() {
            started = self.combat.start_attack(ids.next_id());
        }

        // Facing and direction change only outside a swing, so the
        // hitbox side stays locked while one plays. Ties go vertical.
        let moving = ix != 0.0 || iy != 0.0;
        if self.combat.attack.is_none() && moving {
            if ix.abs() > iy.abs() {
                self.move_dir = MoveDir::Side;
                self.facing = if ix < 0.0 { Facing::Left } else { Facing::Right };
            } else if iy < 0.0 {
                self.move_dir = MoveDir::Up;
            } else {
                self.move_dir = MoveDir::Down;
            }
        }
        let kind = select_kind(self.combat.attack.map(|a| a.phase), self.combat.guarding, moving);

        if let Some(atk) = self.combat.attack {
            let duration = self.attack_duration(atk.phase);
            self.combat.advance_attack(duration, self.tuning.combo_window_ticks);
        } else {
            self.combat.tick_combo_window();
        }

        self.playback.set(ClipKey::new(kind, self.move_dir));
        self.playback.update(self.timings.timing(kind));
        self.last_attack_pressed = input.attack_held;
        started
    }

    fn attack_duration(&self, phase: AttackPhase) -> u32 {
        match phase {
            AttackPhase::One => self.timings.attack1.duration_ticks(),
            AttackPhase::Two => self.timings.attack2.duration_ticks(),
        }
    }

    /// Damage window: ticks [floor(0.30·D), floor(0.70·D)] of a swing.
    pub fn attack_active(&self) -> bool {
        match self.combat.attack {
            Some(atk) => {
                let d = self.attack_duration(atk.phase);
                combat::active_window(atk.ticks, (d as f32 * 0.30) as u32, d)
            }
            None => false,
        }
    }

    /// Attack hitbox plus swing id while the damage window is open.
    /// The 60×90 box hangs in front of the collider on the facing side.
    pub fn active_strike(&self) -> Option<(Rect, AttackId)> {
        if !self.attack_active() {
            return None;
        }
        let atk = self.combat.attack?;
        let cb = self.collision_box();
        let x = match self.facing {
            Facing::Left => cb.x - PLAYER_HITBOX_W,
            Facing::Right => cb.x + cb.w,
        };
        let rect = Rect {
            x,
            y: cb.y + 40.0 - PLAYER_HITBOX_H,
            w: PLAYER_HITBOX_W,
            h: PLAYER_HITBOX_H,
        };
        Some((rect, atk.id))
    }

    pub fn collision_box(&self) -> Rect {
        movement::collision_box(self.x, self.y)
    }

    /// Damage-taking box; the foot collider, like the movement box.
    pub fn hurtbox(&self) -> Rect {
        self.collision_box()
    }

    /// A landed enemy swing. A blocked one still shoves: the guard
    /// absorbs the damage and takes this archetype's guard knockback.
    pub fn take_hit(&mut self, dmg: i32, id: AttackId, from: (f32, f32)) -> HitOutcome {
        let pos = (self.x, self.y);
        let outcome = self.combat.take_hit(dmg, Some(id), pos, from, self.tuning.hit_response);
        if outcome == HitOutcome::Blocked {
            self.combat.apply_knockback_from(
                pos, from, self.tuning.guard_kb_speed, self.tuning.guard_kb_ticks,
            );
        }
        outcome
    }

    /// Passive body contact: no swing id, i-frames alone gate it, and
    /// it never shoves.
    pub fn take_contact(&mut self, dmg: i32, from: (f32, f32)) -> HitOutcome {
        let pos = (self.x, self.y);
        let response = HitResponse {
            invuln_ticks: self.tuning.hit_response.invuln_ticks,
            kb_ticks: 0,
            kb_speed: 0.0,
        };
        self.combat.take_hit(dmg, None, pos, from, response)
    }
}

// ══════════════════════════════════════════════════════════════
// Enemy warrior
// ══════════════════════════════════════════════════════════════

/// Warrior tuning. Config may override the hp/damage/speed numbers.
#[derive(Clone, Copy, Debug)]
pub struct WarriorTuning {
    pub max_hp: i32,
    pub attack_damage: i32,
    pub contact_damage: i32,
    pub chase_speed: f32,
    pub aggro_radius: f32,
    pub stop_radius: f32,
    pub windup_ticks: u32,
    pub attack_cooldown_ticks: u32,
    pub hit_response: HitResponse,
    pub guard_kb_ticks: u32,
    pub guard_kb_speed: f32,
    pub fade_ticks: u32,
}

impl Default for WarriorTuning {
    fn default() -> Self {
        WarriorTuning {
            max_hp: 30,
            attack_damage: 10,
            contact_damage: 5,
            chase_speed: 90.0,
            aggro_radius: 220.0,
            stop_radius: 44.0,
            windup_ticks: 8,
            attack_cooldown_ticks: 75,
            hit_response: HitResponse { invuln_ticks: 18, kb_ticks: 10, kb_speed: 260.0 },
            guard_kb_ticks: 8,
            guard_kb_speed: 220.0,
            fade_ticks: 36,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Warrior {
    /// Sprite center; the foot collider sits 24 px below.
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub move_dir: MoveDir,
    pub combat: CombatState,
    pub playback: Playback,
    pub timings: SpriteTimings,
    pub tuning: WarriorTuning,
}

impl Warrior {
    pub fn new(x: f32, y: f32, tuning: WarriorTuning) -> Self {
        Warrior {
            x,
            y,
            facing: Facing::Left,
            move_dir: MoveDir::Down,
            combat: CombatState::new(tuning.max_hp),
            playback: Playback::new(ClipKey::new(AnimKind::Idle, MoveDir::Down)),
            timings: SpriteTimings::enemy(),
            tuning,
        }
    }

    /// One simulation tick: knockback first (it stalls everything,
    /// swing bookkeeping and cooldown included), then death fade, then
    /// swing progress, then the chase/attack decision. Returns true
    /// when a swing starts this tick.
    pub fn update(
        &mut self,
        player_pos: (f32, f32),
        colliders: &[Rect],
        ids: &mut AttackIdGen,
        dt: f32,
    ) -> bool {
        if self.combat.removed {
            return false;
        }
        self.combat.tick_invuln();

        if let Some((dx, dy)) = self.combat.knockback_delta(dt) {
            let (nx, ny) = movement::resolve_move(self.x, self.y, dx, dy, colliders);
            self.x = nx;
            self.y = ny;
            self.update_movement_anim(dx, dy);
            return false;
        }

        self.combat.tick_cooldown();

        if self.combat.dead {
            self.combat.advance_fade(self.tuning.fade_ticks);
            return false;
        }

        let vx = player_pos.0 - self.x;
        let vy = player_pos.1 - self.y;
        // Keeps tracking the player even mid-swing
        self.facing = ai::face_toward(self.facing, vx, vy);

        if self.combat.attack.is_some() {
            self.playback.set(ClipKey::new(AnimKind::Attack1, self.move_dir));
            self.playback.update(self.timings.attack1);
            let duration = self.timings.attack1.duration_ticks();
            if self.combat.advance_attack(duration, 0) {
                self.combat.cooldown_ticks = self.tuning.attack_cooldown_ticks;
                self.playback.set(ClipKey::new(AnimKind::Idle, self.move_dir));
            }
            return false;
        }

        let ready = self.combat.cooldown_ticks == 0;
        match ai::decide(vx, vy, self.tuning.aggro_radius, self.tuning.stop_radius, ready) {
            ai::AiDecision::Attack => {
                let started = self.combat.start_attack(ids.next_id()).is_some();
                self.playback.set(ClipKey::new(AnimKind::Attack1, self.move_dir));
                started
            }
            ai::AiDecision::Chase { dx, dy } => {
                let sx = dx * self.tuning.chase_speed * dt;
                let sy = dy * self.tuning.chase_speed * dt;
                let (nx, ny) = movement::resolve_move(self.x, self.y, sx, sy, colliders);
                self.x = nx;
                self.y = ny;
                self.update_movement_anim(sx, sy);
                false
            }
            ai::AiDecision::Hold => {
                self.update_movement_anim(0.0, 0.0);
                false
            }
        }
    }

    /// Walk-cycle bookkeeping shared by chase, hold, and knockback
    /// ticks. Facing is not touched here; it tracks the player, not
    /// the motion.
    fn update_movement_anim(&mut self, dx: f32, dy: f32) {
        let moving = dx != 0.0 || dy != 0.0;
        if moving {
            if dx.abs() > dy.abs() {
                self.move_dir = MoveDir::Side;
            } else if dy < 0.0 {
                self.move_dir = MoveDir::Up;
            } else {
                self.move_dir = MoveDir::Down;
            }
        }
        let kind = select_kind(None, false, moving);
        self.playback.set(ClipKey::new(kind, self.move_dir));
        self.playback.update(self.timings.timing(kind));
    }

    /// Damage window: ticks [windup, floor(0.70·D)] of a swing.
    pub fn attack_active(&self) -> bool {
        match self.combat.attack {
            Some(atk) => combat::active_window(
                atk.ticks,
                self.tuning.windup_ticks,
                self.timings.attack1.duration_ticks(),
            ),
            None => false,
        }
    }

    /// Attack hitbox plus swing id while the damage window is open.
    /// A 54×54 box beside the collider on the facing side, vertically
    /// centered on it.
    pub fn active_strike(&self) -> Option<(Rect, AttackId)> {
        if !self.attack_active() {
            return None;
        }
        let atk = self.combat.attack?;
        let hb = self.hurtbox();
        let x = match self.facing {
            Facing::Left => hb.x - WARRIOR_HITBOX,
            Facing::Right => hb.x + hb.w,
        };
        let rect = Rect {
            x,
            y: hb.y + hb.h / 2.0 - WARRIOR_HITBOX / 2.0,
            w: WARRIOR_HITBOX,
            h: WARRIOR_HITBOX,
        };
        Some((rect, atk.id))
    }

    pub fn collision_box(&self) -> Rect {
        movement::collision_box(self.x, self.y)
    }

    /// Damage-taking box; the foot collider, like the movement box.
    pub fn hurtbox(&self) -> Rect {
        self.collision_box()
    }

    /// A landed player swing. Same blocked-hit response as the player:
    /// no damage, own guard knockback. Nothing sets `guarding` on this
    /// archetype today, so the branch waits on future art and AI.
    pub fn take_hit(&mut self, dmg: i32, id: AttackId, from: (f32, f32)) -> HitOutcome {
        let pos = (self.x, self.y);
        let outcome = self.combat.take_hit(dmg, Some(id), pos, from, self.tuning.hit_response);
        if outcome == HitOutcome::Blocked {
            self.combat.apply_knockback_from(
                pos, from, self.tuning.guard_kb_speed, self.tuning.guard_kb_ticks,
            );
        }
        outcome
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(x, y, PlayerTuning::default())
    }

    fn warrior_at(x: f32, y: f32) -> Warrior {
        Warrior::new(x, y, WarriorTuning::default())
    }

    fn held(move_x: f32, move_y: f32) -> FrameInput {
        FrameInput { move_x, move_y, ..Default::default() }
    }

    fn press_attack() -> FrameInput {
        FrameInput { attack_held: true, ..Default::default() }
    }

    // ── player movement ──

    #[test]
    fn player_walks_at_tuned_speed() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        p.update(held(1.0, 0.0), &[], &mut ids, DT);
        // 80 px/s over one tick
        assert!((p.x - (100.0 + 80.0 * DT)).abs() < 1e-4);
        assert_eq!(p.move_dir, MoveDir::Side);
        assert_eq!(p.facing, Facing::Right);
        assert_eq!(p.playback.key.kind, AnimKind::Run);
    }

    #[test]
    fn guard_plants_the_feet() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        let input = FrameInput { move_x: 1.0, guard_held: true, ..Default::default() };
        p.update(input, &[], &mut ids, DT);
        assert_eq!(p.x, 100.0);
        assert!(p.combat.guarding);
        assert_eq!(p.playback.key.kind, AnimKind::Guard);
    }

    #[test]
    fn vertical_wins_diagonal_ties() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        p.update(held(1.0, 1.0), &[], &mut ids, DT);
        assert_eq!(p.move_dir, MoveDir::Down);
        p.update(held(1.0, -1.0), &[], &mut ids, DT);
        assert_eq!(p.move_dir, MoveDir::Up);
    }

    #[test]
    fn knockback_overrides_held_movement() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        // Source to the right pushes the player left
        p.combat.apply_knockback_from((p.x, p.y), (p.x + 10.0, p.y), 240.0, 4);
        for _ in 0..4 {
            p.update(held(1.0, 0.0), &[], &mut ids, DT);
        }
        assert!(p.x < 100.0);
        let x_after_kb = p.x;
        // Knockback spent; held input takes over again
        p.update(held(1.0, 0.0), &[], &mut ids, DT);
        assert!(p.x > x_after_kb);
    }

    // ── player swings ──

    #[test]
    fn attack_edge_starts_a_swing_once() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        assert_eq!(p.update(press_attack(), &[], &mut ids, DT), Some(AttackPhase::One));
        // The start tick already advances the swing clock
        assert_eq!(p.combat.attack.map(|a| a.ticks), Some(1));
        // Held button is not a new edge
        assert_eq!(p.update(press_attack(), &[], &mut ids, DT), None);
        assert_eq!(p.combat.attack.map(|a| a.ticks), Some(2));
    }

    #[test]
    fn swing_window_opens_and_closes_on_exact_ticks() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        for k in 1..=23 {
            p.update(press_attack(), &[], &mut ids, DT);
            assert_eq!(p.combat.attack.map(|a| a.ticks), Some(k));
            assert_eq!(p.attack_active(), (7..=16).contains(&k), "tick {}", k);
        }
        // 24th update ends the swing and opens the combo window
        p.update(press_attack(), &[], &mut ids, DT);
        assert!(p.combat.attack.is_none());
        assert_eq!(p.combat.combo_ticks, 60);
    }

    fn finish_phase_one(p: &mut Player, ids: &mut AttackIdGen) {
        for _ in 0..24 {
            p.update(press_attack(), &[], ids, DT);
        }
        assert!(p.combat.attack.is_none());
        assert_eq!(p.combat.combo_ticks, 60);
    }

    #[test]
    fn repress_on_last_window_tick_combos() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        finish_phase_one(&mut p, &mut ids);
        // 59 idle ticks burn the window down to 1
        for _ in 0..59 {
            p.update(FrameInput::default(), &[], &mut ids, DT);
        }
        assert_eq!(p.combat.combo_ticks, 1);
        assert_eq!(p.update(press_attack(), &[], &mut ids, DT), Some(AttackPhase::Two));
    }

    #[test]
    fn repress_after_window_restarts_the_chain() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        finish_phase_one(&mut p, &mut ids);
        for _ in 0..60 {
            p.update(FrameInput::default(), &[], &mut ids, DT);
        }
        assert_eq!(p.combat.combo_ticks, 0);
        assert_eq!(p.update(press_attack(), &[], &mut ids, DT), Some(AttackPhase::One));
    }

    #[test]
    fn guard_hold_clears_the_combo_window() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        finish_phase_one(&mut p, &mut ids);
        let guard = FrameInput { guard_held: true, ..Default::default() };
        p.update(guard, &[], &mut ids, DT);
        assert_eq!(p.combat.combo_ticks, 0);
        // Release, press: back to phase 1
        p.update(FrameInput::default(), &[], &mut ids, DT);
        assert_eq!(p.update(press_attack(), &[], &mut ids, DT), Some(AttackPhase::One));
    }

    #[test]
    fn guard_held_mid_swing_lets_the_swing_finish() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        p.update(press_attack(), &[], &mut ids, DT);
        let both = FrameInput { attack_held: true, guard_held: true, ..Default::default() };
        p.update(both, &[], &mut ids, DT);
        assert!(p.combat.attack.is_some());
        assert!(p.combat.guarding);
        assert_eq!(p.playback.key.kind, AnimKind::Attack1);
    }

    #[test]
    fn facing_locks_while_a_swing_plays() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        assert_eq!(p.facing, Facing::Right);
        let left_and_attack = FrameInput { move_x: -1.0, attack_held: true, ..Default::default() };
        for _ in 0..24 {
            p.update(left_and_attack, &[], &mut ids, DT);
            assert_eq!(p.facing, Facing::Right);
        }
        // Movement itself was never suppressed
        assert!(p.x < 100.0);
        // Swing over: the held direction shows through
        p.update(left_and_attack, &[], &mut ids, DT);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn strike_box_hangs_off_the_facing_side() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        for _ in 0..7 {
            p.update(press_attack(), &[], &mut ids, DT);
        }
        let (rect, _) = p.active_strike().unwrap();
        // Collider spans [92, 108]; box top is 40 - 90 below collider top
        assert_eq!(rect.x, 108.0);
        assert_eq!(rect.y, 64.0);
        assert_eq!((rect.w, rect.h), (60.0, 90.0));

        let mut p = player_at(100.0, 100.0);
        p.facing = Facing::Left;
        for _ in 0..7 {
            p.update(press_attack(), &[], &mut ids, DT);
        }
        let (rect, _) = p.active_strike().unwrap();
        assert_eq!(rect.x, 32.0);
    }

    #[test]
    fn no_strike_outside_the_window() {
        let mut p = player_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        p.update(press_attack(), &[], &mut ids, DT);
        assert!(p.active_strike().is_none());
    }

    #[test]
    fn dying_player_holds_still_then_removes() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        p.take_hit(100, AttackId(9), (0.0, 100.0));
        assert!(p.combat.dead);
        for i in 1..=36 {
            p.update(held(1.0, 0.0), &[], &mut ids, DT);
            assert_eq!(p.x, 100.0, "moved on fade tick {}", i);
        }
        assert!(p.combat.removed);
    }

    #[test]
    fn contact_damage_never_shoves() {
        let mut p = player_at(0.0, 0.0);
        assert_eq!(p.take_contact(5, (10.0, 0.0)), HitOutcome::Applied { lethal: false });
        assert_eq!(p.combat.hp, 95);
        assert_eq!(p.combat.invuln_ticks, 24);
        assert!(p.combat.knockback.is_none());
    }

    #[test]
    fn guarded_hit_costs_nothing_but_shoves_the_guard() {
        let mut p = player_at(100.0, 100.0);
        p.combat.guarding = true;
        assert_eq!(p.take_hit(10, AttackId(4), (130.0, 100.0)), HitOutcome::Blocked);
        assert_eq!(p.combat.hp, 100);
        // 8 ticks at 240 px/s, pushed away from the source
        let kb = p.combat.knockback.unwrap();
        assert_eq!(kb.ticks, 8);
        assert_eq!((kb.vx, kb.vy), (-240.0, 0.0));
    }

    #[test]
    fn guarded_contact_does_not_shove() {
        let mut p = player_at(0.0, 0.0);
        p.combat.guarding = true;
        assert_eq!(p.take_contact(5, (10.0, 0.0)), HitOutcome::Blocked);
        assert_eq!(p.combat.hp, 100);
        assert!(p.combat.knockback.is_none());
    }

    #[test]
    fn contact_mid_guard_shove_keeps_the_shove() {
        let mut p = player_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        p.combat.guarding = true;
        assert_eq!(p.take_hit(10, AttackId(4), (130.0, 100.0)), HitOutcome::Blocked);

        // Guard drops, one shove tick runs: 4 px left, 7 ticks remain
        p.update(FrameInput::default(), &[], &mut ids, DT);
        assert_eq!(p.x, 96.0);
        assert_eq!(p.combat.knockback.map(|k| k.ticks), Some(7));

        // A block grants no i-frames, so the still-overlapping body
        // lands contact damage; the shove rides on at full speed
        assert_eq!(p.take_contact(5, (130.0, 100.0)), HitOutcome::Applied { lethal: false });
        assert_eq!(p.combat.hp, 95);
        let kb = p.combat.knockback.unwrap();
        assert_eq!((kb.vx, kb.vy), (-240.0, 0.0));
        assert_eq!(kb.ticks, 7);
    }

    // ── warrior ──

    #[test]
    fn far_player_leaves_the_warrior_idle() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((1000.0, 0.0), &[], &mut ids, DT);
        assert_eq!((w.x, w.y), (0.0, 0.0));
        assert_eq!(w.playback.key.kind, AnimKind::Idle);
    }

    #[test]
    fn warrior_chases_inside_aggro() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((100.0, 0.0), &[], &mut ids, DT);
        assert!((w.x - 90.0 * DT).abs() < 1e-4);
        assert_eq!(w.y, 0.0);
        assert_eq!(w.facing, Facing::Right);
        assert_eq!(w.playback.key.kind, AnimKind::Run);
        assert_eq!(w.move_dir, MoveDir::Side);
    }

    #[test]
    fn warrior_swings_in_reach_with_windup() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        assert!(w.update((30.0, 0.0), &[], &mut ids, DT));
        // Start tick leaves the swing clock at zero; not yet active
        assert_eq!(w.combat.attack.map(|a| a.ticks), Some(0));
        assert!(!w.attack_active());
        for k in 1..=23 {
            assert!(!w.update((30.0, 0.0), &[], &mut ids, DT));
            assert_eq!(w.combat.attack.map(|a| a.ticks), Some(k));
            assert_eq!(w.attack_active(), (8..=16).contains(&k), "tick {}", k);
        }
    }

    #[test]
    fn warrior_freezes_in_place_while_swinging() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((30.0, 0.0), &[], &mut ids, DT);
        // Player retreats out of reach; the swing still pins the feet
        for _ in 0..10 {
            w.update((200.0, 0.0), &[], &mut ids, DT);
        }
        assert_eq!((w.x, w.y), (0.0, 0.0));
        assert!(w.combat.attack.is_some());
    }

    #[test]
    fn warrior_tracks_facing_mid_swing() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((30.0, 0.0), &[], &mut ids, DT);
        assert_eq!(w.facing, Facing::Right);
        w.update((-30.0, 0.0), &[], &mut ids, DT);
        assert_eq!(w.facing, Facing::Left);
        assert!(w.combat.attack.is_some());
    }

    #[test]
    fn finished_swing_starts_the_cooldown() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((30.0, 0.0), &[], &mut ids, DT);
        for _ in 0..24 {
            w.update((30.0, 0.0), &[], &mut ids, DT);
        }
        assert!(w.combat.attack.is_none());
        assert_eq!(w.combat.cooldown_ticks, 75);
        // In reach the whole time: 74 more ticks of waiting...
        for i in 1..=74 {
            assert!(!w.update((30.0, 0.0), &[], &mut ids, DT), "early swing at {}", i);
        }
        // ...and the 75th goes off
        assert!(w.update((30.0, 0.0), &[], &mut ids, DT));
    }

    #[test]
    fn knockback_stalls_swing_clock_and_cooldown() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        w.update((30.0, 0.0), &[], &mut ids, DT);
        w.update((30.0, 0.0), &[], &mut ids, DT);
        assert_eq!(w.combat.attack.map(|a| a.ticks), Some(1));
        w.combat.cooldown_ticks = 10;
        w.combat.apply_knockback_from((w.x, w.y), (30.0, 0.0), 260.0, 3);
        for _ in 0..3 {
            w.update((30.0, 0.0), &[], &mut ids, DT);
        }
        // Shoved left, clocks untouched
        assert!(w.x < 0.0);
        assert_eq!(w.combat.attack.map(|a| a.ticks), Some(1));
        assert_eq!(w.combat.cooldown_ticks, 10);
        // Next tick the swing clock runs again
        w.update((30.0, 0.0), &[], &mut ids, DT);
        assert_eq!(w.combat.attack.map(|a| a.ticks), Some(2));
    }

    #[test]
    fn dying_warrior_fades_out_on_schedule() {
        let mut w = warrior_at(0.0, 0.0);
        let mut ids = AttackIdGen::new();
        assert_eq!(w.take_hit(30, AttackId(1), (-10.0, 0.0)), HitOutcome::Applied { lethal: true });
        assert!(w.combat.dead);
        assert!(w.combat.knockback.is_none());
        for i in 1..=36 {
            w.update((0.0, 0.0), &[], &mut ids, DT);
            assert_eq!(w.combat.removed, i == 36, "fade tick {}", i);
            assert_eq!((w.x, w.y), (0.0, 0.0));
        }
    }

    #[test]
    fn warrior_guard_response_uses_its_own_tuning() {
        let mut w = warrior_at(0.0, 0.0);
        w.combat.guarding = true;
        assert_eq!(w.take_hit(10, AttackId(2), (-10.0, 0.0)), HitOutcome::Blocked);
        assert_eq!(w.combat.hp, 30);
        let kb = w.combat.knockback.unwrap();
        assert_eq!(kb.ticks, 8);
        assert_eq!((kb.vx, kb.vy), (220.0, 0.0));
    }

    #[test]
    fn warrior_strike_box_flanks_the_collider() {
        let mut w = warrior_at(100.0, 100.0);
        let mut ids = AttackIdGen::new();
        // Player just to the right: swing starts facing right
        w.update((130.0, 100.0), &[], &mut ids, DT);
        for _ in 0..8 {
            w.update((130.0, 100.0), &[], &mut ids, DT);
        }
        let (rect, _) = w.active_strike().unwrap();
        // Collider spans [92, 108] × [114, 124]
        assert_eq!(rect.x, 108.0);
        assert_eq!(rect.y, 114.0 + 5.0 - 27.0);
        assert_eq!((rect.w, rect.h), (54.0, 54.0));
    }
}
