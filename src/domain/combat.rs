/// Combat timing: attack phases, combo window, guard, knockback,
/// invulnerability, damage application, dying and removal.
///
/// ## State machine
///
/// Attacks:  Idle → Attacking(1) → Idle | combo window open
///                                        └─ rising edge → Attacking(2) → Idle
///
/// Orthogonal to attacks:
///   - Guarding (held) blocks attack *starts* and clears the combo
///     window; an attack already in flight always plays out.
///   - Knockback overrides movement while its ticks remain. Whether it
///     also freezes attack/cooldown bookkeeping is the archetype's
///     call, so the entity update decides that, not this module.
///   - Dying advances a fade counter only; Removed is terminal.
///
/// One `CombatState` serves both archetypes. The player and enemy
/// differ in where intents come from (input edge vs. AI decision) and
/// in tuning, never in this machinery.
///
/// ## Damage discipline
///
/// Every swing carries an `AttackId` allocated from a single world
/// counter. A defender records the last id applied to it and ignores
/// repeats, so one active window can never damage the same target
/// twice. Passive body-contact damage carries no id; only the
/// invulnerability timer gates it.

/// Identifier for one started swing. Unique for the life of a world.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AttackId(pub u64);

/// Hands out swing identifiers from one counter per world, so repeat
/// suppression works across every attacker in play.
#[derive(Clone, Debug)]
pub struct AttackIdGen {
    next: u64,
}

impl AttackIdGen {
    pub fn new() -> Self {
        AttackIdGen { next: 1 }
    }

    pub fn next_id(&mut self) -> AttackId {
        let id = AttackId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttackPhase {
    One,
    Two,
}

/// An attack in flight. `ticks` counts update calls since the start.
#[derive(Clone, Copy, Debug)]
pub struct Attack {
    pub phase: AttackPhase,
    pub ticks: u32,
    pub id: AttackId,
}

/// Knockback in flight. Velocity is px/sec, applied per tick by the
/// entity's movement step.
#[derive(Clone, Copy, Debug)]
pub struct Knockback {
    pub vx: f32,
    pub vy: f32,
    pub ticks: u32,
}

/// How a defender reacts to an accepted hit.
#[derive(Clone, Copy, Debug)]
pub struct HitResponse {
    pub invuln_ticks: u32,
    pub kb_ticks: u32,
    pub kb_speed: f32,
}

/// Outcome of a damage attempt, for the encounter loop to act on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HitOutcome {
    /// Dead/removed target, i-frames, or a repeated attack id.
    Ignored,
    /// Target was guarding: no damage. The caller decides the block
    /// response (defender knockback, attacker cooldown).
    Blocked,
    /// Damage applied. `lethal` means the target just entered Dying.
    Applied { lethal: bool },
}

/// Combat state collapsed to a single label, in priority order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(dead_code)]
pub enum CombatPhase {
    Idle,
    Attacking,
    Guarding,
    Cooldown,
    Knockback,
    Dying,
    Removed,
}

#[derive(Clone, Debug)]
pub struct CombatState {
    pub hp: i32,
    pub dead: bool,
    pub removed: bool,
    pub attack: Option<Attack>,
    pub guarding: bool,
    /// Remaining combo-window ticks; 0 = window closed.
    pub combo_ticks: u32,
    pub invuln_ticks: u32,
    pub knockback: Option<Knockback>,
    pub cooldown_ticks: u32,
    pub fade_ticks: u32,
    pub last_hit_id: Option<AttackId>,
}

impl CombatState {
    pub fn new(max_hp: i32) -> Self {
        CombatState {
            hp: max_hp,
            dead: false,
            removed: false,
            attack: None,
            guarding: false,
            combo_ticks: 0,
            invuln_ticks: 0,
            knockback: None,
            cooldown_ticks: 0,
            fade_ticks: 0,
            last_hit_id: None,
        }
    }

    /// Living and still in play. Hurtboxes exist only for such actors.
    #[inline]
    pub fn alive(&self) -> bool {
        !self.dead && !self.removed
    }

    /// Hit-flash flicker: while invulnerable the sprite hides on
    /// alternating three-tick windows, starting hidden.
    pub fn hit_flash_hidden(&self) -> bool {
        self.invuln_ticks > 0 && (self.invuln_ticks / 3) % 2 == 0
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> CombatPhase {
        if self.removed { return CombatPhase::Removed; }
        if self.dead { return CombatPhase::Dying; }
        if self.knockback.is_some() { return CombatPhase::Knockback; }
        if self.attack.is_some() { return CombatPhase::Attacking; }
        if self.guarding { return CombatPhase::Guarding; }
        if self.cooldown_ticks > 0 { return CombatPhase::Cooldown; }
        CombatPhase::Idle
    }

    // ── Attacks ──

    /// Start an attack if allowed: not dead, not guarding, none already
    /// playing. An open combo window escalates to phase 2 and is
    /// consumed. Returns the started phase.
    pub fn start_attack(&mut self, id: AttackId) -> Option<AttackPhase> {
        if self.dead || self.guarding || self.attack.is_some() {
            return None;
        }
        let phase = if self.combo_ticks > 0 { AttackPhase::Two } else { AttackPhase::One };
        self.combo_ticks = 0;
        self.attack = Some(Attack { phase, ticks: 0, id });
        Some(phase)
    }

    /// Advance a playing attack one tick. At `duration` the attack
    /// ends; a finished phase 1 opens the combo window (`combo_window`
    /// ticks — pass 0 for archetypes that never combo), anything else
    /// closes it. Returns true on the tick the attack ends.
    pub fn advance_attack(&mut self, duration: u32, combo_window: u32) -> bool {
        let atk = match self.attack.as_mut() {
            Some(a) => a,
            None => return false,
        };
        atk.ticks += 1;
        if atk.ticks >= duration {
            let finished = atk.phase;
            self.attack = None;
            self.combo_ticks = if finished == AttackPhase::One { combo_window } else { 0 };
            return true;
        }
        false
    }

    /// Count the combo window down. Call only on ticks with no attack
    /// playing, so the tick that opens the window never consumes it:
    /// a rising edge on any of the `combo_window` following ticks
    /// still lands in the window.
    pub fn tick_combo_window(&mut self) {
        if self.combo_ticks > 0 {
            self.combo_ticks -= 1;
        }
    }

    /// Forced recovery after a guarded swing. No-op unless an attack
    /// is playing.
    pub fn cancel_attack_and_start_cooldown(&mut self, cooldown: u32) {
        if self.attack.is_none() { return; }
        self.attack = None;
        self.cooldown_ticks = cooldown;
    }

    // ── Timers ──

    #[inline]
    pub fn tick_invuln(&mut self) {
        self.invuln_ticks = self.invuln_ticks.saturating_sub(1);
    }

    #[inline]
    pub fn tick_cooldown(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }

    /// Advance the death fade. Returns true on the tick Removed is
    /// reached, exactly `fade_duration` ticks after death.
    pub fn advance_fade(&mut self, fade_duration: u32) -> bool {
        if !self.dead || self.removed { return false; }
        self.fade_ticks += 1;
        if self.fade_ticks >= fade_duration {
            self.removed = true;
            return true;
        }
        false
    }

    // ── Knockback ──

    /// Push away from `from`. Velocity is replaced; remaining duration
    /// keeps the longer of current and new (never shortened, never
    /// stacked). A degenerate direction falls back to +X. Zero `ticks`
    /// is no push at all: a knockback already in flight keeps its
    /// velocity and duration.
    pub fn apply_knockback_from(
        &mut self,
        self_pos: (f32, f32),
        from: (f32, f32),
        speed: f32,
        ticks: u32,
    ) {
        if ticks == 0 {
            return;
        }
        let mut vx = self_pos.0 - from.0;
        let mut vy = self_pos.1 - from.1;
        let len = (vx * vx + vy * vy).sqrt();
        if len < 1e-4 {
            vx = 1.0;
            vy = 0.0;
        } else {
            vx /= len;
            vy /= len;
        }
        let remaining = self.knockback.map_or(0, |k| k.ticks);
        let total = remaining.max(ticks);
        self.knockback = Some(Knockback { vx: vx * speed, vy: vy * speed, ticks: total });
    }

    /// Per-tick knockback displacement, consuming one tick. None when
    /// no knockback is active.
    pub fn knockback_delta(&mut self, dt: f32) -> Option<(f32, f32)> {
        let k = match self.knockback.as_mut() {
            Some(k) => k,
            None => return None,
        };
        let d = (k.vx * dt, k.vy * dt);
        k.ticks -= 1;
        if k.ticks == 0 {
            self.knockback = None;
        }
        Some(d)
    }

    // ── Damage ──

    /// Apply `dmg` from an attacker at `from`. `id` is the swing's
    /// identifier; pass None for passive contact damage.
    ///
    /// No-ops (Ignored): dead or removed, i-frames active, repeated id.
    /// Guarding blocks before any of the damage path runs.
    /// On acceptance: record the id, start i-frames, subtract damage,
    /// knock the defender back. Lethal damage clamps hp to 0, enters
    /// Dying, and clears all attack/guard/combo/knockback state — a
    /// dying actor holds still and only fades.
    pub fn take_hit(
        &mut self,
        dmg: i32,
        id: Option<AttackId>,
        self_pos: (f32, f32),
        from: (f32, f32),
        response: HitResponse,
    ) -> HitOutcome {
        if self.dead || self.removed { return HitOutcome::Ignored; }
        if self.guarding { return HitOutcome::Blocked; }
        if self.invuln_ticks > 0 { return HitOutcome::Ignored; }
        if let Some(id) = id {
            if self.last_hit_id == Some(id) { return HitOutcome::Ignored; }
            self.last_hit_id = Some(id);
        }

        self.invuln_ticks = response.invuln_ticks;
        self.hp -= dmg;
        self.apply_knockback_from(self_pos, from, response.kb_speed, response.kb_ticks);

        if self.hp <= 0 {
            self.hp = 0;
            self.dead = true;
            self.fade_ticks = 0;
            self.attack = None;
            self.guarding = false;
            self.combo_ticks = 0;
            self.knockback = None;
            return HitOutcome::Applied { lethal: true };
        }
        HitOutcome::Applied { lethal: false }
    }
}

/// Active-window test shared by both archetypes: damage lands on ticks
/// `start ..= floor(0.70 · duration)` inclusive. The player derives
/// `start` as `floor(0.30 · duration)`, the enemy uses a fixed windup.
#[inline]
pub fn active_window(ticks: u32, start: u32, duration: u32) -> bool {
    if duration == 0 { return false; }
    let end = (duration as f32 * 0.70) as u32;
    ticks >= start && ticks <= end
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: HitResponse = HitResponse {
        invuln_ticks: 18,
        kb_ticks: 10,
        kb_speed: 260.0,
    };

    fn fresh(hp: i32) -> CombatState {
        CombatState::new(hp)
    }

    fn hit(cs: &mut CombatState, dmg: i32, id: u64) -> HitOutcome {
        cs.take_hit(dmg, Some(AttackId(id)), (0.0, 0.0), (-10.0, 0.0), RESPONSE)
    }

    // ── attack start ──

    #[test]
    fn fresh_attack_is_phase_one() {
        let mut cs = fresh(30);
        assert_eq!(cs.start_attack(AttackId(1)), Some(AttackPhase::One));
        assert!(cs.attack.is_some());
    }

    #[test]
    fn no_start_while_attack_playing() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        assert_eq!(cs.start_attack(AttackId(2)), None);
        // Still the first swing
        assert_eq!(cs.attack.map(|a| a.id), Some(AttackId(1)));
    }

    #[test]
    fn no_start_while_guarding() {
        let mut cs = fresh(30);
        cs.guarding = true;
        assert_eq!(cs.start_attack(AttackId(1)), None);
    }

    #[test]
    fn no_start_when_dead() {
        let mut cs = fresh(30);
        cs.dead = true;
        assert_eq!(cs.start_attack(AttackId(1)), None);
    }

    // ── combo window ──

    fn run_attack_to_end(cs: &mut CombatState, duration: u32, window: u32) {
        let mut guard = 0;
        while cs.attack.is_some() {
            cs.advance_attack(duration, window);
            guard += 1;
            assert!(guard <= duration + 1, "attack never ended");
        }
    }

    #[test]
    fn phase_one_finish_opens_window() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        run_attack_to_end(&mut cs, 24, 60);
        assert_eq!(cs.combo_ticks, 60);
        assert_eq!(cs.start_attack(AttackId(2)), Some(AttackPhase::Two));
        // Window consumed by the phase-2 start
        assert_eq!(cs.combo_ticks, 0);
    }

    #[test]
    fn phase_two_finish_opens_nothing() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        run_attack_to_end(&mut cs, 24, 60);
        cs.start_attack(AttackId(2));
        run_attack_to_end(&mut cs, 24, 60);
        assert_eq!(cs.combo_ticks, 0);
        assert_eq!(cs.start_attack(AttackId(3)), Some(AttackPhase::One));
    }

    #[test]
    fn edge_on_tick_sixty_still_combos() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        run_attack_to_end(&mut cs, 24, 60);
        // 59 idle ticks pass; on the 60th tick after the finish the
        // start-check runs before that tick's countdown.
        for _ in 0..59 {
            cs.tick_combo_window();
        }
        assert_eq!(cs.combo_ticks, 1);
        assert_eq!(cs.start_attack(AttackId(2)), Some(AttackPhase::Two));
    }

    #[test]
    fn edge_on_tick_sixty_one_is_fresh_phase_one() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        run_attack_to_end(&mut cs, 24, 60);
        for _ in 0..60 {
            cs.tick_combo_window();
        }
        assert_eq!(cs.combo_ticks, 0);
        assert_eq!(cs.start_attack(AttackId(2)), Some(AttackPhase::One));
    }

    #[test]
    fn enemy_style_zero_window_never_combos() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        run_attack_to_end(&mut cs, 24, 0);
        assert_eq!(cs.combo_ticks, 0);
        assert_eq!(cs.start_attack(AttackId(2)), Some(AttackPhase::One));
    }

    // ── active window ──

    #[test]
    fn player_active_window_is_exact() {
        // D = 24: active ticks are exactly [7, 16].
        let d = 24;
        let start = (d as f32 * 0.30) as u32;
        for t in 0..d {
            let expect = (7..=16).contains(&t);
            assert_eq!(active_window(t, start, d), expect, "tick {}", t);
        }
    }

    #[test]
    fn enemy_active_window_is_exact() {
        // D = 24, windup 8: active ticks are exactly [8, 16].
        let d = 24;
        for t in 0..d {
            let expect = (8..=16).contains(&t);
            assert_eq!(active_window(t, 8, d), expect, "tick {}", t);
        }
    }

    #[test]
    fn zero_duration_never_active() {
        assert!(!active_window(0, 0, 0));
    }

    // ── take_hit ──

    #[test]
    fn hit_applies_damage_and_iframes() {
        let mut cs = fresh(30);
        assert_eq!(hit(&mut cs, 10, 1), HitOutcome::Applied { lethal: false });
        assert_eq!(cs.hp, 20);
        assert_eq!(cs.invuln_ticks, 18);
        assert!(cs.knockback.is_some());
    }

    #[test]
    fn same_id_applies_at_most_once() {
        let mut cs = fresh(30);
        hit(&mut cs, 10, 7);
        // Even with i-frames forced off, the repeated id is ignored
        cs.invuln_ticks = 0;
        assert_eq!(hit(&mut cs, 10, 7), HitOutcome::Ignored);
        assert_eq!(cs.hp, 20);
    }

    #[test]
    fn iframes_ignore_fresh_ids() {
        let mut cs = fresh(30);
        hit(&mut cs, 10, 1);
        assert_eq!(hit(&mut cs, 10, 2), HitOutcome::Ignored);
        assert_eq!(cs.hp, 20);
    }

    #[test]
    fn contact_damage_without_id_is_gated_by_iframes_only() {
        let mut cs = fresh(30);
        let r = RESPONSE;
        assert_eq!(
            cs.take_hit(5, None, (0.0, 0.0), (1.0, 0.0), r),
            HitOutcome::Applied { lethal: false }
        );
        assert_eq!(cs.take_hit(5, None, (0.0, 0.0), (1.0, 0.0), r), HitOutcome::Ignored);
        cs.invuln_ticks = 0;
        assert_eq!(
            cs.take_hit(5, None, (0.0, 0.0), (1.0, 0.0), r),
            HitOutcome::Applied { lethal: false }
        );
        assert_eq!(cs.hp, 20);
    }

    #[test]
    fn guard_blocks_before_damage() {
        let mut cs = fresh(30);
        cs.guarding = true;
        assert_eq!(hit(&mut cs, 10, 1), HitOutcome::Blocked);
        assert_eq!(cs.hp, 30);
        assert_eq!(cs.invuln_ticks, 0);
        assert!(cs.knockback.is_none());
    }

    #[test]
    fn dead_target_ignores_hits() {
        let mut cs = fresh(10);
        hit(&mut cs, 10, 1);
        assert!(cs.dead);
        cs.invuln_ticks = 0;
        assert_eq!(hit(&mut cs, 10, 2), HitOutcome::Ignored);
        assert_eq!(cs.hp, 0);
    }

    #[test]
    fn three_hits_kill_then_fade_to_removed() {
        let mut cs = fresh(30);
        assert_eq!(hit(&mut cs, 10, 1), HitOutcome::Applied { lethal: false });
        assert_eq!(cs.hp, 20);
        cs.invuln_ticks = 0;
        assert_eq!(hit(&mut cs, 10, 2), HitOutcome::Applied { lethal: false });
        assert_eq!(cs.hp, 10);
        cs.invuln_ticks = 0;
        assert_eq!(hit(&mut cs, 10, 3), HitOutcome::Applied { lethal: true });
        assert_eq!(cs.hp, 0);
        assert!(cs.dead);
        assert_eq!(cs.phase(), CombatPhase::Dying);

        // Removed after exactly 36 fade ticks, not before
        for i in 1..=36 {
            let done = cs.advance_fade(36);
            assert_eq!(done, i == 36, "fade tick {}", i);
        }
        assert!(cs.removed);
        assert_eq!(cs.phase(), CombatPhase::Removed);
    }

    #[test]
    fn lethal_hit_clears_combat_state() {
        let mut cs = fresh(10);
        cs.start_attack(AttackId(50));
        cs.combo_ticks = 30;
        hit(&mut cs, 10, 1);
        assert!(cs.attack.is_none());
        assert!(!cs.guarding);
        assert_eq!(cs.combo_ticks, 0);
        assert!(cs.knockback.is_none());
    }

    #[test]
    fn hp_clamps_to_zero_on_overkill() {
        let mut cs = fresh(5);
        hit(&mut cs, 10, 1);
        assert_eq!(cs.hp, 0);
    }

    // ── knockback ──

    #[test]
    fn knockback_duration_never_shrinks() {
        let mut cs = fresh(30);
        cs.apply_knockback_from((0.0, 0.0), (-1.0, 0.0), 260.0, 10);
        // Burn four ticks: 6 remain
        for _ in 0..4 {
            cs.knockback_delta(1.0 / 60.0);
        }
        assert_eq!(cs.knockback.map(|k| k.ticks), Some(6));

        // A shorter re-application keeps the 6
        cs.apply_knockback_from((0.0, 0.0), (1.0, 0.0), 220.0, 4);
        assert_eq!(cs.knockback.map(|k| k.ticks), Some(6));

        // A longer one extends to 8
        cs.apply_knockback_from((0.0, 0.0), (1.0, 0.0), 220.0, 8);
        assert_eq!(cs.knockback.map(|k| k.ticks), Some(8));
    }

    #[test]
    fn pushless_hit_leaves_inflight_knockback_alone() {
        let mut cs = fresh(30);
        cs.apply_knockback_from((0.0, 0.0), (10.0, 0.0), 240.0, 8);

        // Contact damage carries no push; the live shove keeps flying
        // instead of collapsing into a zero-velocity stall.
        let contact = HitResponse { invuln_ticks: 24, kb_ticks: 0, kb_speed: 0.0 };
        assert_eq!(
            cs.take_hit(5, None, (0.0, 0.0), (10.0, 0.0), contact),
            HitOutcome::Applied { lethal: false }
        );
        assert_eq!(cs.hp, 25);
        let k = cs.knockback.unwrap();
        assert_eq!((k.vx, k.vy), (-240.0, 0.0));
        assert_eq!(k.ticks, 8);
    }

    #[test]
    fn knockback_direction_is_away_from_source() {
        let mut cs = fresh(30);
        // Source to the left → pushed right
        cs.apply_knockback_from((10.0, 0.0), (0.0, 0.0), 100.0, 5);
        let k = cs.knockback.unwrap();
        assert!(k.vx > 0.0);
        assert_eq!(k.vy, 0.0);
    }

    #[test]
    fn degenerate_knockback_direction_falls_back_to_plus_x() {
        let mut cs = fresh(30);
        cs.apply_knockback_from((5.0, 5.0), (5.0, 5.0), 100.0, 5);
        let k = cs.knockback.unwrap();
        assert_eq!((k.vx, k.vy), (100.0, 0.0));
    }

    #[test]
    fn knockback_delta_consumes_and_clears() {
        let mut cs = fresh(30);
        cs.apply_knockback_from((1.0, 0.0), (0.0, 0.0), 60.0, 2);
        let dt = 1.0 / 60.0;
        assert_eq!(cs.knockback_delta(dt), Some((1.0, 0.0)));
        assert_eq!(cs.knockback_delta(dt), Some((1.0, 0.0)));
        assert_eq!(cs.knockback_delta(dt), None);
        assert!(cs.knockback.is_none());
    }

    // ── forced cooldown ──

    #[test]
    fn guarded_swing_forces_cooldown() {
        let mut cs = fresh(30);
        cs.start_attack(AttackId(1));
        cs.cancel_attack_and_start_cooldown(75);
        assert!(cs.attack.is_none());
        assert_eq!(cs.cooldown_ticks, 75);
        assert_eq!(cs.phase(), CombatPhase::Cooldown);
    }

    #[test]
    fn cancel_without_attack_is_a_no_op() {
        let mut cs = fresh(30);
        cs.cancel_attack_and_start_cooldown(75);
        assert_eq!(cs.cooldown_ticks, 0);
    }

    // ── phase projection ──

    #[test]
    fn phase_priorities() {
        let mut cs = fresh(30);
        assert_eq!(cs.phase(), CombatPhase::Idle);

        cs.cooldown_ticks = 5;
        assert_eq!(cs.phase(), CombatPhase::Cooldown);

        cs.guarding = true;
        assert_eq!(cs.phase(), CombatPhase::Guarding);

        cs.start_attack(AttackId(1));
        assert_eq!(cs.phase(), CombatPhase::Guarding); // guard refused the start
        cs.guarding = false;
        cs.start_attack(AttackId(1));
        assert_eq!(cs.phase(), CombatPhase::Attacking);

        cs.apply_knockback_from((0.0, 0.0), (1.0, 0.0), 100.0, 3);
        assert_eq!(cs.phase(), CombatPhase::Knockback);

        cs.dead = true;
        assert_eq!(cs.phase(), CombatPhase::Dying);

        cs.removed = true;
        assert_eq!(cs.phase(), CombatPhase::Removed);
    }
}
