/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Player integration (input, movement, swing clock)
///   2. Warrior integration (AI, movement, swing clocks)
///   3. Player strike pass (this tick's hitbox vs. warrior hurtboxes)
///   4. Warrior strike pass (hitbox vs. player hurtbox, guard check)
///   5. Contact pass (body overlap, lower-tuned, never shoves)
///   6. Reap (Removed warriors leave; a Removed player ends the session)
///
/// The strike passes read hitboxes computed in this tick's integration,
/// never last tick's. All damage funnels through `take_hit` here, so
/// the per-swing-id discipline holds across every source.

use crate::domain::combat::HitOutcome;
use crate::domain::entity::FrameInput;
use super::event::GameEvent;
use super::world::{Phase, World, TICK_SECS};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut World, input: FrameInput) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    integrate_player(world, input, &mut events);
    integrate_warriors(world, &mut events);
    resolve_player_strikes(world, &mut events);
    resolve_warrior_strikes(world, &mut events);
    resolve_contact(world, &mut events);
    reap(world, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Integration
// ══════════════════════════════════════════════════════════════

fn integrate_player(world: &mut World, input: FrameInput, events: &mut Vec<GameEvent>) {
    let World { player, arena, attack_ids, .. } = world;
    if let Some(phase) = player.update(input, &arena.colliders, attack_ids, TICK_SECS) {
        events.push(GameEvent::PlayerSwing { phase });
    }
}

fn integrate_warriors(world: &mut World, events: &mut Vec<GameEvent>) {
    let player_pos = (world.player.x, world.player.y);
    let World { warriors, arena, attack_ids, .. } = world;
    for (idx, warrior) in warriors.iter_mut().enumerate() {
        if warrior.update(player_pos, &arena.colliders, attack_ids, TICK_SECS) {
            events.push(GameEvent::EnemySwing { idx });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Strike passes
// ══════════════════════════════════════════════════════════════

fn resolve_player_strikes(world: &mut World, events: &mut Vec<GameEvent>) {
    let (strike, id) = match world.player.active_strike() {
        Some(s) => s,
        None => return,
    };
    let damage = world.player.tuning.attack_damage;
    let from = (world.player.x, world.player.y);

    for (idx, warrior) in world.warriors.iter_mut().enumerate() {
        if warrior.combat.dead { continue; }
        if !strike.overlaps(&warrior.hurtbox()) { continue; }

        match warrior.take_hit(damage, id, from) {
            HitOutcome::Applied { lethal: true } => {
                events.push(GameEvent::EnemyDied { idx });
            }
            HitOutcome::Applied { lethal: false } => {
                events.push(GameEvent::EnemyHit { idx, hp_left: warrior.combat.hp });
            }
            HitOutcome::Blocked | HitOutcome::Ignored => {}
        }
    }
}

fn resolve_warrior_strikes(world: &mut World, events: &mut Vec<GameEvent>) {
    let player_box = world.player.hurtbox();

    for i in 0..world.warriors.len() {
        let (strike, id) = match world.warriors[i].active_strike() {
            Some(s) => s,
            None => continue,
        };
        if !strike.overlaps(&player_box) { continue; }

        let damage = world.warriors[i].tuning.attack_damage;
        let from = (world.warriors[i].x, world.warriors[i].y);

        match world.player.take_hit(damage, id, from) {
            HitOutcome::Blocked => {
                // The skid on the defender already happened inside
                // take_hit; here the attacker pays: its swing is cut
                // short into forced recovery.
                let cooldown = world.warriors[i].tuning.attack_cooldown_ticks;
                world.warriors[i].combat.cancel_attack_and_start_cooldown(cooldown);
                events.push(GameEvent::GuardBlock);
            }
            HitOutcome::Applied { lethal: true } => {
                events.push(GameEvent::PlayerDied);
            }
            HitOutcome::Applied { lethal: false } => {
                events.push(GameEvent::PlayerHit { hp_left: world.player.combat.hp });
            }
            HitOutcome::Ignored => {}
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Contact damage
// ══════════════════════════════════════════════════════════════

fn resolve_contact(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.player.combat.dead { return; }
    let player_box = world.player.hurtbox();

    for i in 0..world.warriors.len() {
        if world.warriors[i].combat.dead { continue; }
        if !world.warriors[i].hurtbox().overlaps(&player_box) { continue; }

        let damage = world.warriors[i].tuning.contact_damage;
        let from = (world.warriors[i].x, world.warriors[i].y);

        match world.player.take_contact(damage, from) {
            HitOutcome::Applied { lethal: true } => {
                events.push(GameEvent::PlayerDied);
            }
            HitOutcome::Applied { lethal: false } => {
                events.push(GameEvent::PlayerHit { hp_left: world.player.combat.hp });
            }
            // A guarded graze costs the attacker nothing; i-frames
            // swallow the rest silently.
            HitOutcome::Blocked | HitOutcome::Ignored => {}
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Reap
// ══════════════════════════════════════════════════════════════

fn reap(world: &mut World, events: &mut Vec<GameEvent>) {
    world.warriors.retain(|w| !w.combat.removed);

    if !world.cleared && world.warriors.is_empty() {
        world.cleared = true;
        events.push(GameEvent::EncounterCleared);
    }

    if world.player.combat.removed {
        world.phase = Phase::GameOver;
        events.push(GameEvent::GameOver);
    }
}

// ══════════════════════════════════════════════════════════════
// Integration tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::combat::AttackPhase;
    use crate::domain::entity::{PlayerTuning, WarriorTuning};
    use crate::sim::arena::parse_arena;

    fn world_from(grid: &str) -> World {
        let arena = parse_arena(grid).unwrap();
        World::new(arena, PlayerTuning::default(), WarriorTuning::default())
    }

    /// Player at (48,48), warrior 32 px to the right at (80,48) —
    /// inside the warrior's stop radius, outside body contact.
    fn duel_world() -> World {
        world_from("#####\n#PE #\n#####")
    }

    /// Park the warrior: never aggro, never ready to swing.
    fn pacify(world: &mut World) {
        world.warriors[0].tuning.aggro_radius = 0.0;
        world.warriors[0].combat.cooldown_ticks = 100_000;
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn press_attack() -> FrameInput {
        FrameInput { attack_held: true, ..FrameInput::default() }
    }

    fn hold_guard() -> FrameInput {
        FrameInput { guard_held: true, ..FrameInput::default() }
    }

    #[test]
    fn swing_lands_once_when_its_window_opens() {
        let mut world = duel_world();
        pacify(&mut world);

        let ev = step(&mut world, press_attack()); // swing clock at 1
        assert!(ev.iter().any(|e| matches!(e, GameEvent::PlayerSwing { phase: AttackPhase::One })));

        // Window opens at swing tick 7; ticks 2..=6 draw no blood
        for _ in 2..=6 {
            let ev = step(&mut world, idle());
            assert!(ev.iter().all(|e| !matches!(e, GameEvent::EnemyHit { .. })));
            assert_eq!(world.warriors[0].combat.hp, 30);
        }

        let ev = step(&mut world, idle()); // tick 7
        assert!(ev.iter().any(|e| matches!(e, GameEvent::EnemyHit { idx: 0, hp_left: 20 })));

        // Same swing id for the rest of the window: no second bite
        for _ in 8..=24 {
            let ev = step(&mut world, idle());
            assert!(ev.iter().all(|e| !matches!(e, GameEvent::EnemyHit { .. })));
        }
        assert_eq!(world.warriors[0].combat.hp, 20);
    }

    #[test]
    fn three_swings_fell_the_warrior_and_clear_the_arena() {
        let mut world = duel_world();
        pacify(&mut world);

        // Swing 1: steps 1..=24, hit on 7 (30 → 20)
        step(&mut world, press_attack());
        for _ in 2..=24 { step(&mut world, idle()); }
        assert_eq!(world.warriors[0].combat.hp, 20);

        // Swing 2 chains off the combo window: hit on step 31 (20 → 10)
        let ev = step(&mut world, press_attack());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::PlayerSwing { phase: AttackPhase::Two })));
        for _ in 26..=48 { step(&mut world, idle()); }
        assert_eq!(world.warriors[0].combat.hp, 10);

        // Swing 3 is a fresh chain (combo spent): kill on step 55
        let ev = step(&mut world, press_attack());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::PlayerSwing { phase: AttackPhase::One })));
        let mut died_at = None;
        for n in 50..=55 {
            let ev = step(&mut world, idle());
            if ev.iter().any(|e| matches!(e, GameEvent::EnemyDied { idx: 0 })) {
                died_at = Some(n);
            }
        }
        assert_eq!(died_at, Some(55));
        assert_eq!(world.warriors[0].combat.hp, 0);
        assert!(world.warriors[0].combat.dead);

        // Fade runs 36 ticks, then the corpse leaves and the arena clears
        for _ in 56..=90 {
            let ev = step(&mut world, idle());
            assert!(ev.iter().all(|e| !matches!(e, GameEvent::EncounterCleared)));
        }
        assert_eq!(world.warriors.len(), 1);

        let ev = step(&mut world, idle()); // step 91
        assert!(world.warriors.is_empty());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::EncounterCleared)));
        assert!(world.cleared);
        assert_eq!(world.phase, Phase::Playing); // clearing never ends the session

        // Latched: no repeat celebration
        let ev = step(&mut world, idle());
        assert!(ev.iter().all(|e| !matches!(e, GameEvent::EncounterCleared)));
    }

    #[test]
    fn guard_turns_a_swing_into_a_block() {
        let mut world = duel_world();

        // Warrior opens its swing immediately (in reach, cooldown 0)
        let ev = step(&mut world, hold_guard());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::EnemySwing { idx: 0 })));

        // Windup runs through warrior swing tick 8 = step 9
        let mut ev = vec![];
        for _ in 2..=9 {
            ev = step(&mut world, hold_guard());
        }

        assert!(ev.iter().any(|e| matches!(e, GameEvent::GuardBlock)));
        assert_eq!(world.player.combat.hp, 100); // unscratched
        assert!(world.player.combat.knockback.is_some()); // but skidding
        assert!(world.warriors[0].combat.attack.is_none()); // swing cut short
        assert_eq!(world.warriors[0].combat.cooldown_ticks, 75);
    }

    #[test]
    fn unguarded_swing_draws_blood() {
        let mut world = duel_world();

        let mut hit = None;
        for n in 1..=9 {
            let ev = step(&mut world, idle());
            if ev.iter().any(|e| matches!(e, GameEvent::PlayerHit { hp_left: 90 })) {
                hit = Some(n);
            }
        }
        assert_eq!(hit, Some(9));
        assert_eq!(world.player.combat.hp, 90);
        assert!(world.player.combat.knockback.is_some());
    }

    #[test]
    fn contact_grazes_on_a_cadence_and_never_shoves() {
        let mut world = duel_world();
        pacify(&mut world);
        world.warriors[0].x = world.player.x + 12.0; // bodies overlapping

        let ev = step(&mut world, idle());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::PlayerHit { hp_left: 95 })));
        assert!(world.player.combat.knockback.is_none());

        // I-frames gate the cadence: nothing until they run out
        for _ in 2..=24 {
            step(&mut world, idle());
            assert_eq!(world.player.combat.hp, 95);
        }
        step(&mut world, idle()); // step 25: i-frames expired this tick
        assert_eq!(world.player.combat.hp, 90);
        assert!(world.player.combat.knockback.is_none());
    }

    #[test]
    fn player_death_flips_the_session_to_game_over() {
        let mut world = duel_world();
        world.player.combat.hp = 5;

        // Warrior swing lands on step 9
        let mut ev = vec![];
        for _ in 1..=9 {
            ev = step(&mut world, idle());
        }
        assert!(ev.iter().any(|e| matches!(e, GameEvent::PlayerDied)));
        assert!(world.player.combat.dead);
        assert!(world.player.combat.knockback.is_none()); // death stills the body
        assert_eq!(world.phase, Phase::Playing); // fading, not over yet

        // Fade 36 ticks: steps 10..=45
        for _ in 10..=44 {
            step(&mut world, idle());
        }
        assert_eq!(world.phase, Phase::Playing);
        let ev = step(&mut world, idle()); // step 45
        assert!(ev.iter().any(|e| matches!(e, GameEvent::GameOver)));
        assert_eq!(world.phase, Phase::GameOver);

        // A finished session is frozen solid
        let tick = world.tick;
        let ev = step(&mut world, press_attack());
        assert!(ev.is_empty());
        assert_eq!(world.tick, tick);

        // Restart rebuilds the duel
        world.restart();
        assert_eq!(world.phase, Phase::Playing);
        assert_eq!(world.player.combat.hp, 100);
        assert_eq!(world.warriors.len(), 1);
    }

    #[test]
    fn empty_arena_clears_on_the_first_tick() {
        let mut world = world_from("####\n#P #\n####");
        let ev = step(&mut world, idle());
        assert!(ev.iter().any(|e| matches!(e, GameEvent::EncounterCleared)));
        assert_eq!(world.phase, Phase::Playing);
    }
}
