/// World: the complete state of a running encounter.
///
/// ## Ownership
///
/// The simulation thread owns the `World` outright and is its sole
/// mutator. Everything the presentation side needs crosses the thread
/// boundary as a `Snapshot` — a cheap copy taken after a tick batch,
/// never a live reference into actor state.
///
/// ## Session signal
///
/// `Phase` is the coarse game state: `Playing` until the player fades
/// out, then `GameOver`. Clearing the arena does not end the session;
/// it latches `cleared` and the HUD celebrates while the player keeps
/// the floor.

use crate::domain::anim::ClipKey;
use crate::domain::combat::AttackIdGen;
use crate::domain::entity::{Facing, Player, PlayerTuning, Warrior, WarriorTuning};
use crate::domain::geometry::Rect;
use crate::sim::arena::ArenaDef;

/// Simulation rate. One tick advances every actor by `TICK_SECS`.
pub const TICKS_PER_SECOND: u32 = 60;
pub const TICK_SECS: f32 = 1.0 / TICKS_PER_SECOND as f32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    GameOver,
}

pub struct World {
    // ── Arena ──
    pub arena: ArenaDef,

    // ── Actors ──
    pub player: Player,
    pub warriors: Vec<Warrior>,

    // ── Combat bookkeeping ──
    pub attack_ids: AttackIdGen,

    // ── Session ──
    pub phase: Phase,
    pub cleared: bool,
    pub tick: u64,

    // ── Tuning (kept so restart can rebuild the cast) ──
    pub player_tuning: PlayerTuning,
    pub warrior_tuning: WarriorTuning,
}

// ── Construction / restart ──

impl World {
    pub fn new(arena: ArenaDef, player_tuning: PlayerTuning, warrior_tuning: WarriorTuning) -> Self {
        let player = spawn_player(&arena, player_tuning);
        let warriors = spawn_warriors(&arena, warrior_tuning);
        World {
            arena,
            player,
            warriors,
            attack_ids: AttackIdGen::new(),
            phase: Phase::Playing,
            cleared: false,
            tick: 0,
            player_tuning,
            warrior_tuning,
        }
    }

    /// Rebuild the encounter from the arena definition: fresh cast,
    /// fresh attack ids, tick zero.
    pub fn restart(&mut self) {
        self.player = spawn_player(&self.arena, self.player_tuning);
        self.warriors = spawn_warriors(&self.arena, self.warrior_tuning);
        self.attack_ids = AttackIdGen::new();
        self.phase = Phase::Playing;
        self.cleared = false;
        self.tick = 0;
    }
}

fn spawn_player(arena: &ArenaDef, tuning: PlayerTuning) -> Player {
    let (x, y) = arena.player_spawn;
    Player::new(x, y, tuning)
}

fn spawn_warriors(arena: &ArenaDef, tuning: WarriorTuning) -> Vec<Warrior> {
    arena
        .warrior_spawns
        .iter()
        .map(|&(x, y)| Warrior::new(x, y, tuning))
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Snapshot: what the presentation thread sees
// ══════════════════════════════════════════════════════════════

/// One actor as the renderer needs it: position, clip, bars, boxes.
#[derive(Clone, Debug)]
pub struct ActorView {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
    pub clip: ClipKey,
    pub frame: u32,
    pub hp: i32,
    pub max_hp: i32,
    /// False while the invulnerability blink hides the sprite, or once
    /// the actor has finished fading out.
    pub visible: bool,
    /// Dying actors draw dim until removal.
    pub dimmed: bool,
    pub collider: Rect,
    pub hurtbox: Rect,
    pub strike: Option<Rect>,
}

#[derive(Clone, Debug)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: Phase,
    pub cleared: bool,
    pub player: ActorView,
    pub warriors: Vec<ActorView>,
}

impl Snapshot {
    pub fn of(world: &World) -> Self {
        Snapshot {
            tick: world.tick,
            phase: world.phase,
            cleared: world.cleared,
            player: player_view(&world.player),
            warriors: world
                .warriors
                .iter()
                .filter(|w| !w.combat.removed)
                .map(warrior_view)
                .collect(),
        }
    }
}

fn player_view(p: &Player) -> ActorView {
    ActorView {
        x: p.x,
        y: p.y,
        facing: p.facing,
        clip: p.playback.key,
        frame: p.playback.frame,
        hp: p.combat.hp,
        max_hp: p.tuning.max_hp,
        visible: !p.combat.removed && !p.combat.hit_flash_hidden(),
        dimmed: p.combat.dead,
        collider: p.collision_box(),
        hurtbox: p.hurtbox(),
        strike: p.active_strike().map(|(rect, _)| rect),
    }
}

fn warrior_view(w: &Warrior) -> ActorView {
    ActorView {
        x: w.x,
        y: w.y,
        facing: w.facing,
        clip: w.playback.key,
        frame: w.playback.frame,
        hp: w.combat.hp,
        max_hp: w.tuning.max_hp,
        visible: !w.combat.hit_flash_hidden(),
        dimmed: w.combat.dead,
        collider: w.collision_box(),
        hurtbox: w.hurtbox(),
        strike: w.active_strike().map(|(rect, _)| rect),
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
