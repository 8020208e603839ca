/// Entry point: wires config, arena, the simulation thread, and the
/// terminal front end together.
///
/// ## Threads
/// The simulation thread owns the world outright. It runs the
/// fixed-timestep accumulator loop and is the only code that mutates
/// game state; each pass it briefly takes the shared lock to read the
/// current intents and publish a fresh snapshot plus the ticks' events.
/// The main thread drains keyboard/gamepad input, writes intents,
/// renders the latest snapshot, and feeds events to the sound engine.
/// Either side raising `quit` stops both.

mod config;
mod domain;
mod sim;
mod ui;

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use config::GameConfig;
use domain::entity::{FrameInput, PlayerTuning, WarriorTuning};
use sim::arena::load_arena;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, Snapshot, World, TICK_SECS};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{self, SoundEngine};

/// Presentation frame pacing; the simulation paces itself.
const FRAME_SLEEP: Duration = Duration::from_millis(5);
const SIM_SLEEP: Duration = Duration::from_millis(2);

/// Everything that crosses the thread boundary, behind one lock.
struct Shared {
    input: FrameInput,
    /// Restart request edge; the simulation takes it and decides
    /// whether the session state allows a restart.
    restart: bool,
    quit: bool,
    snapshot: Snapshot,
    /// Events since the front end last drained them.
    events: Vec<GameEvent>,
}

/// A poisoned lock means the other thread panicked mid-update; the
/// data is plain-old-state, so keep going with whatever it holds.
fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("gridblade: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = GameConfig::load();
    let arena = load_arena(config.arena.as_deref())?;
    let world = World::new(arena.clone(), player_tuning(&config), warrior_tuning(&config));

    let shared = Arc::new(Mutex::new(Shared {
        input: FrameInput::default(),
        restart: false,
        quit: false,
        snapshot: Snapshot::of(&world),
        events: Vec::new(),
    }));
    let sim_thread = spawn_sim_thread(world, Arc::clone(&shared))?;

    let mut renderer = Renderer::new(arena, config.debug.show_colliders, config.debug.show_hitboxes);
    if let Err(e) = renderer.init() {
        lock_shared(&shared).quit = true;
        let _ = sim_thread.join();
        eprintln!("Terminal init failed: {e}");
        return Err(e.into());
    }

    let sound_engine = SoundEngine::new();

    let result = frontend_loop(&mut renderer, sound_engine.as_ref(), &config, &shared);

    // Stop the simulation before tearing the terminal down.
    lock_shared(&shared).quit = true;
    let _ = sim_thread.join();

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!();
    println!("Thanks for playing Gridblade!");
    Ok(())
}

// ══════════════════════════════════════════════════════════════
// Simulation thread
// ══════════════════════════════════════════════════════════════

fn spawn_sim_thread(
    mut world: World,
    shared: Arc<Mutex<Shared>>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("sim".into()).spawn(move || {
        let mut acc = 0.0_f32;
        let mut last = Instant::now();
        let mut events: Vec<GameEvent> = Vec::new();

        loop {
            let now = Instant::now();
            acc += (now - last).as_secs_f32();
            last = now;
            // A long stall (suspend, debugger) would otherwise replay
            // seconds of combat in one burst.
            acc = acc.min(0.25);

            let (input, restart) = {
                let mut s = lock_shared(&shared);
                if s.quit {
                    return;
                }
                (s.input, std::mem::take(&mut s.restart))
            };

            if restart && world.phase == Phase::GameOver {
                world.restart();
            }

            while acc >= TICK_SECS {
                acc -= TICK_SECS;
                events.extend(step::step(&mut world, input));
            }

            {
                let mut s = lock_shared(&shared);
                s.snapshot = Snapshot::of(&world);
                s.events.append(&mut events);
            }

            thread::sleep(SIM_SLEEP);
        }
    })
}

// ══════════════════════════════════════════════════════════════
// Front end
// ══════════════════════════════════════════════════════════════

fn frontend_loop(
    renderer: &mut Renderer,
    sfx: Option<&SoundEngine>,
    config: &GameConfig,
    shared: &Arc<Mutex<Shared>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let mut events: Vec<GameEvent> = Vec::new();

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            return Ok(());
        }

        let snap = {
            let mut s = lock_shared(shared);
            s.input = merge_input(&kb, &gp);
            if kb.restart_pressed() || gp.restart_pressed() {
                s.restart = true;
            }
            events.append(&mut s.events);
            s.snapshot.clone()
        };

        sound::process_events(sfx, &events);
        events.clear();

        renderer.render(&snap)?;
        thread::sleep(FRAME_SLEEP);
    }
}

/// Keyboard and gamepad both speak; a neutral keyboard axis yields to
/// the pad, and the buttons combine as plain "either holds it".
fn merge_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    let mut input = kb.frame_input();
    if input.move_x == 0.0 {
        input.move_x = gp.move_x();
    }
    if input.move_y == 0.0 {
        input.move_y = gp.move_y();
    }
    input.attack_held |= gp.attack_held();
    input.guard_held |= gp.guard_held();
    input
}

// ── config → tuning ──

fn player_tuning(config: &GameConfig) -> PlayerTuning {
    PlayerTuning {
        max_hp: config.tuning.player_hp,
        attack_damage: config.tuning.player_damage,
        move_speed: config.tuning.player_speed,
        ..PlayerTuning::default()
    }
}

fn warrior_tuning(config: &GameConfig) -> WarriorTuning {
    WarriorTuning {
        max_hp: config.tuning.warrior_hp,
        attack_damage: config.tuning.warrior_damage,
        contact_damage: config.tuning.contact_damage,
        chase_speed: config.tuning.warrior_speed,
        aggro_radius: config.tuning.aggro_radius,
        stop_radius: config.tuning.attack_radius,
        ..WarriorTuning::default()
    }
}
