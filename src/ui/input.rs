/// Keyboard intent sampling.
///
/// The simulation wants boolean intents, not key events: two held
/// movement axes, held attack/guard, an edge-triggered restart, and
/// quit. This layer drains crossterm events once per frame and answers
/// exactly those questions.
///
/// Terminals without the keyboard enhancement never report Release, so
/// a key counts as held while its last Press/Repeat is younger than
/// `HOLD_TIMEOUT`. Explicit Release events are honored once the
/// enhancement is confirmed working.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::domain::entity::FrameInput;

/// After this long without a Press/Repeat event, consider the key
/// released. Only matters when the terminal doesn't report Release.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key bindings ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_ATTACK: &[KeyCode] = &[KeyCode::Char('j'), KeyCode::Char('J')];
const KEYS_GUARD: &[KeyCode] = &[KeyCode::Char('k'), KeyCode::Char('K')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of the last Press/Repeat event per key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went "not held" → "held" during the latest drain.
    fresh_presses: Vec<KeyCode>,

    /// Ctrl+C seen during the latest drain.
    ctrl_c: bool,

    /// Whether to honor Release events. Only true when the keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before sampling intents.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let key = match event::read() {
                Ok(Event::Key(key)) => key,
                _ => continue,
            };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    self.last_active.remove(&key.code);
                }
                KeyEventKind::Release => {
                    // Enhancement not confirmed: rely on timeout expiry
                }
                _ => {
                    let was_held = self.held(key.code);
                    self.last_active.insert(key.code, Instant::now());
                    if !was_held {
                        self.fresh_presses.push(key.code);
                    }
                }
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    // ── Intent sampling ──

    /// The held intents the simulation consumes every tick.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            move_x: self.axis(KEYS_LEFT, KEYS_RIGHT),
            move_y: self.axis(KEYS_UP, KEYS_DOWN),
            attack_held: self.any_held(KEYS_ATTACK),
            guard_held: self.any_held(KEYS_GUARD),
        }
    }

    /// Edge-triggered: restart was freshly pressed this frame.
    pub fn restart_pressed(&self) -> bool {
        KEYS_RESTART.iter().any(|&c| self.fresh_presses.contains(&c))
    }

    pub fn quit_pressed(&self) -> bool {
        self.ctrl_c || KEYS_QUIT.iter().any(|&c| self.fresh_presses.contains(&c))
    }

    // ── Internal ──

    fn axis(&self, neg: &[KeyCode], pos: &[KeyCode]) -> f32 {
        let mut v = 0.0;
        if self.any_held(neg) { v -= 1.0; }
        if self.any_held(pos) { v += 1.0; }
        v
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|&c| self.held(c))
    }

    fn held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
