/// Animation selection and playback. Selection is a pure mapping from
/// actor state to a clip key; playback is a counter that wraps frames
/// under a per-clip delay and restarts only when the key changes, so a
/// held pose never stutters.
use super::combat::AttackPhase;

/// What an actor is doing, as far as its sprite cares.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AnimKind {
    Idle,
    Run,
    Attack1,
    Attack2,
    Guard,
}

/// Which way an actor is moving or last moved. Side pairs with the
/// actor's facing flag for left/right mirroring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveDir {
    Down,
    Up,
    Side,
}

/// Key selecting one clip of a sprite set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClipKey {
    pub kind: AnimKind,
    pub dir: MoveDir,
}

impl ClipKey {
    pub fn new(kind: AnimKind, dir: MoveDir) -> Self {
        ClipKey { kind, dir }
    }
}

/// Reduce doing-state to a clip kind. An attack in flight always wins,
/// guard beats movement, movement beats idle.
pub fn select_kind(attack: Option<AttackPhase>, guarding: bool, moving: bool) -> AnimKind {
    match attack {
        Some(AttackPhase::One) => AnimKind::Attack1,
        Some(AttackPhase::Two) => AnimKind::Attack2,
        None if guarding => AnimKind::Guard,
        None if moving => AnimKind::Run,
        None => AnimKind::Idle,
    }
}

/// Frame timing for one clip: frame count and ticks per frame.
#[derive(Clone, Copy, Debug)]
pub struct ClipTiming {
    pub frames: u32,
    pub frame_delay: u32,
}

impl ClipTiming {
    /// Both counts clamp to at least one: a clip is never empty, and
    /// playback always advances.
    pub fn new(frames: u32, frame_delay: u32) -> Self {
        ClipTiming { frames: frames.max(1), frame_delay: frame_delay.max(1) }
    }

    /// Ticks for one full pass over the clip. Attack durations come
    /// from here, so combat timing and the visible swing agree.
    #[inline]
    pub fn duration_ticks(&self) -> u32 {
        self.frames * self.frame_delay
    }
}

/// Timing table for one actor archetype's sprite set.
#[derive(Clone, Copy, Debug)]
pub struct SpriteTimings {
    pub idle: ClipTiming,
    pub run: ClipTiming,
    pub attack1: ClipTiming,
    pub attack2: ClipTiming,
    pub guard: ClipTiming,
}

impl SpriteTimings {
    pub fn player() -> Self {
        SpriteTimings {
            idle: ClipTiming::new(8, 8),
            run: ClipTiming::new(6, 6),
            attack1: ClipTiming::new(4, 6),
            attack2: ClipTiming::new(4, 6),
            guard: ClipTiming::new(6, 10),
        }
    }

    pub fn enemy() -> Self {
        SpriteTimings {
            idle: ClipTiming::new(6, 8),
            run: ClipTiming::new(6, 6),
            attack1: ClipTiming::new(4, 6),
            attack2: ClipTiming::new(4, 6),
            guard: ClipTiming::new(1, 1),
        }
    }

    pub fn timing(&self, kind: AnimKind) -> ClipTiming {
        match kind {
            AnimKind::Idle => self.idle,
            AnimKind::Run => self.run,
            AnimKind::Attack1 => self.attack1,
            AnimKind::Attack2 => self.attack2,
            AnimKind::Guard => self.guard,
        }
    }
}

/// Playback cursor over the currently selected clip.
#[derive(Clone, Copy, Debug)]
pub struct Playback {
    pub key: ClipKey,
    pub frame: u32,
    counter: u32,
}

impl Playback {
    pub fn new(key: ClipKey) -> Self {
        Playback { key, frame: 0, counter: 0 }
    }

    /// Switch clips. Playback restarts only when the key actually
    /// changes; re-selecting the current clip is a no-op.
    pub fn set(&mut self, key: ClipKey) {
        if self.key != key {
            self.key = key;
            self.frame = 0;
            self.counter = 0;
        }
    }

    /// Advance one tick under `timing`, wrapping the frame index.
    pub fn update(&mut self, timing: ClipTiming) {
        self.counter += 1;
        if self.counter >= timing.frame_delay {
            self.counter = 0;
            self.frame = (self.frame + 1) % timing.frames;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
