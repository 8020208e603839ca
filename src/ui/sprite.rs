/// Text-art sprite clips.
///
/// A frame is a small grid of characters drawn 1:1 onto terminal
/// cells; space is transparent. All art is authored facing right and
/// mirrored at draw time for left-facing actors (`mirror_char` maps
/// the asymmetric glyphs). Clips are keyed exactly the way the
/// animation selector keys them; a key with no art degrades to a
/// visibly-marked placeholder frame instead of failing.

use std::collections::HashMap;

use crate::domain::anim::{AnimKind, ClipKey, MoveDir, SpriteTimings};

pub type Frame = &'static [&'static str];

/// Drawn for any clip that has no art. Loud on purpose.
pub const PLACEHOLDER: Frame = &[
    "▒▒▒▒",
    "▒??▒",
    "▒▒▒▒",
];

pub struct SpriteSet {
    clips: HashMap<ClipKey, &'static [Frame]>,
}

impl SpriteSet {
    pub fn player() -> Self {
        let timings = SpriteTimings::player();
        let mut set = SpriteSet { clips: HashMap::new() };

        set.insert(&timings, AnimKind::Idle, MoveDir::Down, PLAYER_IDLE);
        set.insert(&timings, AnimKind::Idle, MoveDir::Up, PLAYER_IDLE);
        set.insert(&timings, AnimKind::Idle, MoveDir::Side, PLAYER_IDLE);

        set.insert(&timings, AnimKind::Run, MoveDir::Down, PLAYER_RUN_DOWN);
        set.insert(&timings, AnimKind::Run, MoveDir::Up, PLAYER_RUN_UP);
        set.insert(&timings, AnimKind::Run, MoveDir::Side, PLAYER_RUN_SIDE);

        set.insert(&timings, AnimKind::Attack1, MoveDir::Down, PLAYER_ATTACK1_DOWN);
        set.insert(&timings, AnimKind::Attack1, MoveDir::Up, PLAYER_ATTACK1_UP);
        set.insert(&timings, AnimKind::Attack1, MoveDir::Side, PLAYER_ATTACK1_SIDE);

        set.insert(&timings, AnimKind::Attack2, MoveDir::Down, PLAYER_ATTACK2_DOWN);
        set.insert(&timings, AnimKind::Attack2, MoveDir::Up, PLAYER_ATTACK2_UP);
        set.insert(&timings, AnimKind::Attack2, MoveDir::Side, PLAYER_ATTACK2_SIDE);

        set.insert(&timings, AnimKind::Guard, MoveDir::Down, PLAYER_GUARD);
        set.insert(&timings, AnimKind::Guard, MoveDir::Up, PLAYER_GUARD);
        set.insert(&timings, AnimKind::Guard, MoveDir::Side, PLAYER_GUARD);

        set
    }

    pub fn warrior() -> Self {
        let timings = SpriteTimings::enemy();
        let mut set = SpriteSet { clips: HashMap::new() };

        for dir in [MoveDir::Down, MoveDir::Up, MoveDir::Side] {
            set.insert(&timings, AnimKind::Idle, dir, WARRIOR_IDLE);
            set.insert(&timings, AnimKind::Run, dir, WARRIOR_RUN);
            set.insert(&timings, AnimKind::Attack1, dir, WARRIOR_ATTACK1);
        }
        // No Attack2/Guard art: the warrior never plays them, and the
        // placeholder covers the day that changes.

        set
    }

    /// Frame for `key` at playback index `idx`, wrapped to clip length.
    pub fn frame(&self, key: ClipKey, idx: u32) -> Frame {
        match self.clips.get(&key) {
            Some(frames) if !frames.is_empty() => frames[idx as usize % frames.len()],
            _ => PLACEHOLDER,
        }
    }

    /// Register art for a clip, checking it against the timing table.
    /// A count mismatch warns and keeps the art: playback wraps, so the
    /// clip stutters visibly instead of crashing or vanishing.
    fn insert(
        &mut self,
        timings: &SpriteTimings,
        kind: AnimKind,
        dir: MoveDir,
        frames: &'static [Frame],
    ) {
        let want = timings.timing(kind).frames as usize;
        if frames.len() != want {
            eprintln!(
                "Sprite clip {:?}/{:?}: {} frames, timing expects {}",
                kind, dir, frames.len(), want,
            );
        }
        self.clips.insert(ClipKey::new(kind, dir), frames);
    }
}

/// Mirror one glyph for left-facing draws. Rows are also reversed by
/// the caller; together that flips a frame horizontally.
pub fn mirror_char(c: char) -> char {
    match c {
        '(' => ')', ')' => '(',
        '<' => '>', '>' => '<',
        '[' => ']', ']' => '[',
        '/' => '\\', '\\' => '/',
        '╱' => '╲', '╲' => '╱',
        '▌' => '▐', '▐' => '▌',
        '▖' => '▗', '▗' => '▖',
        '▘' => '▝', '▝' => '▘',
        '┐' => '┌', '┌' => '┐',
        '┘' => '└', '└' => '┘',
        '◜' => '◝', '◝' => '◜',
        '▶' => '◀', '◀' => '▶',
        other => other,
    }
}

// ══════════════════════════════════════════════════════════════
// Player art (7×5, authored facing right, sword hand on the right)
// ══════════════════════════════════════════════════════════════

const P_IDLE_A: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌╲ ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_IDLE_B: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌╱ ",
    "  ██   ",
    " ▌ ▐   ",
];
const PLAYER_IDLE: &[Frame] = &[
    P_IDLE_A, P_IDLE_A, P_IDLE_A, P_IDLE_A,
    P_IDLE_B, P_IDLE_B, P_IDLE_B, P_IDLE_B,
];

const P_RUN_S_OPEN: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌─ ",
    "  ██   ",
    " ╱ ╲   ",
];
const P_RUN_S_PASS: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌─ ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_RUN_S_CROSS: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌─ ",
    "  ██   ",
    "  ╳    ",
];
const PLAYER_RUN_SIDE: &[Frame] = &[
    P_RUN_S_OPEN, P_RUN_S_PASS, P_RUN_S_CROSS,
    P_RUN_S_PASS, P_RUN_S_OPEN, P_RUN_S_PASS,
];

const P_RUN_D_LEFT: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▗   ",
];
const P_RUN_D_PASS: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    "  █    ",
];
const P_RUN_D_RIGHT: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▖ ▐   ",
];
const PLAYER_RUN_DOWN: &[Frame] = &[
    P_RUN_D_LEFT, P_RUN_D_PASS, P_RUN_D_RIGHT,
    P_RUN_D_PASS, P_RUN_D_LEFT, P_RUN_D_PASS,
];

const P_RUN_U_LEFT: Frame = &[
    "  ▄▄   ",
    " (╳╳)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▗   ",
];
const P_RUN_U_PASS: Frame = &[
    "  ▄▄   ",
    " (╳╳)  ",
    " ▐██▌  ",
    "  ██   ",
    "  █    ",
];
const P_RUN_U_RIGHT: Frame = &[
    "  ▄▄   ",
    " (╳╳)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▖ ▐   ",
];
const PLAYER_RUN_UP: &[Frame] = &[
    P_RUN_U_LEFT, P_RUN_U_PASS, P_RUN_U_RIGHT,
    P_RUN_U_PASS, P_RUN_U_LEFT, P_RUN_U_PASS,
];

const P_ATK1_S_0: Frame = &[
    "  ▄▄ ╱ ",
    " (██)╱ ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_S_1: Frame = &[
    "  ▄▄   ",
    " (██)━ ",
    " ▐██▌━▶",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_S_2: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    "▐██▌━━▶",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_S_3: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌╲ ",
    "  ██ ╲ ",
    " ▌ ▐   ",
];
const PLAYER_ATTACK1_SIDE: &[Frame] =
    &[P_ATK1_S_0, P_ATK1_S_1, P_ATK1_S_2, P_ATK1_S_3];

const P_ATK1_D_0: Frame = &[
    "  ▄▄ ╱ ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_D_1: Frame = &[
    "  ▄▄   ",
    " (██)─ ",
    " ▐██▌╲ ",
    "  ██ ╲ ",
    " ▌ ▐ ▼ ",
];
const P_ATK1_D_2: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██╲  ",
    " ▌ ▐━▶ ",
];
const P_ATK1_D_3: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐╲  ",
];
const PLAYER_ATTACK1_DOWN: &[Frame] =
    &[P_ATK1_D_0, P_ATK1_D_1, P_ATK1_D_2, P_ATK1_D_3];

const P_ATK1_U_0: Frame = &[
    "  ▄▄   ",
    " (╳╳)╲ ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_U_1: Frame = &[
    "  ▄▄ │ ",
    " (╳╳)│ ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_U_2: Frame = &[
    " ▲ ▄▄  ",
    " │(╳╳) ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK1_U_3: Frame = &[
    "  ▄▄   ",
    " (╳╳)  ",
    " ▐██▌─ ",
    "  ██   ",
    " ▌ ▐   ",
];
const PLAYER_ATTACK1_UP: &[Frame] =
    &[P_ATK1_U_0, P_ATK1_U_1, P_ATK1_U_2, P_ATK1_U_3];

const P_ATK2_S_0: Frame = &[
    " ╲ ▄▄  ",
    "  ╲██) ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_S_1: Frame = &[
    "  ◜━◝  ",
    "  (██) ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_S_2: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌━▶",
    "  ██━▶ ",
    " ▌ ▐   ",
];
const P_ATK2_S_3: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██╲  ",
    " ▌ ▐╲  ",
];
const PLAYER_ATTACK2_SIDE: &[Frame] =
    &[P_ATK2_S_0, P_ATK2_S_1, P_ATK2_S_2, P_ATK2_S_3];

const P_ATK2_D_0: Frame = &[
    " ╲ ▄▄  ",
    "  ╲██) ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_D_1: Frame = &[
    "  ▄▄   ",
    " (██)─ ",
    " ▐██▌╲ ",
    "  ██ ╲ ",
    " ▌ ▐ ▼ ",
];
const P_ATK2_D_2: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██━▶ ",
    " ▌ ▐━▶ ",
];
const P_ATK2_D_3: Frame = &[
    "  ▄▄   ",
    " (██)  ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐╲  ",
];
const PLAYER_ATTACK2_DOWN: &[Frame] =
    &[P_ATK2_D_0, P_ATK2_D_1, P_ATK2_D_2, P_ATK2_D_3];

const P_ATK2_U_0: Frame = &[
    "  ▄▄   ",
    " (╳╳)╲ ",
    " ▐██▌╲ ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_U_1: Frame = &[
    "  ▄▄ │ ",
    " (╳╳)│ ",
    " ▐██▌│ ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_U_2: Frame = &[
    " ▲▲▄▄  ",
    " ││╳╳) ",
    " ▐██▌  ",
    "  ██   ",
    " ▌ ▐   ",
];
const P_ATK2_U_3: Frame = &[
    "  ▄▄   ",
    " (╳╳)  ",
    " ▐██▌─ ",
    "  ██   ",
    " ▌ ▐   ",
];
const PLAYER_ATTACK2_UP: &[Frame] =
    &[P_ATK2_U_0, P_ATK2_U_1, P_ATK2_U_2, P_ATK2_U_3];

const P_GUARD_A: Frame = &[
    "  ▄▄   ",
    " (██)▐ ",
    " ▐██▌▐ ",
    "  ██ ▐ ",
    " ▌ ▐   ",
];
const P_GUARD_B: Frame = &[
    "  ▄▄ ▐ ",
    " (██)▐ ",
    " ▐██▌▐ ",
    "  ██   ",
    " ▌ ▐   ",
];
const PLAYER_GUARD: &[Frame] =
    &[P_GUARD_A, P_GUARD_A, P_GUARD_B, P_GUARD_B, P_GUARD_A, P_GUARD_A];

// ══════════════════════════════════════════════════════════════
// Warrior art (5×4, authored facing right)
// ══════════════════════════════════════════════════════════════

const W_IDLE_A: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┐",
    " ▐ ▌ ",
];
const W_IDLE_B: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┘",
    " ▐ ▌ ",
];
const WARRIOR_IDLE: &[Frame] =
    &[W_IDLE_A, W_IDLE_A, W_IDLE_A, W_IDLE_B, W_IDLE_B, W_IDLE_B];

const W_RUN_OPEN: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┐",
    " ╱ ╲ ",
];
const W_RUN_PASS: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┐",
    " ▐ ▌ ",
];
const W_RUN_CROSS: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┐",
    "  ╳  ",
];
const WARRIOR_RUN: &[Frame] = &[
    W_RUN_OPEN, W_RUN_PASS, W_RUN_CROSS,
    W_RUN_PASS, W_RUN_OPEN, W_RUN_PASS,
];

const W_ATK1_0: Frame = &[
    " ▄▄▄╱",
    "(▓▓▓)",
    " ▓▓▓ ",
    " ▐ ▌ ",
];
const W_ATK1_1: Frame = &[
    " ▄▄▄│",
    "(▓▓▓)",
    " ▓▓▓ ",
    " ▐ ▌ ",
];
const W_ATK1_2: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    "▓▓▓━▶",
    " ▐ ▌ ",
];
const W_ATK1_3: Frame = &[
    " ▄▄▄ ",
    "(▓▓▓)",
    " ▓▓▓┐",
    " ▐ ▌ ",
];
const WARRIOR_ATTACK1: &[Frame] = &[W_ATK1_0, W_ATK1_1, W_ATK1_2, W_ATK1_3];

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
