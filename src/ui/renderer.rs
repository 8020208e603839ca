/// Terminal renderer: double-buffered cell grid, flushed as a diff.
///
/// ## Buffers
/// Each frame is composed into `back` (a flat `Cell` grid), then
/// `flush_diff` walks both buffers and emits ANSI only for cells that
/// changed, batching cursor moves and color switches. The buffers are
/// swapped afterwards. On resize, or when the session phase flips and
/// the whole screen changes meaning, `front` is filled with a sentinel
/// that can never equal a composed cell, forcing a full repaint.
///
/// ## Camera
/// Actors live in world pixels. One terminal cell covers 8×16 of them,
/// so a 32 px tile is 4 columns by 2 rows and comes out roughly square
/// on screen. The camera is a top-left offset in world pixels, centered
/// on the player and clamped to the arena (arenas smaller than the
/// viewport are centered instead).
///
/// ## Layout
/// Row 0 is the HUD, row 1 the banner line, the map fills the middle,
/// and the last row is the key help. The game-over overlay draws a box
/// over the frozen map.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::domain::entity::Facing;
use crate::domain::geometry::Rect;
use crate::sim::arena::{ArenaDef, TILE};
use crate::sim::world::{ActorView, Phase, Snapshot};

use super::sprite::{mirror_char, SpriteSet, PLACEHOLDER};

// ── screen geometry ──

const HUD_ROW: u16 = 0;
const BANNER_ROW: u16 = 1;
const MAP_ROW: u16 = 2;
const MIN_W: u16 = 40;
const MIN_H: u16 = 12;

/// World pixels covered by one terminal cell.
const CELL_W_PX: f32 = 8.0;
const CELL_H_PX: f32 = 16.0;

/// A 32 px tile, in cells.
const TILE_COLS: i32 = 4;
const TILE_ROWS: i32 = 2;

// ── palette ──

/// Same explicit dark bg for cleared screen and every composed cell,
/// so inter-row gap pixels on VTE terminals match and no lines show.
const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
const VOID_BG: Color = Color::Rgb { r: 12, g: 12, b: 20 };
const CHROME_BG: Color = Color::Rgb { r: 16, g: 16, b: 26 };
const WALL_FG: Color = Color::Rgb { r: 84, g: 84, b: 106 };
const WALL_BG: Color = Color::Rgb { r: 40, g: 40, b: 54 };
const FLOOR_DOT_FG: Color = Color::Rgb { r: 42, g: 42, b: 60 };
const TEXT_FG: Color = Color::Rgb { r: 200, g: 200, b: 212 };
const FAINT_FG: Color = Color::Rgb { r: 118, g: 118, b: 140 };
const GOLD_FG: Color = Color::Rgb { r: 240, g: 200, b: 80 };
const BLOOD_FG: Color = Color::Rgb { r: 235, g: 80, b: 80 };

const PLAYER_FG: Color = Color::Rgb { r: 120, g: 200, b: 255 };
const WARRIOR_FG: Color = Color::Rgb { r: 235, g: 130, b: 95 };
const DIM_FG: Color = Color::Rgb { r: 75, g: 80, b: 92 };
const MISSING_ART_FG: Color = Color::Rgb { r: 220, g: 80, b: 220 };

const TINT_COLLIDER: Color = Color::Rgb { r: 42, g: 58, b: 96 };
const TINT_HURTBOX: Color = Color::Rgb { r: 30, g: 88, b: 42 };
const TINT_STRIKE: Color = Color::Rgb { r: 138, g: 40, b: 40 };

// ══════════════════════════════════════════════════════════════
// Cell grid
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell { ch: ' ', fg: Color::Reset, bg: VOID_BG };

/// Never equals any composed cell, so a diff against it repaints.
const INVALID: Cell = Cell { ch: '\0', fg: Color::Reset, bg: Color::Reset };

struct FrameBuffer {
    w: u16,
    h: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: u16, h: u16) -> Self {
        FrameBuffer { w, h, cells: vec![BLANK; w as usize * h as usize] }
    }

    #[inline]
    fn idx(&self, col: u16, row: u16) -> usize {
        row as usize * self.w as usize + col as usize
    }

    fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Whole-cell write, clipped against the buffer.
    fn put(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= self.w as i32 || row >= self.h as i32 {
            return;
        }
        let i = self.idx(col as u16, row as u16);
        self.cells[i] = cell;
    }

    /// Glyph-over-background write: keeps whatever bg is already there,
    /// which is what lets sprites sit on the floor without a halo.
    fn put_glyph(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if col < 0 || row < 0 || col >= self.w as i32 || row >= self.h as i32 {
            return;
        }
        let i = self.idx(col as u16, row as u16);
        self.cells[i].ch = ch;
        self.cells[i].fg = fg;
    }

    /// Background-only write, for debug tints over composed content.
    fn tint(&mut self, col: i32, row: i32, bg: Color) {
        if col < 0 || row < 0 || col >= self.w as i32 || row >= self.h as i32 {
            return;
        }
        let i = self.idx(col as u16, row as u16);
        self.cells[i].bg = bg;
    }

    fn put_str(&mut self, col: i32, row: i32, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.put(col + i as i32, row, Cell { ch, fg, bg });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Camera
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Default)]
struct Camera {
    x: f32,
    y: f32,
}

impl Camera {
    fn center_on(&mut self, tx: f32, ty: f32, view_w: f32, view_h: f32, world_w: f32, world_h: f32) {
        self.x = camera_axis(tx, view_w, world_w);
        self.y = camera_axis(ty, view_h, world_h);
    }
}

fn camera_axis(target: f32, view: f32, world: f32) -> f32 {
    if world <= view {
        (world - view) / 2.0
    } else {
        (target - view / 2.0).clamp(0.0, world - view)
    }
}

/// World pixel → buffer cell (row includes the map's screen offset).
#[inline]
fn view_cell(cam: &Camera, wx: f32, wy: f32) -> (i32, i32) {
    (
        ((wx - cam.x) / CELL_W_PX).floor() as i32,
        ((wy - cam.y) / CELL_H_PX).floor() as i32 + MAP_ROW as i32,
    )
}

// ══════════════════════════════════════════════════════════════
// Renderer
// ══════════════════════════════════════════════════════════════

pub struct Renderer {
    out: BufWriter<Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    w: u16,
    h: u16,
    camera: Camera,
    last_phase: Phase,
    arena: ArenaDef,
    grid: Vec<Vec<char>>,
    player_sprites: SpriteSet,
    warrior_sprites: SpriteSet,
    show_colliders: bool,
    show_hitboxes: bool,
}

impl Renderer {
    pub fn new(arena: ArenaDef, show_colliders: bool, show_hitboxes: bool) -> Self {
        let grid = arena.rows.iter().map(|r| r.chars().collect()).collect();
        Renderer {
            out: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            w: 0,
            h: 0,
            camera: Camera::default(),
            last_phase: Phase::Playing,
            arena,
            grid,
            player_sprites: SpriteSet::player(),
            warrior_sprites: SpriteSet::warrior(),
            show_colliders,
            show_hitboxes,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.out, ResetColor, Clear(ClearType::All), Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, snap: &Snapshot) -> io::Result<()> {
        let (tw, th) = terminal::size()?;
        if tw != self.w || th != self.h {
            self.w = tw;
            self.h = th;
            self.front = FrameBuffer::new(tw, th);
            self.front.fill(INVALID);
            self.back = FrameBuffer::new(tw, th);
            queue!(self.out, Clear(ClearType::All))?;
        }
        if snap.phase != self.last_phase {
            self.last_phase = snap.phase;
            self.front.fill(INVALID);
        }

        self.back.fill(BLANK);
        if self.w < MIN_W || self.h < MIN_H {
            self.back.put_str(0, 0, "Terminal too small", TEXT_FG, VOID_BG);
            return self.flush_diff();
        }

        let map_rows = self.h - MAP_ROW - 1;
        self.camera.center_on(
            snap.player.x + TILE / 2.0,
            snap.player.y + TILE / 2.0,
            self.w as f32 * CELL_W_PX,
            map_rows as f32 * CELL_H_PX,
            self.arena.width_px(),
            self.arena.height_px(),
        );

        self.compose_arena(map_rows);
        if self.show_colliders {
            for rect in &self.arena.colliders {
                tint_world_rect(&mut self.back, &self.camera, *rect, TINT_COLLIDER, map_rows);
            }
        }
        self.compose_actors(snap, map_rows);
        if self.show_colliders || self.show_hitboxes {
            self.compose_debug_boxes(snap, map_rows);
        }
        self.compose_hud(snap);
        self.compose_help();
        if snap.phase == Phase::GameOver {
            self.compose_game_over(map_rows);
        }

        self.flush_diff()
    }

    // ── composition ──

    fn compose_arena(&mut self, map_rows: u16) {
        for row in 0..map_rows {
            for col in 0..self.w {
                let wx = self.camera.x + col as f32 * CELL_W_PX;
                let wy = self.camera.y + row as f32 * CELL_H_PX;
                if wx < 0.0 || wy < 0.0 || wx >= self.arena.width_px() || wy >= self.arena.height_px() {
                    continue;
                }
                let tx = (wx / TILE) as usize;
                let ty = (wy / TILE) as usize;
                let tile = self.grid.get(ty).and_then(|r| r.get(tx)).copied().unwrap_or(' ');
                let cell = if tile == '#' {
                    Cell { ch: '█', fg: WALL_FG, bg: WALL_BG }
                } else {
                    // A faint dot on each tile corner keeps motion
                    // readable on an otherwise featureless floor.
                    let corner = (wx as i64 % TILE as i64) < CELL_W_PX as i64
                        && (wy as i64 % TILE as i64) < CELL_H_PX as i64;
                    let ch = if corner { '·' } else { ' ' };
                    Cell { ch, fg: FLOOR_DOT_FG, bg: BASE_BG }
                };
                self.back.put(col as i32, (MAP_ROW + row) as i32, cell);
            }
        }
    }

    fn compose_actors(&mut self, snap: &Snapshot, map_rows: u16) {
        // Painter's order: lower feet draw later. The player wins ties
        // so they stay readable in a pile.
        let mut order: Vec<(&ActorView, bool)> =
            snap.warriors.iter().map(|w| (w, false)).collect();
        order.push((&snap.player, true));
        order.sort_by(|a, b| {
            let ya = a.0.y + if a.1 { 0.1 } else { 0.0 };
            let yb = b.0.y + if b.1 { 0.1 } else { 0.0 };
            ya.total_cmp(&yb)
        });

        for (view, is_player) in order {
            let sprites = if is_player { &self.player_sprites } else { &self.warrior_sprites };
            let body_fg = if is_player { PLAYER_FG } else { WARRIOR_FG };
            draw_actor(&mut self.back, &self.camera, sprites, view, body_fg, !is_player, map_rows);
        }
    }

    fn compose_debug_boxes(&mut self, snap: &Snapshot, map_rows: u16) {
        let fb = &mut self.back;
        let cam = &self.camera;
        let mut views: Vec<&ActorView> = snap.warriors.iter().collect();
        views.push(&snap.player);
        for view in views {
            if self.show_colliders {
                tint_world_rect(fb, cam, view.collider, TINT_COLLIDER, map_rows);
            }
            if self.show_hitboxes {
                tint_world_rect(fb, cam, view.hurtbox, TINT_HURTBOX, map_rows);
                if let Some(strike) = view.strike {
                    tint_world_rect(fb, cam, strike, TINT_STRIKE, map_rows);
                }
            }
        }
    }

    fn compose_hud(&mut self, snap: &Snapshot) {
        for col in 0..self.w {
            self.back.put(col as i32, HUD_ROW as i32, Cell { ch: ' ', fg: TEXT_FG, bg: CHROME_BG });
        }

        let hp = snap.player.hp.max(0);
        let max_hp = snap.player.max_hp.max(1);
        let bar_w = 20i32;
        let filled = (hp as f32 / max_hp as f32 * bar_w as f32).round() as i32;
        let bar_fg = match hp as f32 / max_hp as f32 {
            p if p > 0.5 => Color::Rgb { r: 90, g: 200, b: 110 },
            p if p > 0.25 => GOLD_FG,
            _ => BLOOD_FG,
        };

        self.back.put_str(1, HUD_ROW as i32, "HP ", TEXT_FG, CHROME_BG);
        for i in 0..bar_w {
            let ch = if i < filled { '█' } else { '░' };
            let fg = if i < filled { bar_fg } else { Color::Rgb { r: 60, g: 60, b: 75 } };
            self.back.put(4 + i, HUD_ROW as i32, Cell { ch, fg, bg: CHROME_BG });
        }
        let numbers = format!(" {}/{}", hp, max_hp);
        self.back.put_str(4 + bar_w, HUD_ROW as i32, &numbers, TEXT_FG, CHROME_BG);

        let foes = snap.warriors.iter().filter(|w| w.hp > 0).count();
        let foes_text = format!("Foes {}", foes);
        let foes_col = 4 + bar_w + numbers.chars().count() as i32 + 3;
        self.back.put_str(foes_col, HUD_ROW as i32, &foes_text, TEXT_FG, CHROME_BG);

        let name = self.arena.name.clone();
        let name_col = self.w as i32 - name.chars().count() as i32 - 1;
        self.back.put_str(name_col, HUD_ROW as i32, &name, FAINT_FG, CHROME_BG);

        if snap.cleared && snap.phase == Phase::Playing {
            let banner = "*** Arena cleared ***";
            let col = (self.w as i32 - banner.chars().count() as i32) / 2;
            self.back.put_str(col, BANNER_ROW as i32, banner, GOLD_FG, VOID_BG);
        }
    }

    fn compose_help(&mut self) {
        let row = (self.h - 1) as i32;
        for col in 0..self.w {
            self.back.put(col as i32, row, Cell { ch: ' ', fg: FAINT_FG, bg: CHROME_BG });
        }
        let help = "WASD/arrows move   J attack   K guard   R restart   Q quit";
        self.back.put_str(1, row, help, FAINT_FG, CHROME_BG);
    }

    fn compose_game_over(&mut self, map_rows: u16) {
        let box_w = 34i32;
        let box_h = 7i32;
        let left = (self.w as i32 - box_w) / 2;
        let top = MAP_ROW as i32 + (map_rows as i32 - box_h) / 2;

        let border_fg = Color::Rgb { r: 150, g: 150, b: 170 };
        let box_bg = Color::Rgb { r: 34, g: 20, b: 26 };
        let hline = "─".repeat(box_w as usize - 2);
        let blank = " ".repeat(box_w as usize - 2);

        self.back.put_str(left, top, &format!("┌{}┐", hline), border_fg, box_bg);
        for r in 1..box_h - 1 {
            self.back.put_str(left, top + r, &format!("│{}│", blank), border_fg, box_bg);
        }
        self.back.put_str(left, top + box_h - 1, &format!("└{}┘", hline), border_fg, box_bg);

        let title = "G A M E   O V E R";
        let title_col = left + (box_w - title.chars().count() as i32) / 2;
        self.back.put_str(title_col, top + 2, title, BLOOD_FG, box_bg);

        let hint = "R restart      Q quit";
        let hint_col = left + (box_w - hint.chars().count() as i32) / 2;
        self.back.put_str(hint_col, top + 4, hint, TEXT_FG, box_bg);
    }

    // ── flush ──

    /// Emit only the cells that changed since the last flush, reusing
    /// the cursor position and current colors across runs of changes.
    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg: Option<Color> = None;
        let mut last_bg: Option<Color> = None;
        let mut cursor: Option<(u16, u16)> = None;

        for row in 0..self.h {
            for col in 0..self.w {
                let i = self.back.idx(col, row);
                let cell = self.back.cells[i];
                if cell == self.front.cells[i] {
                    continue;
                }
                if cursor != Some((col, row)) {
                    queue!(self.out, MoveTo(col, row))?;
                }
                if last_fg != Some(cell.fg) {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    last_fg = Some(cell.fg);
                }
                if last_bg != Some(cell.bg) {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    last_bg = Some(cell.bg);
                }
                queue!(self.out, Print(cell.ch))?;
                cursor = Some((col + 1, row));
            }
        }

        self.out.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Drawing helpers
// ══════════════════════════════════════════════════════════════

/// Draw one actor's current frame, mirrored when facing left, anchored
/// so the art's feet sit on the bottom edge of the actor's 4×2-cell
/// tile box with its width centered over it.
fn draw_actor(
    fb: &mut FrameBuffer,
    cam: &Camera,
    sprites: &SpriteSet,
    view: &ActorView,
    body_fg: Color,
    with_bar: bool,
    map_rows: u16,
) {
    if !view.visible {
        return;
    }
    let frame = sprites.frame(view.clip, view.frame);
    let fw = frame.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
    let fh = frame.len() as i32;

    let (box_col, box_row) = view_cell(cam, view.x, view.y);
    let left = box_col + (TILE_COLS - fw) / 2;
    let top = box_row + TILE_ROWS - fh;

    let fg = if view.dimmed {
        DIM_FG
    } else if frame == PLACEHOLDER {
        MISSING_ART_FG
    } else {
        body_fg
    };
    let mirrored = view.facing == Facing::Left;
    let map_end = (MAP_ROW + map_rows) as i32;

    for (r, line) in frame.iter().enumerate() {
        let row = top + r as i32;
        if row < MAP_ROW as i32 || row >= map_end {
            continue;
        }
        let mut chars: Vec<char> = line.chars().collect();
        if mirrored {
            chars.resize(fw as usize, ' ');
            chars.reverse();
            for c in &mut chars {
                *c = mirror_char(*c);
            }
        }
        for (c, &ch) in chars.iter().enumerate() {
            if ch != ' ' {
                fb.put_glyph(left + c as i32, row, ch, fg);
            }
        }
    }

    if with_bar && view.hp > 0 && view.hp < view.max_hp {
        let row = top - 1;
        if row >= MAP_ROW as i32 && row < map_end {
            let filled = (view.hp as f32 / view.max_hp as f32 * fw as f32).ceil() as i32;
            for i in 0..fw {
                let ch = if i < filled { '█' } else { '░' };
                let fg = if i < filled {
                    Color::Rgb { r: 220, g: 70, b: 70 }
                } else {
                    Color::Rgb { r: 90, g: 40, b: 40 }
                };
                fb.put_glyph(left + i, row, ch, fg);
            }
        }
    }
}

/// Repaint the background of every cell a world-space rect touches.
fn tint_world_rect(fb: &mut FrameBuffer, cam: &Camera, rect: Rect, bg: Color, map_rows: u16) {
    let (c0, r0) = view_cell(cam, rect.x, rect.y);
    let c1 = ((rect.x + rect.w - cam.x) / CELL_W_PX).ceil() as i32;
    let r1 = ((rect.y + rect.h - cam.y) / CELL_H_PX).ceil() as i32 + MAP_ROW as i32;
    let map_end = (MAP_ROW + map_rows) as i32;
    for row in r0.max(MAP_ROW as i32)..r1.min(map_end) {
        for col in c0.max(0)..c1 {
            fb.tint(col, row, bg);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
