/// Arena loader.
///
/// ## Sources (priority order):
///   1. Explicit path from config (`[assets] arena`)
///   2. `arena.txt` next to the executable, in the CWD, or in the
///      XDG/system data dirs
///   3. The built-in embedded arena
///
/// ## Format:
///   Line 1 (optional): `# Arena Name`
///   Remaining lines: the grid, one character per 32×32 px tile:
///     '#' = wall (solid collider)   'P' = player spawn
///     'E' = warrior spawn           ' ' = open floor
///
/// Consecutive walls in a row merge into a single collider, so a long
/// wall resolves as one box instead of a picket line of tiles.

use std::path::{Path, PathBuf};

use crate::domain::geometry::Rect;

/// Edge length of one grid tile in world pixels.
pub const TILE: f32 = 32.0;

/// Runtime arena data (owned rows, loaded from file or embedded).
#[derive(Clone, Debug)]
pub struct ArenaDef {
    pub name: String,
    pub rows: Vec<String>,
    pub width: usize,
    pub height: usize,
    pub colliders: Vec<Rect>,
    pub player_spawn: (f32, f32),
    pub warrior_spawns: Vec<(f32, f32)>,
}

impl ArenaDef {
    pub fn width_px(&self) -> f32 {
        self.width as f32 * TILE
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32 * TILE
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the arena: explicit path first, then `arena.txt` in the search
/// dirs, then the embedded fallback. Bad files warn and fall through.
pub fn load_arena(custom: Option<&Path>) -> Result<ArenaDef, String> {
    if let Some(path) = custom {
        match std::fs::read_to_string(path) {
            Ok(content) => match parse_arena(&content) {
                Ok(def) => return Ok(def),
                Err(e) => eprintln!("Ignoring arena {}: {}", path.display(), e),
            },
            Err(e) => eprintln!("Ignoring arena {}: {}", path.display(), e),
        }
    }

    for dir in arena_search_dirs() {
        let path = dir.join("arena.txt");
        if !path.is_file() {
            continue;
        }
        if let Ok(content) = std::fs::read_to_string(&path) {
            match parse_arena(&content) {
                Ok(def) => return Ok(def),
                Err(e) => eprintln!("Ignoring arena {}: {}", path.display(), e),
            }
        }
    }

    parse_arena(EMBEDDED_ARENA)
}

/// Parse an arena from text content.
pub fn parse_arena(content: &str) -> Result<ArenaDef, String> {
    let mut name = String::new();
    let mut rows: Vec<String> = vec![];

    for line in content.lines() {
        if line.starts_with('#') && name.is_empty() && rows.is_empty() && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            rows.push(line.to_string());
        }
    }

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err("arena has no grid rows".to_string());
    }

    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    for row in &mut rows {
        let len = row.chars().count();
        if len < width {
            row.extend(std::iter::repeat(' ').take(width - len));
        }
    }
    let height = rows.len();

    let mut colliders = vec![];
    let mut player_spawn = None;
    let mut warrior_spawns = vec![];

    for (y, row) in rows.iter().enumerate() {
        let mut run_start: Option<usize> = None;
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                if run_start.is_none() {
                    run_start = Some(x);
                }
                continue;
            }
            if let Some(start) = run_start.take() {
                colliders.push(wall_run(start, x, y)?);
            }
            match ch {
                'P' => player_spawn = Some(tile_center(x, y)),
                'E' => warrior_spawns.push(tile_center(x, y)),
                _ => {}
            }
        }
        if let Some(start) = run_start {
            colliders.push(wall_run(start, width, y)?);
        }
    }

    let player_spawn = match player_spawn {
        Some(p) => p,
        None => return Err("arena has no player spawn ('P')".to_string()),
    };

    if name.is_empty() {
        name = "Unnamed Arena".to_string();
    }

    Ok(ArenaDef { name, rows, width, height, colliders, player_spawn, warrior_spawns })
}

/// Distinguish `# Arena Name` from a wall row. A name line contains at
/// least one letter after the leading hash and no further hash, so a
/// top border row with spawn markers (`#P  E#`) stays part of the grid.
fn is_name_line(line: &str) -> bool {
    let rest = &line[1..];
    rest.chars().any(|c| c.is_alphabetic()) && !rest.contains('#')
}

fn wall_run(start: usize, end: usize, y: usize) -> Result<Rect, String> {
    Rect::new(
        start as f32 * TILE,
        y as f32 * TILE,
        (end - start) as f32 * TILE,
        TILE,
    )
}

fn tile_center(x: usize, y: usize) -> (f32, f32) {
    (x as f32 * TILE + TILE / 2.0, y as f32 * TILE + TILE / 2.0)
}

/// Search dirs for arena files: exe dir, CWD, XDG data, system data.
fn arena_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gridblade");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    let sys = PathBuf::from("/usr/share/gridblade");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    dirs
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback arena
// ══════════════════════════════════════════════════════════════

const EMBEDDED_ARENA: &str = "\
# The Pit
############################
#                          #
#   P        ##            #
#            ##            #
#                     E    #
#      ####                #
#                          #
#            ###           #
#                          #
#    E             ####    #
#          ##              #
#   ###                    #
#                    E     #
#        ##                #
#                          #
############################";

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
