/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Nothing here is fatal: a broken config is reported on stderr and
/// replaced with defaults.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tuning: TuningConfig,
    pub debug: DebugConfig,
    pub gamepad: GamepadConfig,
    /// Explicit arena file, if one was configured.
    pub arena: Option<PathBuf>,
}

/// Combat numbers the config may override. Defaults mirror the
/// built-in tuning tables.
#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub player_hp: i32,
    pub player_damage: i32,
    pub player_speed: f32,
    pub warrior_hp: i32,
    pub warrior_damage: i32,
    pub contact_damage: i32,
    pub warrior_speed: f32,
    pub aggro_radius: f32,
    pub attack_radius: f32,
}

#[derive(Clone, Debug)]
pub struct DebugConfig {
    pub show_colliders: bool,
    pub show_hitboxes: bool,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub attack: Vec<String>,
    pub guard: Vec<String>,
    pub restart: Vec<String>,
    pub quit: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    debug: TomlDebug,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    assets: TomlAssets,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_player_hp")]
    player_hp: i32,
    #[serde(default = "default_player_damage")]
    player_damage: i32,
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_warrior_hp")]
    warrior_hp: i32,
    #[serde(default = "default_warrior_damage")]
    warrior_damage: i32,
    #[serde(default = "default_contact_damage")]
    contact_damage: i32,
    #[serde(default = "default_warrior_speed")]
    warrior_speed: f32,
    #[serde(default = "default_aggro_radius")]
    aggro_radius: f32,
    #[serde(default = "default_attack_radius")]
    attack_radius: f32,
}

#[derive(Deserialize, Debug, Default)]
struct TomlDebug {
    #[serde(default)]
    show_colliders: bool,
    #[serde(default)]
    show_hitboxes: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_attack_btns")]
    attack: Vec<String>,
    #[serde(default = "default_guard_btns")]
    guard: Vec<String>,
    #[serde(default = "default_restart_btns")]
    restart: Vec<String>,
    #[serde(default = "default_quit_btns")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlAssets {
    /// Arena file path; relative paths are searched next to the binary.
    #[serde(default)]
    arena: Option<String>,
}

// ── Defaults ──

fn default_player_hp() -> i32 { 100 }
fn default_player_damage() -> i32 { 10 }
fn default_player_speed() -> f32 { 80.0 }
fn default_warrior_hp() -> i32 { 30 }
fn default_warrior_damage() -> i32 { 10 }
fn default_contact_damage() -> i32 { 5 }
fn default_warrior_speed() -> f32 { 90.0 }
fn default_aggro_radius() -> f32 { 220.0 }
fn default_attack_radius() -> f32 { 44.0 }

fn default_attack_btns() -> Vec<String> { vec!["A".into(), "X".into(), "R1".into()] }
fn default_guard_btns() -> Vec<String> { vec!["B".into(), "L1".into()] }
fn default_restart_btns() -> Vec<String> { vec!["Start".into()] }
fn default_quit_btns() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            player_hp: default_player_hp(),
            player_damage: default_player_damage(),
            player_speed: default_player_speed(),
            warrior_hp: default_warrior_hp(),
            warrior_damage: default_warrior_damage(),
            contact_damage: default_contact_damage(),
            warrior_speed: default_warrior_speed(),
            aggro_radius: default_aggro_radius(),
            attack_radius: default_attack_radius(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            attack: default_attack_btns(),
            guard: default_guard_btns(),
            restart: default_restart_btns(),
            quit: default_quit_btns(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) data dirs. Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let g = toml_cfg.game;
        GameConfig {
            tuning: TuningConfig {
                // Zero or negative combat numbers would make the game
                // unwinnable or unlosable in confusing ways; clamp them.
                player_hp: g.player_hp.max(1),
                player_damage: g.player_damage.max(1),
                player_speed: g.player_speed.max(0.0),
                warrior_hp: g.warrior_hp.max(1),
                warrior_damage: g.warrior_damage.max(0),
                contact_damage: g.contact_damage.max(0),
                warrior_speed: g.warrior_speed.max(0.0),
                aggro_radius: g.aggro_radius.max(0.0),
                attack_radius: g.attack_radius.max(0.0),
            },
            debug: DebugConfig {
                show_colliders: toml_cfg.debug.show_colliders,
                show_hitboxes: toml_cfg.debug.show_hitboxes,
            },
            gamepad: GamepadConfig {
                attack: toml_cfg.gamepad.attack,
                guard: toml_cfg.gamepad.guard,
                restart: toml_cfg.gamepad.restart,
                quit: toml_cfg.gamepad.quit,
            },
            arena: resolve_arena(toml_cfg.assets.arena.as_deref(), search_dirs),
        }
    }
}

fn resolve_arena(name: Option<&str>, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let name = name?;
    if name.is_empty() {
        return None;
    }
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return Some(path);
    }
    Some(
        search_dirs
            .iter()
            .map(|d| d.join(name))
            .find(|c| c.is_file())
            .unwrap_or(path),
    )
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/gridblade → /usr/games/gridblade
        // still finds data relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/gridblade)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gridblade");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/gridblade)
    let sys = PathBuf::from("/usr/share/gridblade");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    // 5. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
