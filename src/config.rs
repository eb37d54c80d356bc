/// Fixed tuning constants and the audio asset manifest.
///
/// There is no runtime override for any of these; the only external knob is
/// `RUST_LOG` for the log filter.

// ── Surface ──────────────────────────────────────────────────────────────────

pub const WINDOW_WIDTH: i32 = 800;
pub const WINDOW_HEIGHT: i32 = 600;
pub const FPS: u64 = 60;
pub const WINDOW_TITLE: &str = "Space Dodge Game";

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: i32 = 50;
pub const PLAYER_SPEED: i32 = 5;
/// Vertical centre of the player sprite, measured from the bottom edge.
pub const PLAYER_BOTTOM_OFFSET: i32 = 60;
pub const STARTING_LIVES: u32 = 3;

// ── Enemies ──────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: i32 = 30;
pub const ENEMY_COUNT: usize = 6;
/// Inclusive range of per-spawn falling speeds.
pub const ENEMY_MIN_SPEED: i32 = 3;
pub const ENEMY_MAX_SPEED: i32 = 7;
/// Half-open spawn band above the visible area.
pub const ENEMY_SPAWN_Y: (i32, i32) = (-100, -40);

// ── Powerups ─────────────────────────────────────────────────────────────────

pub const POWERUP_SIZE: i32 = 20;
pub const POWERUP_COUNT: usize = 1;
pub const POWERUP_SPEED: i32 = 3;
pub const POWERUP_SPAWN_Y: (i32, i32) = (-300, -200);
pub const POWERUP_SCORE: u32 = 100;

// ── Audio ────────────────────────────────────────────────────────────────────

pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;
pub const DEFAULT_SOUND_VOLUME: f32 = 0.7;
pub const GAME_OVER_FADE_MS: u64 = 2000;

pub const SOUNDS_DIR: &str = "sounds";

/// Sound effects loaded at startup, keyed by the event name that plays them.
pub const SOUND_EFFECTS: &[(&str, &str)] = &[
    ("collision", "sounds/collision.wav"),
    ("powerup", "sounds/powerup.wav"),
    ("game_over", "sounds/game_over.wav"),
    ("menu_select", "sounds/menu_select.wav"),
];

pub const BACKGROUND_MUSIC: &str = "sounds/background_music.mp3";

// ── Logging ──────────────────────────────────────────────────────────────────

/// The terminal is the render surface, so logs go to a file instead.
pub const LOG_FILE: &str = "space_dodge.log";
