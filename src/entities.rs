/// All game entity types — pure data, no game rules.

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy,
    Powerup,
}

/// Something that happened during a frame which the audio layer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Collision,
    Powerup,
    GameOver,
    MenuSelect,
}

impl GameEvent {
    pub fn name(self) -> &'static str {
        match self {
            GameEvent::Collision => "collision",
            GameEvent::Powerup => "powerup",
            GameEvent::GameOver => "game_over",
            GameEvent::MenuSelect => "menu_select",
        }
    }

    pub fn from_name(name: &str) -> Option<GameEvent> {
        match name {
            "collision" => Some(GameEvent::Collision),
            "powerup" => Some(GameEvent::Powerup),
            "game_over" => Some(GameEvent::GameOver),
            "menu_select" => Some(GameEvent::MenuSelect),
            _ => None,
        }
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in surface pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ── Entities ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Shared sprite data.  `speed` is horizontal for the player and downward
/// for everything else.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rect: Rect,
    pub speed: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: EntityId,
    pub score: u32,
    pub lives: u32,
}

/// Keys that matter for a single frame, already decoded from raw terminal
/// events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub restart: bool,
    pub quit: bool,
    /// Window-close equivalent; honoured in every state.
    pub close_requested: bool,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
///
/// `entities` owns every sprite (update/draw order).  `enemies` and
/// `powerups` are membership lists of ids into it.
#[derive(Clone, Debug)]
pub struct EntireGameStateInfo {
    pub player: Player,
    pub entities: Vec<Entity>,
    pub enemies: Vec<EntityId>,
    pub powerups: Vec<EntityId>,
    pub status: GameStatus,
    pub frame: u64,
    pub next_id: u32,
    pub width: i32,
    pub height: i32,
}

impl EntireGameStateInfo {
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.entity(self.player.id)
    }

    pub fn enemy_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.enemies.iter().filter_map(move |&id| self.entity(id))
    }

    pub fn powerup_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.powerups.iter().filter_map(move |&id| self.entity(id))
    }
}
