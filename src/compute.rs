/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `EntireGameStateInfo` (and, where needed, an RNG handle) and returns a brand-new
/// `EntireGameStateInfo`.  Side effects are limited to the injected RNG.

use rand::Rng;
use tracing::debug;

use crate::config::{
    ENEMY_COUNT, ENEMY_MAX_SPEED, ENEMY_MIN_SPEED, ENEMY_SIZE, ENEMY_SPAWN_Y, PLAYER_BOTTOM_OFFSET,
    PLAYER_SIZE, PLAYER_SPEED, POWERUP_COUNT, POWERUP_SCORE, POWERUP_SIZE, POWERUP_SPAWN_Y,
    POWERUP_SPEED, STARTING_LIVES, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::entities::{
    Entity, EntityId, EntityKind, EntireGameStateInfo, FrameInput, GameEvent, GameStatus, Player,
    Rect,
};

/// Result of one main-loop iteration.
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    pub state: EntireGameStateInfo,
    pub events: Vec<GameEvent>,
    /// `false` once the player asked to leave.
    pub running: bool,
}

// ── Collection membership ────────────────────────────────────────────────────

fn next_id(state: &mut EntireGameStateInfo) -> EntityId {
    let id = EntityId(state.next_id);
    state.next_id += 1;
    id
}

/// Add to the all-entities list and to the kind-specific list, if any.
fn add_entity(state: &mut EntireGameStateInfo, entity: Entity) {
    match entity.kind {
        EntityKind::Enemy => state.enemies.push(entity.id),
        EntityKind::Powerup => state.powerups.push(entity.id),
        EntityKind::Player => {}
    }
    state.entities.push(entity);
}

/// Remove from every list the entity belongs to.
fn remove_entity(state: &mut EntireGameStateInfo, id: EntityId) {
    state.entities.retain(|e| e.id != id);
    state.enemies.retain(|&e| e != id);
    state.powerups.retain(|&p| p != id);
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Random top-left corner above the visible area for a sprite of `size`.
fn offscreen_position(size: i32, band: (i32, i32), width: i32, rng: &mut impl Rng) -> (i32, i32) {
    let x = rng.gen_range(0..=(width - size).max(0));
    let y = rng.gen_range(band.0..band.1);
    (x, y)
}

fn spawn_enemy_in_place(state: &mut EntireGameStateInfo, rng: &mut impl Rng) {
    let (x, y) = offscreen_position(ENEMY_SIZE, ENEMY_SPAWN_Y, state.width, rng);
    let speed = rng.gen_range(ENEMY_MIN_SPEED..=ENEMY_MAX_SPEED);
    let id = next_id(state);
    add_entity(
        state,
        Entity {
            id,
            kind: EntityKind::Enemy,
            rect: Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            speed,
        },
    );
}

fn spawn_powerup_in_place(state: &mut EntireGameStateInfo, rng: &mut impl Rng) {
    let (x, y) = offscreen_position(POWERUP_SIZE, POWERUP_SPAWN_Y, state.width, rng);
    let id = next_id(state);
    add_entity(
        state,
        Entity {
            id,
            kind: EntityKind::Powerup,
            rect: Rect::new(x, y, POWERUP_SIZE, POWERUP_SIZE),
            speed: POWERUP_SPEED,
        },
    );
}

pub fn spawn_enemy(state: &EntireGameStateInfo, rng: &mut impl Rng) -> EntireGameStateInfo {
    let mut next = state.clone();
    spawn_enemy_in_place(&mut next, rng);
    next
}

pub fn spawn_powerup(state: &EntireGameStateInfo, rng: &mut impl Rng) -> EntireGameStateInfo {
    let mut next = state.clone();
    spawn_powerup_in_place(&mut next, rng);
    next
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn new_player(state: &mut EntireGameStateInfo) {
    let id = next_id(state);
    let x = state.width / 2 - PLAYER_SIZE / 2;
    let y = state.height - PLAYER_BOTTOM_OFFSET - PLAYER_SIZE / 2;
    add_entity(
        state,
        Entity {
            id,
            kind: EntityKind::Player,
            rect: Rect::new(x, y, PLAYER_SIZE, PLAYER_SIZE),
            speed: PLAYER_SPEED,
        },
    );
    state.player = Player {
        id,
        score: 0,
        lives: STARTING_LIVES,
    };
}

/// Fresh session: one player, a full wave of enemies and powerups.
pub fn reset_game(rng: &mut impl Rng) -> EntireGameStateInfo {
    let mut state = EntireGameStateInfo {
        player: Player {
            id: EntityId(0),
            score: 0,
            lives: STARTING_LIVES,
        },
        entities: Vec::new(),
        enemies: Vec::new(),
        powerups: Vec::new(),
        status: GameStatus::Playing,
        frame: 0,
        next_id: 0,
        width: WINDOW_WIDTH,
        height: WINDOW_HEIGHT,
    };
    new_player(&mut state);
    for _ in 0..ENEMY_COUNT {
        spawn_enemy_in_place(&mut state, rng);
    }
    for _ in 0..POWERUP_COUNT {
        spawn_powerup_in_place(&mut state, rng);
    }
    state
}

// ── Per-kind motion ──────────────────────────────────────────────────────────

fn update_player(entity: &mut Entity, input: &FrameInput, width: i32) {
    if input.left && entity.rect.left() > 0 {
        entity.rect.x -= entity.speed;
    }
    if input.right && entity.rect.right() < width {
        entity.rect.x += entity.speed;
    }
}

/// Constant-speed fall; once fully below the surface the sprite jumps back
/// into its spawn band at a new column.  Speed is kept.
fn update_faller(entity: &mut Entity, band: (i32, i32), width: i32, height: i32, rng: &mut impl Rng) {
    entity.rect.y += entity.speed;
    if entity.rect.top() > height {
        let (x, y) = offscreen_position(entity.rect.w, band, width, rng);
        entity.rect.x = x;
        entity.rect.y = y;
    }
}

/// Move every entity by its own rule, in insertion order.
pub fn update_entities(
    state: &EntireGameStateInfo,
    input: &FrameInput,
    rng: &mut impl Rng,
) -> EntireGameStateInfo {
    let mut next = state.clone();
    let (width, height) = (next.width, next.height);
    for entity in next.entities.iter_mut() {
        match entity.kind {
            EntityKind::Player => update_player(entity, input, width),
            EntityKind::Enemy => update_faller(entity, ENEMY_SPAWN_Y, width, height, rng),
            EntityKind::Powerup => update_faller(entity, POWERUP_SPAWN_Y, width, height, rng),
        }
    }
    next.frame += 1;
    next
}

// ── Collisions ───────────────────────────────────────────────────────────────

/// Consume every enemy and powerup touching the player, respawning a
/// replacement for each so the collection sizes stay constant.
pub fn handle_collisions(
    state: &EntireGameStateInfo,
    rng: &mut impl Rng,
) -> (EntireGameStateInfo, Vec<GameEvent>) {
    let mut next = state.clone();
    let mut events = Vec::new();

    let player_rect = match next.player_entity() {
        Some(p) => p.rect,
        None => return (next, events),
    };

    let enemy_hits: Vec<EntityId> = next
        .enemy_entities()
        .filter(|e| e.rect.overlaps(&player_rect))
        .map(|e| e.id)
        .collect();

    for id in enemy_hits {
        remove_entity(&mut next, id);
        next.player.lives = next.player.lives.saturating_sub(1);
        events.push(GameEvent::Collision);
        spawn_enemy_in_place(&mut next, rng);
        if next.player.lives == 0 && next.status == GameStatus::Playing {
            next.status = GameStatus::GameOver;
            events.push(GameEvent::GameOver);
            debug!(score = next.player.score, "player out of lives");
        }
    }

    let powerup_hits: Vec<EntityId> = next
        .powerup_entities()
        .filter(|p| p.rect.overlaps(&player_rect))
        .map(|p| p.id)
        .collect();

    for id in powerup_hits {
        remove_entity(&mut next, id);
        next.player.score += POWERUP_SCORE;
        events.push(GameEvent::Powerup);
        spawn_powerup_in_place(&mut next, rng);
    }

    (next, events)
}

// ── Main-loop iteration (nearly pure — RNG is injected) ─────────────────────

/// One pass of the game loop minus terminal I/O: honour close/quit/restart,
/// then, while playing, move everything and resolve collisions.
pub fn step(state: &EntireGameStateInfo, input: &FrameInput, rng: &mut impl Rng) -> FrameOutcome {
    if input.close_requested {
        return FrameOutcome {
            state: state.clone(),
            events: Vec::new(),
            running: false,
        };
    }

    let mut events = Vec::new();
    let mut current = state.clone();

    if current.status == GameStatus::GameOver {
        if input.quit {
            return FrameOutcome {
                state: current,
                events,
                running: false,
            };
        }
        if input.restart {
            current = reset_game(rng);
            events.push(GameEvent::MenuSelect);
        }
    }

    if current.status == GameStatus::Playing {
        current = update_entities(&current, input, rng);
        let (next, collision_events) = handle_collisions(&current, rng);
        current = next;
        events.extend(collision_events);
    }

    FrameOutcome {
        state: current,
        events,
        running: true,
    }
}
