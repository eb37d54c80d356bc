mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use display::Viewport;
use space_dodge::compute::{reset_game, step};
use space_dodge::config::{FPS, LOG_FILE, WINDOW_TITLE};
use space_dodge::entities::{FrameInput, GameStatus};
use space_dodge::game_audio::GameAudio;

const FRAME: Duration = Duration::from_nanos(1_000_000_000 / FPS);

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file; stdout belongs to the renderer.
fn init_logging() {
    let Ok(file) = File::create(LOG_FILE) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits from the game-over screen or closes the
/// game (Esc / Ctrl-C).
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which direction keys are still
/// "fresh" (within `HOLD_WINDOW` frames).  Restart, quit and close are
/// one-shot and only look at presses from this frame.
fn game_loop<W: Write>(
    out: &mut W,
    audio: &mut GameAudio,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut state = reset_game(&mut rng);
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows);

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    audio.start_background_music();
    info!("game started");

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut input = FrameInput::default();
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Esc => input.close_requested = true,
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                input.close_requested = true;
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => input.restart = true,
                            KeyCode::Char('q') | KeyCode::Char('Q') => input.quit = true,
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => view = Viewport::new(cols, rows),
                _ => {}
            }
        }

        input.left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        input.right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );

        let was_over = state.status == GameStatus::GameOver;
        let outcome = step(&state, &input, &mut rng);
        state = outcome.state;

        for event in outcome.events {
            audio.handle_game_event(event);
        }
        if !outcome.running {
            info!(score = state.player.score, "quitting");
            return Ok(());
        }
        if was_over && state.status == GameStatus::Playing {
            info!("restarted");
            audio.start_background_music();
        }
        audio.update();

        display::render(out, &state, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn enter_game_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::SetTitle(WINDOW_TITLE))?;
    Ok(())
}

fn main() -> std::io::Result<()> {
    init_logging();

    // Audio comes up before raw mode; it only ever logs.
    let mut audio = GameAudio::new();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    enter_game_screen(&mut out)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut audio, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    audio.stop_background_music();
    result
}
