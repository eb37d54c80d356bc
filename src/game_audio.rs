/// Game-facing audio: loads the fixed asset manifest and turns game events
/// into sound.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::audio::SoundManager;
use crate::config::{BACKGROUND_MUSIC, GAME_OVER_FADE_MS, SOUNDS_DIR, SOUND_EFFECTS};
use crate::entities::GameEvent;

pub struct GameAudio {
    sound_manager: SoundManager,
}

impl GameAudio {
    /// Open the default output device and load assets relative to the
    /// working directory.
    pub fn new() -> Self {
        Self::initialize(SoundManager::new(), Path::new("."))
    }

    /// Load every manifest entry found under `root`.  Missing files are
    /// logged and left silent.
    pub fn initialize(mut sound_manager: SoundManager, root: &Path) -> Self {
        let sounds_dir = root.join(SOUNDS_DIR);
        if !sounds_dir.exists() {
            match fs::create_dir_all(&sounds_dir) {
                Ok(()) => info!(
                    "created {}; add sound files there to enable audio",
                    sounds_dir.display()
                ),
                Err(e) => warn!("couldn't create {}: {e}", sounds_dir.display()),
            }
        }

        for (name, path) in SOUND_EFFECTS {
            sound_manager.load_sound(name, root.join(path));
        }
        sound_manager.load_music(root.join(BACKGROUND_MUSIC));

        GameAudio { sound_manager }
    }

    pub fn sound_manager(&self) -> &SoundManager {
        &self.sound_manager
    }

    pub fn sound_manager_mut(&mut self) -> &mut SoundManager {
        &mut self.sound_manager
    }

    pub fn play_game_sound(&mut self, name: &str) {
        self.sound_manager.play_sound(name);
    }

    pub fn start_background_music(&mut self) {
        self.sound_manager.play_music(true);
    }

    pub fn stop_background_music(&mut self) {
        self.sound_manager.stop_music();
    }

    /// Apply whichever volumes are given; `None` leaves that channel alone.
    pub fn handle_volume_changes(&mut self, music_volume: Option<f32>, sound_volume: Option<f32>) {
        if let Some(v) = music_volume {
            self.sound_manager.set_music_volume(v);
        }
        if let Some(v) = sound_volume {
            self.sound_manager.set_sound_volume(v);
        }
    }

    pub fn handle_game_event(&mut self, event: GameEvent) {
        self.play_game_sound(event.name());
        if event == GameEvent::GameOver {
            self.sound_manager.fade_out_music(GAME_OVER_FADE_MS);
        }
    }

    /// Named-event entry point.  Unknown names are ignored.
    pub fn dispatch_event(&mut self, event_name: &str) {
        match GameEvent::from_name(event_name) {
            Some(event) => self.handle_game_event(event),
            None => debug!(event_name, "ignoring unknown audio event"),
        }
    }

    pub fn update(&mut self) {
        self.sound_manager.update();
    }
}

impl Default for GameAudio {
    fn default() -> Self {
        Self::new()
    }
}
