use std::fs;
use std::path::Path;

use space_dodge::audio::SoundManager;
use space_dodge::config::{DEFAULT_MUSIC_VOLUME, DEFAULT_SOUND_VOLUME, SOUNDS_DIR};
use space_dodge::entities::GameEvent;
use space_dodge::game_audio::GameAudio;

/// Write a short 16-bit mono PCM WAV file.
fn write_wav(path: &Path) {
    let samples: Vec<i16> = (0..800).map(|i| ((i % 40) as i16 - 20) * 500).collect();
    let data_len = (samples.len() * 2) as u32;

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    fs::write(path, bytes).unwrap();
}

// ── SoundManager: volumes ─────────────────────────────────────────────────────

#[test]
fn default_volumes() {
    let sm = SoundManager::silent();
    assert_eq!(sm.music_volume(), DEFAULT_MUSIC_VOLUME);
    assert_eq!(sm.sound_volume(), DEFAULT_SOUND_VOLUME);
    assert!(!sm.has_output());
}

#[test]
fn music_volume_is_clamped() {
    let mut sm = SoundManager::silent();
    sm.set_music_volume(-0.5);
    assert_eq!(sm.music_volume(), 0.0);
    sm.set_music_volume(1.5);
    assert_eq!(sm.music_volume(), 1.0);
    sm.set_music_volume(0.3);
    assert_eq!(sm.music_volume(), 0.3);
}

#[test]
fn sound_volume_is_clamped() {
    let mut sm = SoundManager::silent();
    sm.set_sound_volume(7.0);
    assert_eq!(sm.sound_volume(), 1.0);
    sm.set_sound_volume(-1.0);
    assert_eq!(sm.sound_volume(), 0.0);
}

// ── SoundManager: effects ─────────────────────────────────────────────────────

#[test]
fn playing_an_unknown_sound_is_a_noop() {
    let mut sm = SoundManager::silent();
    sm.play_sound("nonexistent");
    assert!(!sm.has_sound("nonexistent"));
}

#[test]
fn missing_sound_file_is_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut sm = SoundManager::silent();
    assert!(!sm.load_sound("collision", dir.path().join("nope.wav")));
    assert!(!sm.has_sound("collision"));
}

#[test]
fn corrupt_sound_file_is_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.wav");
    fs::write(&path, b"not audio").unwrap();
    let mut sm = SoundManager::silent();
    assert!(!sm.load_sound("broken", &path));
    assert!(!sm.has_sound("broken"));
}

#[test]
fn loaded_sound_follows_effect_volume() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blip.wav");
    write_wav(&path);

    let mut sm = SoundManager::silent();
    assert!(sm.load_sound("blip", &path));
    assert_eq!(sm.sound_volume_of("blip"), Some(DEFAULT_SOUND_VOLUME));

    sm.set_sound_volume(0.2);
    assert_eq!(sm.sound_volume_of("blip"), Some(0.2));

    // no device: silently does nothing
    sm.play_sound("blip");
}

#[test]
fn failed_reload_keeps_previous_sound() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blip.wav");
    write_wav(&path);

    let mut sm = SoundManager::silent();
    assert!(sm.load_sound("blip", &path));
    assert!(!sm.load_sound("blip", dir.path().join("missing.wav")));
    assert!(sm.has_sound("blip"));
}

// ── SoundManager: music ───────────────────────────────────────────────────────

#[test]
fn music_controls_without_track_are_noops() {
    let mut sm = SoundManager::silent();
    sm.play_music(true);
    sm.pause_music();
    sm.resume_music();
    sm.fade_out_music(2000);
    sm.stop_music();
    sm.update();
    assert!(!sm.has_music());
    assert!(!sm.is_music_playing());
    assert!(!sm.is_fading());
}

#[test]
fn missing_music_file_is_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let mut sm = SoundManager::silent();
    assert!(!sm.load_music(dir.path().join("theme.mp3")));
    assert!(!sm.has_music());
    assert_eq!(sm.music_path(), None);
}

#[test]
fn music_loads_without_an_output_device() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("theme.wav");
    write_wav(&path);

    let mut sm = SoundManager::silent();
    assert!(sm.load_music(&path));
    assert!(sm.has_music());
    assert_eq!(sm.music_path(), Some(path.as_path()));

    sm.play_music(true);
    assert!(!sm.is_music_playing());
    sm.fade_out_music(500);
    assert!(!sm.is_fading());
}

// ── GameAudio ─────────────────────────────────────────────────────────────────

#[test]
fn initialize_creates_sounds_directory() {
    let dir = tempfile::tempdir().unwrap();
    let audio = GameAudio::initialize(SoundManager::silent(), dir.path());
    assert!(dir.path().join(SOUNDS_DIR).is_dir());
    assert!(!audio.sound_manager().has_sound("collision"));
    assert!(!audio.sound_manager().has_music());
}

#[test]
fn initialize_loads_manifest_files_that_exist() {
    let dir = tempfile::tempdir().unwrap();
    let sounds = dir.path().join(SOUNDS_DIR);
    fs::create_dir_all(&sounds).unwrap();
    write_wav(&sounds.join("collision.wav"));
    write_wav(&sounds.join("powerup.wav"));
    // the decoder sniffs content, not extensions
    write_wav(&sounds.join("background_music.mp3"));

    let audio = GameAudio::initialize(SoundManager::silent(), dir.path());
    let sm = audio.sound_manager();
    assert!(sm.has_sound("collision"));
    assert!(sm.has_sound("powerup"));
    assert!(!sm.has_sound("game_over"));
    assert!(!sm.has_sound("menu_select"));
    assert!(sm.has_music());
}

#[test]
fn every_event_dispatches_without_assets() {
    let dir = tempfile::tempdir().unwrap();
    let mut audio = GameAudio::initialize(SoundManager::silent(), dir.path());
    for name in ["collision", "powerup", "game_over", "menu_select", "explosion", ""] {
        audio.dispatch_event(name);
    }
    audio.handle_game_event(GameEvent::GameOver);
    audio.update();
    assert!(!audio.sound_manager().is_music_playing());
}

#[test]
fn volume_changes_apply_only_what_is_given() {
    let dir = tempfile::tempdir().unwrap();
    let mut audio = GameAudio::initialize(SoundManager::silent(), dir.path());

    audio.handle_volume_changes(Some(2.0), None);
    assert_eq!(audio.sound_manager().music_volume(), 1.0);
    assert_eq!(audio.sound_manager().sound_volume(), DEFAULT_SOUND_VOLUME);

    audio.handle_volume_changes(None, Some(-3.0));
    assert_eq!(audio.sound_manager().music_volume(), 1.0);
    assert_eq!(audio.sound_manager().sound_volume(), 0.0);
}

#[test]
fn background_music_controls_are_safe_without_device() {
    let dir = tempfile::tempdir().unwrap();
    let mut audio = GameAudio::initialize(SoundManager::silent(), dir.path());
    audio.start_background_music();
    audio.stop_background_music();
    audio.sound_manager_mut().set_music_volume(0.1);
    assert_eq!(audio.sound_manager().music_volume(), 0.1);
}
