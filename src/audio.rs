/// Sound effect and music playback on top of rodio.
///
/// Every operation is infallible from the caller's point of view: resources
/// that fail to load are logged and skipped, and a manager without an output
/// device keeps its bookkeeping but makes no sound.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_MUSIC_VOLUME, DEFAULT_SOUND_VOLUME};
use crate::error::AudioError;

type SharedBytes = Arc<[u8]>;

/// The stream must outlive every sink created from its handle.
struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Encoded file contents; decoded afresh for each playback.
struct LoadedSound {
    path: PathBuf,
    data: SharedBytes,
    volume: f32,
}

struct MusicTrack {
    path: PathBuf,
    data: SharedBytes,
}

#[derive(Clone, Copy)]
struct MusicFade {
    started: Instant,
    duration: Duration,
    from: f32,
}

pub struct SoundManager {
    output: Option<Output>,
    sounds: HashMap<String, LoadedSound>,
    /// Effects still playing, kept so volume changes reach them.
    playing: Vec<Sink>,
    current_music: Option<MusicTrack>,
    music_sink: Option<Sink>,
    fade: Option<MusicFade>,
    music_volume: f32,
    sound_volume: f32,
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

fn decode(data: &SharedBytes) -> Result<Decoder<Cursor<SharedBytes>>, DecoderError> {
    Decoder::new(Cursor::new(Arc::clone(data)))
}

/// Read the whole file and make sure rodio can decode it.
fn read_audio_file(path: &Path) -> Result<SharedBytes, AudioError> {
    let bytes = fs::read(path).map_err(|source| AudioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data: SharedBytes = Arc::from(bytes);
    decode(&data).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(data)
}

fn start_sound(output: &Output, sound: &LoadedSound) -> Result<Sink, AudioError> {
    let source = decode(&sound.data).map_err(|source| AudioError::Decode {
        path: sound.path.clone(),
        source,
    })?;
    let sink = Sink::try_new(&output.handle)?;
    sink.set_volume(sound.volume);
    sink.append(source);
    Ok(sink)
}

fn start_music(
    output: &Output,
    track: &MusicTrack,
    looped: bool,
    volume: f32,
) -> Result<Sink, AudioError> {
    let source = decode(&track.data).map_err(|source| AudioError::Decode {
        path: track.path.clone(),
        source,
    })?;
    let sink = Sink::try_new(&output.handle)?;
    sink.set_volume(volume);
    if looped {
        sink.append(source.repeat_infinite());
    } else {
        sink.append(source);
    }
    Ok(sink)
}

impl SoundManager {
    /// Open the default output device, falling back to a silent manager.
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok((stream, handle)) => {
                info!("audio output opened");
                Self::with_output(Some(Output {
                    _stream: stream,
                    handle,
                }))
            }
            Err(e) => {
                warn!("{}; continuing without sound", AudioError::from(e));
                Self::silent()
            }
        }
    }

    /// A manager that tracks resources and volumes but never opens a device.
    pub fn silent() -> Self {
        Self::with_output(None)
    }

    fn with_output(output: Option<Output>) -> Self {
        SoundManager {
            output,
            sounds: HashMap::new(),
            playing: Vec::new(),
            current_music: None,
            music_sink: None,
            fade: None,
            music_volume: DEFAULT_MUSIC_VOLUME,
            sound_volume: DEFAULT_SOUND_VOLUME,
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    // ── Sound effects ────────────────────────────────────────────────────────

    /// Load a sound effect under `name`.  Returns whether it loaded; a
    /// failure is logged and leaves any previous sound of that name intact.
    pub fn load_sound(&mut self, name: &str, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match read_audio_file(path) {
            Ok(data) => {
                self.sounds.insert(
                    name.to_string(),
                    LoadedSound {
                        path: path.to_path_buf(),
                        data,
                        volume: self.sound_volume,
                    },
                );
                debug!(name, path = %path.display(), "sound loaded");
                true
            }
            Err(e) => {
                warn!("couldn't load sound {name}: {e}");
                false
            }
        }
    }

    pub fn play_sound(&mut self, name: &str) {
        let Some(sound) = self.sounds.get(name) else {
            return;
        };
        let Some(output) = &self.output else {
            return;
        };
        match start_sound(output, sound) {
            Ok(sink) => {
                self.playing.retain(|s| !s.empty());
                self.playing.push(sink);
            }
            Err(e) => warn!("couldn't play sound {name}: {e}"),
        }
    }

    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Volume currently applied to one loaded sound.
    pub fn sound_volume_of(&self, name: &str) -> Option<f32> {
        self.sounds.get(name).map(|s| s.volume)
    }

    // ── Background music ─────────────────────────────────────────────────────

    /// Replace the current track.  Anything playing is stopped first.
    pub fn load_music(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match read_audio_file(path) {
            Ok(data) => {
                self.stop_music();
                self.current_music = Some(MusicTrack {
                    path: path.to_path_buf(),
                    data,
                });
                debug!(path = %path.display(), "music loaded");
                true
            }
            Err(e) => {
                warn!("couldn't load music: {e}");
                false
            }
        }
    }

    pub fn has_music(&self) -> bool {
        self.current_music.is_some()
    }

    pub fn music_path(&self) -> Option<&Path> {
        self.current_music.as_ref().map(|m| m.path.as_path())
    }

    /// Start the loaded track from the beginning, restarting it if it was
    /// already playing.
    pub fn play_music(&mut self, looped: bool) {
        let (Some(track), Some(output)) = (&self.current_music, &self.output) else {
            return;
        };
        self.fade = None;
        match start_music(output, track, looped, self.music_volume) {
            Ok(sink) => {
                if let Some(old) = self.music_sink.replace(sink) {
                    old.stop();
                }
            }
            Err(e) => warn!("couldn't play music: {e}"),
        }
    }

    pub fn stop_music(&mut self) {
        self.fade = None;
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    pub fn pause_music(&self) {
        if let Some(sink) = &self.music_sink {
            sink.pause();
        }
    }

    pub fn resume_music(&self) {
        if let Some(sink) = &self.music_sink {
            sink.play();
        }
    }

    /// Ramp the music down to silence over `duration_ms`, then stop it.  The
    /// ramp advances in [`SoundManager::update`].
    pub fn fade_out_music(&mut self, duration_ms: u64) {
        if self.music_sink.is_none() {
            return;
        }
        if duration_ms == 0 {
            self.stop_music();
            return;
        }
        self.fade = Some(MusicFade {
            started: Instant::now(),
            duration: Duration::from_millis(duration_ms),
            from: self.music_volume,
        });
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_sink
            .as_ref()
            .map(|s| !s.empty() && !s.is_paused())
            .unwrap_or(false)
    }

    /// Advance time-based effects.  Call once per frame.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    pub(crate) fn update_at(&mut self, now: Instant) {
        self.playing.retain(|s| !s.empty());
        let Some(fade) = self.fade else {
            return;
        };
        let elapsed = now.saturating_duration_since(fade.started);
        if elapsed >= fade.duration {
            self.stop_music();
            return;
        }
        let remaining = 1.0 - elapsed.as_secs_f32() / fade.duration.as_secs_f32();
        if let Some(sink) = &self.music_sink {
            sink.set_volume(fade.from * remaining);
        }
    }

    // ── Volume ───────────────────────────────────────────────────────────────

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn sound_volume(&self) -> f32 {
        self.sound_volume
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
        if let Some(fade) = self.fade.as_mut() {
            fade.from = self.music_volume;
        } else if let Some(sink) = &self.music_sink {
            sink.set_volume(self.music_volume);
        }
    }

    pub fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = clamp_volume(volume);
        for sound in self.sounds.values_mut() {
            sound.volume = self.sound_volume;
        }
        for sink in &self.playing {
            sink.set_volume(self.sound_volume);
        }
    }
}

#[cfg(test)]
impl SoundManager {
    /// Attach a device-less music sink so fade and volume paths can run
    /// without audio hardware.  Keep the returned queue alive.
    pub(crate) fn attach_idle_music(&mut self) -> rodio::queue::SourcesQueueOutput<f32> {
        let (sink, queue) = Sink::new_idle();
        sink.set_volume(self.music_volume);
        self.music_sink = Some(sink);
        queue
    }

    pub(crate) fn music_sink_volume(&self) -> Option<f32> {
        self.music_sink.as_ref().map(|s| s.volume())
    }

    pub(crate) fn fade_started(&self) -> Option<Instant> {
        self.fade.map(|f| f.started)
    }
}

impl Default for SoundManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_out_of_range_and_nan() {
        assert_eq!(clamp_volume(-0.5), 0.0);
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(0.25), 0.25);
        assert_eq!(clamp_volume(f32::NAN), 0.0);
    }

    #[test]
    fn update_without_fade_is_noop() {
        let mut sm = SoundManager::silent();
        sm.update_at(Instant::now() + Duration::from_secs(10));
        assert!(!sm.is_fading());
        assert!(!sm.is_music_playing());
    }

    #[test]
    fn fade_ramps_down_then_stops_music() {
        let mut sm = SoundManager::silent();
        let _queue = sm.attach_idle_music();
        assert_eq!(sm.music_sink_volume(), Some(0.5));

        sm.fade_out_music(2000);
        assert!(sm.is_fading());
        let start = sm.fade_started().unwrap();

        sm.update_at(start + Duration::from_secs(1));
        assert_eq!(sm.music_sink_volume(), Some(0.25));

        sm.update_at(start + Duration::from_secs(2));
        assert!(!sm.is_fading());
        assert_eq!(sm.music_sink_volume(), None);
        assert!(!sm.is_music_playing());
    }

    #[test]
    fn volume_change_mid_fade_rescales_the_ramp() {
        let mut sm = SoundManager::silent();
        let _queue = sm.attach_idle_music();
        sm.fade_out_music(2000);
        let start = sm.fade_started().unwrap();

        sm.update_at(start + Duration::from_secs(1));
        sm.set_music_volume(1.0);
        assert!(sm.is_fading());

        sm.update_at(start + Duration::from_millis(1500));
        assert_eq!(sm.music_sink_volume(), Some(0.25));
    }

    #[test]
    fn zero_length_fade_stops_at_once() {
        let mut sm = SoundManager::silent();
        let _queue = sm.attach_idle_music();
        sm.fade_out_music(0);
        assert!(!sm.is_fading());
        assert_eq!(sm.music_sink_volume(), None);
    }

    #[test]
    fn stop_music_cancels_a_fade() {
        let mut sm = SoundManager::silent();
        let _queue = sm.attach_idle_music();
        sm.fade_out_music(2000);
        sm.stop_music();
        assert!(!sm.is_fading());
        assert_eq!(sm.music_sink_volume(), None);
    }

    #[test]
    fn effect_volume_reaches_sounds_already_playing() {
        let mut sm = SoundManager::silent();
        let (sink, _queue) = Sink::new_idle();
        sink.set_volume(0.7);
        sm.playing.push(sink);

        sm.set_sound_volume(0.2);
        assert_eq!(sm.playing[0].volume(), 0.2);
    }

    #[test]
    fn finished_effects_are_dropped_on_update() {
        let mut sm = SoundManager::silent();
        let (sink, _queue) = Sink::new_idle();
        sm.playing.push(sink);

        // nothing queued, so the sink counts as drained
        sm.update_at(Instant::now());
        assert!(sm.playing.is_empty());
    }
}
