use std::path::PathBuf;

/// Reasons an audio resource could not be loaded or played.  None of these
/// reach the game loop; the audio layer logs them and goes quiet.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("couldn't read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    #[error("couldn't start playback: {0}")]
    Play(#[from] rodio::PlayError),
}
