//! Recoverable errors reported by the presentation engines.

use std::io;
use std::path::PathBuf;

/// Errors returned by the stage to its caller. None of them are fatal: the
/// worst outcome is that nothing visible changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("Animation has no frames to play")]
    EmptyFrameSet,

    /// `fitting` is the longest prefix of the rejected text, cut at a wrapped
    /// row boundary, that would still have fit.
    #[error("Text needs {required_rows} rows but the dialog holds {max_rows}")]
    ContentOverflow {
        required_rows: usize,
        max_rows: usize,
        fitting: String,
    },
}

/// Asset decoding failures, raised before anything reaches the player.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} contains no frames")]
    Empty { path: PathBuf },
}
