//! Typing sound effects.
//!
//! Playback is best-effort: a missing file, an unavailable audio device or a
//! sound that is still playing never interrupts the text reveal. Failures
//! are logged and swallowed.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, warn};

/// Side effect fired by the typewriter every N revealed characters.
pub trait SoundHook {
    fn play(&mut self);
}

/// Hook that does nothing. Used when no sound file is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundHook for Silent {
    fn play(&mut self) {}
}

/// Plays the selected file through the default audio output.
///
/// Each play runs on a short-lived detached thread that owns the output
/// stream. While one sound is still playing, further requests are skipped
/// so long clips do not pile up behind fast typing.
#[derive(Debug)]
pub struct RodioSound {
    path: Option<PathBuf>,
    volume: f32,
    playing: Arc<AtomicBool>,
}

impl Default for RodioSound {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RodioSound {
    pub fn new(path: Option<PathBuf>) -> Self {
        RodioSound {
            path,
            volume: 1.0,
            playing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        debug!("typing sound set to {path:?}");
        self.path = path;
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

impl SoundHook for RodioSound {
    fn play(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if !path.exists() {
            debug!("sound file {} missing, skipping", path.display());
            return;
        }
        if self.playing.swap(true, Ordering::AcqRel) {
            debug!("previous sound still playing, skipping");
            return;
        }

        let playing = Arc::clone(&self.playing);
        let volume = self.volume;
        let spawned = thread::Builder::new()
            .name("typing-sound".into())
            .spawn(move || {
                if let Err(e) = play_blocking(&path, volume) {
                    warn!("Sound playback failed for {}: {e}", path.display());
                }
                playing.store(false, Ordering::Release);
            });
        if let Err(e) = spawned {
            warn!("Could not start sound thread: {e}");
            self.playing.store(false, Ordering::Release);
        }
    }
}

fn play_blocking(path: &Path, volume: f32) -> anyhow::Result<()> {
    use rodio::{Decoder, OutputStream, Sink};

    let (_stream, handle) = OutputStream::try_default()?;
    let file = File::open(path)?;
    let source = Decoder::new(BufReader::new(file))?;
    let sink = Sink::try_new(&handle)?;
    sink.set_volume(volume);
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_skipped_without_claiming_the_device() {
        let mut sound = RodioSound::new(Some(PathBuf::from("/definitely/not/here.wav")));
        sound.play();
        assert!(!sound.playing.load(Ordering::Acquire));
    }

    #[test]
    fn no_path_is_a_no_op() {
        let mut sound = RodioSound::new(None);
        sound.play();
        assert!(sound.path().is_none());
        assert!(!sound.playing.load(Ordering::Acquire));
    }

    #[test]
    fn volume_is_clamped() {
        let mut sound = RodioSound::new(None);
        sound.set_volume(3.0);
        assert_eq!(sound.volume, 1.0);
    }
}
