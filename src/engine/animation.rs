//! Looping sprite playback.

use log::debug;

use crate::error::StageError;
use crate::surface::{DisplaySurface, ItemHandle};
use crate::timer::{TimerFacility, TimerHandle};
use crate::types::{Image, Point};

use super::Tick;

/// Shortest frame period accepted. Smaller values would let the player
/// starve the event loop.
pub const MIN_PERIOD_MS: u64 = 1;

struct Running {
    frames: Vec<Image>,
    index: usize,
    period_ms: u64,
    item: ItemHandle,
    timer: TimerHandle,
}

enum Playback {
    Stopped,
    Running(Running),
}

/// Cycles a decoded frame set on the surface until stopped.
///
/// Frames are centred on `anchor`. A timer is pending exactly while the
/// player is running.
pub struct AnimationPlayer {
    anchor: Point,
    playback: Playback,
}

impl AnimationPlayer {
    pub fn new(anchor: Point) -> Self {
        AnimationPlayer {
            anchor,
            playback: Playback::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.playback, Playback::Running(_))
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.playback {
            Playback::Running(r) => Some(r.index),
            Playback::Stopped => None,
        }
    }

    pub fn frame_count(&self) -> usize {
        match &self.playback {
            Playback::Running(r) => r.frames.len(),
            Playback::Stopped => 0,
        }
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        match &self.playback {
            Playback::Running(r) => Some(r.timer),
            Playback::Stopped => None,
        }
    }

    pub fn item(&self) -> Option<ItemHandle> {
        match &self.playback {
            Playback::Running(r) => Some(r.item),
            Playback::Stopped => None,
        }
    }

    /// Replace whatever is playing with `frames`, showing frame 0 now and
    /// advancing every `period_ms`.
    pub fn load(
        &mut self,
        frames: Vec<Image>,
        period_ms: u64,
        surface: &mut dyn DisplaySurface,
        timers: &mut dyn TimerFacility<Tick>,
    ) -> Result<(), StageError> {
        self.stop(surface, timers);

        let Some(first) = frames.first() else {
            return Err(StageError::EmptyFrameSet);
        };
        let pos = Point::new(
            self.anchor.x - first.width() as i32 / 2,
            self.anchor.y - first.height() as i32 / 2,
        );
        let period_ms = period_ms.max(MIN_PERIOD_MS);
        let item = surface.show_image(pos, first);
        let timer = timers.after(period_ms, Tick::Animation);
        debug!("animation loaded: {} frames every {period_ms} ms", frames.len());

        self.playback = Playback::Running(Running {
            frames,
            index: 0,
            period_ms,
            item,
            timer,
        });
        Ok(())
    }

    /// Show the next frame and re-arm. Does nothing while stopped.
    pub fn advance(
        &mut self,
        surface: &mut dyn DisplaySurface,
        timers: &mut dyn TimerFacility<Tick>,
    ) -> bool {
        let Playback::Running(r) = &mut self.playback else {
            return false;
        };
        r.index = (r.index + 1) % r.frames.len();
        surface.update_image(r.item, &r.frames[r.index]);
        // No-op when called from the fired timer; keeps a single pending
        // advance when driven by hand.
        timers.cancel(r.timer);
        r.timer = timers.after(r.period_ms, Tick::Animation);
        true
    }

    /// Cancel the pending advance and take the sprite off the surface.
    /// Calling it while stopped is a no-op.
    pub fn stop(&mut self, surface: &mut dyn DisplaySurface, timers: &mut dyn TimerFacility<Tick>) {
        if let Playback::Running(r) = std::mem::replace(&mut self.playback, Playback::Stopped) {
            timers.cancel(r.timer);
            surface.remove(r.item);
            debug!("animation stopped at frame {}", r.index);
        }
    }
}
