//! Typewriter-style text reveal.
//!
//! The revealer owns one text item on the surface and grows it by one
//! character per tick. Its phase is explicit:
//!
//! ```text
//! Idle ──start──▶ Revealing ──last char──▶ Complete
//!                     │
//!                     └──cancel──▶ Cancelled
//! ```
//!
//! `start` is accepted from every phase and always cancels the in-flight
//! pass first. A tick is pending exactly while the phase is `Revealing`.

use log::debug;

use crate::assets::sound::SoundHook;
use crate::error::StageError;
use crate::surface::text::{row_count, wrap_spans};
use crate::surface::{DisplaySurface, ItemHandle};
use crate::timer::{TimerFacility, TimerHandle};

use super::Tick;

pub const MIN_INTERVAL_MS: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    Revealing,
    Complete,
    Cancelled,
}

/// Size of the region the revealed text must stay inside, in cells.
/// A zero dimension means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBounds {
    pub width: u16,
    pub height: u16,
}

pub struct Typewriter {
    text_item: ItemHandle,
    bounds: TextBounds,
    source: Vec<char>,
    revealed: usize,
    interval_ms: u64,
    every_n: usize,
    timer: Option<TimerHandle>,
    phase: RevealPhase,
}

impl Typewriter {
    /// `text_item` is the surface text item this revealer writes into.
    pub fn new(text_item: ItemHandle, bounds: TextBounds) -> Self {
        Typewriter {
            text_item,
            bounds,
            source: Vec::new(),
            revealed: 0,
            interval_ms: 100,
            every_n: 1,
            timer: None,
            phase: RevealPhase::Idle,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn source(&self) -> String {
        self.source.iter().collect()
    }

    /// The text currently on screen.
    pub fn displayed(&self) -> String {
        self.source[..self.revealed].iter().collect()
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    pub fn text_item(&self) -> ItemHandle {
        self.text_item
    }

    pub fn bounds(&self) -> TextBounds {
        self.bounds
    }

    /// Begin a fresh reveal of `text`, dropping any pass in flight.
    pub fn start(
        &mut self,
        text: &str,
        interval_ms: u64,
        every_n: usize,
        surface: &mut dyn DisplaySurface,
        timers: &mut dyn TimerFacility<Tick>,
    ) {
        self.disarm(timers);
        self.source = text.chars().collect();
        self.revealed = 0;
        self.interval_ms = interval_ms.max(MIN_INTERVAL_MS);
        self.every_n = every_n.max(1);
        surface.update_text(self.text_item, "");

        if self.source.is_empty() {
            self.phase = RevealPhase::Complete;
            return;
        }
        self.phase = RevealPhase::Revealing;
        self.timer = Some(timers.after(self.interval_ms, Tick::Reveal));
        debug!(
            "reveal started: {} chars every {} ms, sound every {}",
            self.source.len(),
            self.interval_ms,
            self.every_n
        );
    }

    /// Reveal the next character. Returns whether anything was revealed.
    pub fn tick(
        &mut self,
        surface: &mut dyn DisplaySurface,
        timers: &mut dyn TimerFacility<Tick>,
        sound: &mut dyn SoundHook,
    ) -> bool {
        if self.phase != RevealPhase::Revealing || self.revealed >= self.source.len() {
            return false;
        }
        self.disarm(timers);

        let shown: String = self.source[..=self.revealed].iter().collect();
        surface.update_text(self.text_item, &shown);
        if self.revealed % self.every_n == 0 {
            sound.play();
        }
        self.revealed += 1;

        if self.revealed < self.source.len() {
            self.timer = Some(timers.after(self.interval_ms, Tick::Reveal));
        } else {
            self.phase = RevealPhase::Complete;
            debug!("reveal complete");
        }
        true
    }

    /// Add `more` as a new line and keep revealing into it.
    ///
    /// Fails with `ContentOverflow` if the result would not fit the bounds;
    /// nothing changes in that case.
    pub fn append(
        &mut self,
        more: &str,
        timers: &mut dyn TimerFacility<Tick>,
    ) -> Result<(), StageError> {
        let mut combined = self.source();
        if !combined.is_empty() {
            combined.push('\n');
        }
        let prefix_chars = combined.chars().count();
        combined.push_str(more);

        let width = self.bounds.width as usize;
        let max_rows = self.bounds.height as usize;
        if max_rows > 0 {
            let required_rows = row_count(&combined, width);
            if required_rows > max_rows {
                return Err(StageError::ContentOverflow {
                    required_rows,
                    max_rows,
                    fitting: fitting_prefix(&combined, prefix_chars, width, max_rows),
                });
            }
        }

        if more.is_empty() && self.source.is_empty() {
            return Ok(());
        }
        self.source = combined.chars().collect();
        if self.phase != RevealPhase::Revealing && self.revealed < self.source.len() {
            self.phase = RevealPhase::Revealing;
            self.timer = Some(timers.after(self.interval_ms, Tick::Reveal));
        }
        Ok(())
    }

    /// Stop revealing, leaving the text on screen as it is.
    pub fn cancel(&mut self, timers: &mut dyn TimerFacility<Tick>) {
        if self.phase == RevealPhase::Revealing {
            self.disarm(timers);
            self.phase = RevealPhase::Cancelled;
            debug!("reveal cancelled at {}/{}", self.revealed, self.source.len());
        }
    }

    /// Stop revealing and wipe the text.
    pub fn clear(&mut self, surface: &mut dyn DisplaySurface, timers: &mut dyn TimerFacility<Tick>) {
        self.disarm(timers);
        self.source.clear();
        self.revealed = 0;
        self.phase = RevealPhase::Idle;
        surface.update_text(self.text_item, "");
    }

    /// Pace used from the next re-arm on.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms.max(MIN_INTERVAL_MS);
    }

    fn disarm(&mut self, timers: &mut dyn TimerFacility<Tick>) {
        if let Some(handle) = self.timer.take() {
            timers.cancel(handle);
        }
    }
}

/// Longest prefix of the appended part (chars from `prefix_chars` on) that
/// ends on a wrapped row boundary within `max_rows`.
fn fitting_prefix(combined: &str, prefix_chars: usize, width: usize, max_rows: usize) -> String {
    let chars: Vec<char> = combined.chars().collect();
    let end = wrap_spans(combined, width)
        .into_iter()
        .take(max_rows)
        .map(|span| span.end)
        .filter(|&end| end > prefix_chars)
        .last()
        .unwrap_or(prefix_chars);
    chars[prefix_chars..end.max(prefix_chars)].iter().collect()
}
