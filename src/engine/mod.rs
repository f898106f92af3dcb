//! Engine: the timed presentation core.
//!
//! A `Stage` owns one animation player, one typewriter and the dialog
//! bubble, plus the timer queue that paces them. The host calls
//! `run_until(now)` with its clock; every due timer is dispatched to the
//! engine that armed it, in order, one synchronous tick at a time.
//!
//! The engine understands time, playback and reveal state. It never deals
//! with terminals, ANSI codes or files.

pub mod animation;
pub mod dialog;
pub mod typewriter;

use log::{debug, info};

use crate::assets::sound::SoundHook;
use crate::error::StageError;
use crate::surface::{DisplaySurface, TextStyle};
use crate::timer::{TimerHandle, TimerQueue};
use crate::types::{Image, Point};

use animation::AnimationPlayer;
use dialog::{DialogBox, DialogLayout};
use typewriter::Typewriter;

/// What a fired timer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Animation,
    Reveal,
}

pub struct Stage<S: DisplaySurface, H: SoundHook> {
    surface: S,
    sound: H,
    timers: TimerQueue<Tick>,
    animation: AnimationPlayer,
    typewriter: Typewriter,
    dialog: DialogBox,
}

impl<S: DisplaySurface, H: SoundHook> Stage<S, H> {
    /// Build a stage on `surface`. The dialog text item is created up front
    /// (empty) so the typewriter holds its handle for its whole life.
    pub fn new(mut surface: S, sound: H, sprite_anchor: Point, layout: DialogLayout) -> Self {
        let text_style = TextStyle {
            style: layout.text_style.clone(),
            wrap_width: layout.text_bounds().width,
            max_rows: layout.text_bounds().height,
        };
        let text_item = surface.show_text(layout.text_origin(), "", &text_style);
        let typewriter = Typewriter::new(text_item, layout.text_bounds());

        Stage {
            surface,
            sound,
            timers: TimerQueue::new(),
            animation: AnimationPlayer::new(sprite_anchor),
            typewriter,
            dialog: DialogBox::new(layout),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn sound(&self) -> &H {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut H {
        &mut self.sound
    }

    pub fn animation(&self) -> &AnimationPlayer {
        &self.animation
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn dialog(&self) -> &DialogBox {
        &self.dialog
    }

    /// Current time on the stage clock, in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    // -----------------------------------------------------------------------
    // Animation
    // -----------------------------------------------------------------------

    pub fn load_animation(&mut self, frames: Vec<Image>, period_ms: u64) -> Result<(), StageError> {
        self.animation.load(frames, period_ms, &mut self.surface, &mut self.timers)
    }

    pub fn stop_animation(&mut self) {
        self.animation.stop(&mut self.surface, &mut self.timers);
    }

    // -----------------------------------------------------------------------
    // Dialog text
    // -----------------------------------------------------------------------

    /// Show the bubble and reveal `text` from scratch.
    pub fn start_text(&mut self, text: &str, interval_ms: u64, every_n: usize) {
        self.show_dialog();
        self.typewriter
            .start(text, interval_ms, every_n, &mut self.surface, &mut self.timers);
    }

    /// Append `text` as a new line of the current conversation.
    pub fn append_text(&mut self, text: &str) -> Result<(), StageError> {
        self.typewriter.append(text, &mut self.timers)?;
        self.show_dialog();
        Ok(())
    }

    /// Freeze the reveal where it is.
    pub fn pause_text(&mut self) {
        self.typewriter.cancel(&mut self.timers);
    }

    /// Clear the text and take the bubble down.
    pub fn end_conversation(&mut self) {
        self.typewriter.clear(&mut self.surface, &mut self.timers);
        self.dialog.hide(&mut self.surface);
        info!("conversation ended");
    }

    pub fn set_typing_interval(&mut self, interval_ms: u64) {
        self.typewriter.set_interval(interval_ms);
    }

    fn show_dialog(&mut self) {
        if !self.dialog.is_visible() {
            self.dialog.show(&mut self.surface);
            self.surface.raise(self.typewriter.text_item());
        }
    }

    // -----------------------------------------------------------------------
    // Clock
    // -----------------------------------------------------------------------

    /// Fire every timer due at or before `now_ms`, in order. Returns how many
    /// ticks did work.
    pub fn run_until(&mut self, now_ms: u64) -> usize {
        let mut fired = 0;
        while let Some((handle, tick)) = self.timers.pop_due(now_ms) {
            if self.dispatch(handle, tick) {
                fired += 1;
            }
        }
        fired
    }

    fn dispatch(&mut self, handle: TimerHandle, tick: Tick) -> bool {
        match tick {
            Tick::Animation if self.animation.pending_timer() == Some(handle) => {
                self.animation.advance(&mut self.surface, &mut self.timers)
            }
            Tick::Reveal if self.typewriter.pending_timer() == Some(handle) => {
                self.typewriter
                    .tick(&mut self.surface, &mut self.timers, &mut self.sound)
            }
            _ => {
                debug!("dropping stale {tick:?} timer {handle:?}");
                false
            }
        }
    }
}
