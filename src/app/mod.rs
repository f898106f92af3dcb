//! App: the interactive terminal program.
//!
//! Control panel on the left, stage canvas on the right. The event loop
//! sleeps until the next key or the next due timer, advances the stage clock
//! to wall time, then repaints only the canvas cells that changed.

pub mod canvas;
mod input;
mod panel;
pub mod state;
mod ui;

use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{cursor, event, execute, terminal};
use log::{debug, info, warn};

use crate::assets::frames::decode_frames;
use crate::assets::sound::RodioSound;
use crate::assets::AssetDirs;
use crate::config::StageConfig;
use crate::engine::Stage;
use crate::error::StageError;
use crate::menubar::{render_menubar, render_status};
use crate::renderer::{Grid, Renderer};
use crate::surface::Canvas;

use input::Action;
use state::AppState;
use ui::Layout;

/// Poll timeout while no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

pub struct App {
    state: AppState,
    stage: Stage<Canvas, RodioSound>,
    layout: Layout,
    /// What the canvas region of the terminal currently shows.
    grid: Grid,
    started: Instant,
    fullscreen: bool,
}

impl App {
    pub fn open(config: StageConfig) -> Self {
        let assets = AssetDirs::new(&config.assets_dir);
        info!("assets from {}", assets.root().display());
        let state = AppState::new(config, assets);

        let mut sound = RodioSound::new(state.selected_sound().map(Path::to_path_buf));
        sound.set_volume(state.config.sound_volume);
        let stage = Stage::new(
            Canvas::new(0, 0),
            sound,
            state.config.sprite_anchor,
            state.config.dialog.clone(),
        );

        App {
            state,
            stage,
            layout: Layout::compute(0, 0),
            grid: Vec::new(),
            started: Instant::now(),
            fullscreen: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.main_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    fn main_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.relayout()?;
        self.full_redraw(stdout)?;

        loop {
            let timeout = match self.stage.next_due() {
                Some(due) => Duration::from_millis(due.saturating_sub(self.elapsed_ms())),
                None => IDLE_POLL,
            };
            if event::poll(timeout)? {
                let action = input::handle_event(&mut self.state, event::read()?);
                if action == Action::Quit {
                    break;
                }
                // New timers must count from now, not from the last pass.
                self.stage.run_until(self.elapsed_ms());
                self.apply(action, stdout)?;
            }

            self.stage.run_until(self.elapsed_ms());
            self.refresh_canvas(stdout)?;
        }

        info!("quit");
        Ok(())
    }

    fn apply(&mut self, action: Action, stdout: &mut io::Stdout) -> Result<()> {
        match action {
            Action::Continue | Action::Quit => return Ok(()),
            Action::Redraw => {}
            Action::Resize => {
                self.relayout()?;
                return self.full_redraw(stdout);
            }
            Action::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                if self.fullscreen {
                    stdout.write_all(b"\x1b[10;1t")?;
                } else {
                    stdout.write_all(b"\x1b[10;0t")?;
                }
                stdout.flush()?;
                self.relayout()?;
                return self.full_redraw(stdout);
            }
            Action::Sync(text) => {
                self.stage
                    .start_text(&text, self.state.interval_ms, self.state.config.sound_every);
                self.state.status_message =
                    Some(format!("Typing {} chars", text.chars().count()));
            }
            Action::Append(text) => self.append(&text),
            Action::Pause => {
                self.stage.pause_text();
                self.state.status_message = Some("Paused".into());
            }
            Action::EndDialog => {
                self.stage.end_conversation();
                self.state.status_message = Some("Dialog ended".into());
            }
            Action::SetInterval(ms) => self.stage.set_typing_interval(ms),
            Action::SelectSound(path) => self.stage.sound_mut().set_path(path),
            Action::LoadAnimation(path) => self.load_animation(&path),
            Action::StopAnimation => {
                self.stage.stop_animation();
                self.state.status_message = Some("Animation stopped".into());
            }
        }
        self.draw_chrome(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            self.state.status_message = Some("Nothing to append".into());
            return;
        }
        self.state.status_message = match self.stage.append_text(text) {
            Ok(()) => Some("Appended".into()),
            Err(StageError::ContentOverflow {
                required_rows,
                max_rows,
                fitting,
            }) => {
                debug!("append rejected, fitting part {fitting:?}");
                Some(overflow_message(required_rows, max_rows, &fitting))
            }
            Err(e) => Some(e.to_string()),
        };
    }

    fn load_animation(&mut self, path: &Path) {
        let period = self.state.config.animation_period_ms;
        let loaded = decode_frames(path, self.state.config.sprite_max)
            .map_err(anyhow::Error::from)
            .and_then(|frames| {
                let count = frames.len();
                self.stage.load_animation(frames, period)?;
                Ok(count)
            });
        self.state.status_message = Some(match loaded {
            Ok(count) => format!("Playing {} ({count} frames)", path.display()),
            Err(e) => {
                warn!("cannot play {}: {e:#}", path.display());
                format!("Cannot play: {e:#}")
            }
        });
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn relayout(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        self.layout = Layout::compute(term_w, term_h);
        self.stage
            .surface_mut()
            .resize(self.layout.canvas_width, self.layout.canvas_height);
        debug!(
            "layout: panel {}x{}, stage {}x{}",
            self.layout.left_panel_width,
            self.layout.panel_height(),
            self.layout.canvas_width,
            self.layout.canvas_height,
        );
        Ok(())
    }

    fn full_redraw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
        self.draw_chrome(stdout)?;

        self.stage.surface_mut().take_dirty();
        self.grid = Renderer::rasterize(&self.stage.surface().scene());
        canvas::render_full(stdout, &self.layout, &self.grid)?;

        stdout.flush()?;
        Ok(())
    }

    /// Repaint changed canvas cells, if anything moved.
    fn refresh_canvas(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        if !self.stage.surface_mut().take_dirty() {
            return Ok(());
        }
        let next = Renderer::rasterize(&self.stage.surface().scene());
        let changes = Renderer::diff(&self.grid, &next);
        canvas::render_diff(stdout, &self.layout, &changes)?;
        self.grid = next;
        stdout.flush()?;
        Ok(())
    }

    fn draw_chrome(&self, stdout: &mut io::Stdout) -> Result<()> {
        let items: &[&str] = if self.state.dropdown.is_some() {
            &["[\u{2191}][\u{2193}] sound", "[Enter] pick", "[Esc] close", "[F11] full"]
        } else {
            &[
                "[Tab][Shift-Tab] focus",
                "[Enter] activate",
                "[\u{2190}][\u{2192}] speed",
                "[Ctrl-q][Esc] quit",
                "[F11] full",
            ]
        };
        render_menubar(stdout, 0, items)?;
        panel::render_left_panel(stdout, &self.layout, &self.state)?;

        let status = self
            .state
            .status_message
            .as_deref()
            .unwrap_or("Type in the text field, then [Enter] to sync");
        render_status(stdout, self.layout.status_y, self.layout.term_width, status)?;
        Ok(())
    }
}

/// Status text for a rejected append, naming how much of it would fit.
fn overflow_message(required_rows: usize, max_rows: usize, fitting: &str) -> String {
    let room = match fitting.chars().count() {
        0 => "nothing more fits".to_string(),
        1 => "only 1 char fits".to_string(),
        n => format!("only {n} chars fit"),
    };
    format!("Does not fit: needs {required_rows} rows, bubble holds {max_rows}; {room}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message_reports_the_fitting_part() {
        assert_eq!(
            overflow_message(3, 2, "hello\nab"),
            "Does not fit: needs 3 rows, bubble holds 2; only 8 chars fit"
        );
        assert_eq!(
            overflow_message(2, 1, ""),
            "Does not fit: needs 2 rows, bubble holds 1; nothing more fits"
        );
    }
}
