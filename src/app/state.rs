use std::path::{Path, PathBuf};

use log::warn;

use crate::assets::{display_name, AssetDirs};
use crate::config::StageConfig;

/// A focusable control in the left panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Input,
    Sync,
    Append,
    Pause,
    EndDialog,
    Speed,
    Sound,
    Animation(usize),
    StopAnimation,
}

pub struct AppState {
    pub config: StageConfig,
    pub assets: AssetDirs,
    /// Index into `controls()`.
    pub focus: usize,
    pub input: String,
    /// Cursor position in chars.
    pub cursor: usize,
    pub interval_ms: u64,
    pub sounds: Vec<PathBuf>,
    pub sound_selected: Option<usize>,
    /// Highlighted row while the sound dropdown is open.
    pub dropdown: Option<usize>,
    pub animations: Vec<PathBuf>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: StageConfig, assets: AssetDirs) -> Self {
        let mut status_message = None;
        let sounds = assets.sounds().unwrap_or_else(|e| {
            warn!("cannot list {}: {e}", assets.sounds_dir().display());
            status_message = Some(format!("Cannot read sounds: {e}"));
            Vec::new()
        });
        let animations = assets.animations().unwrap_or_else(|e| {
            warn!("cannot list {}: {e}", assets.animations_dir().display());
            status_message = Some(format!("Cannot read animations: {e}"));
            Vec::new()
        });
        let sound_selected = sounds
            .iter()
            .position(|p| p.file_name().is_some_and(|n| n == config.default_sound.as_str()))
            .or(if sounds.is_empty() { None } else { Some(0) });

        AppState {
            interval_ms: config.typing_interval_ms,
            config,
            assets,
            focus: 0,
            input: String::new(),
            cursor: 0,
            sounds,
            sound_selected,
            dropdown: None,
            animations,
            status_message,
        }
    }

    pub fn controls(&self) -> Vec<Control> {
        let mut controls = vec![
            Control::Input,
            Control::Sync,
            Control::Append,
            Control::Pause,
            Control::EndDialog,
            Control::Speed,
            Control::Sound,
        ];
        controls.extend((0..self.animations.len()).map(Control::Animation));
        controls.push(Control::StopAnimation);
        controls
    }

    pub fn focused(&self) -> Control {
        let controls = self.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        let n = self.controls().len();
        self.focus = (self.focus + 1) % n;
    }

    pub fn focus_prev(&mut self) {
        let n = self.controls().len();
        self.focus = (self.focus + n - 1) % n;
    }

    // -----------------------------------------------------------------------
    // Text input
    // -----------------------------------------------------------------------

    fn byte_index(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.input.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_index(self.cursor);
            self.input.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // -----------------------------------------------------------------------
    // Typing speed
    // -----------------------------------------------------------------------

    /// Returns whether the interval changed.
    pub fn slower(&mut self) -> bool {
        self.set_interval(self.interval_ms.saturating_add(self.config.interval_step_ms))
    }

    pub fn faster(&mut self) -> bool {
        self.set_interval(self.interval_ms.saturating_sub(self.config.interval_step_ms))
    }

    fn set_interval(&mut self, ms: u64) -> bool {
        let ms = self.config.clamp_interval(ms);
        let changed = ms != self.interval_ms;
        self.interval_ms = ms;
        changed
    }

    /// e.g. `120 ms/char ≈ 8.3 chars/s`
    pub fn speed_readout(&self) -> String {
        let per_sec = 1000.0 / self.interval_ms.max(1) as f64;
        format!("{} ms/char \u{2248} {per_sec:.1} chars/s", self.interval_ms)
    }

    /// Fraction of the slider filled, 0.0 at the slowest end.
    pub fn speed_fraction(&self) -> f64 {
        let min = self.config.interval_min_ms;
        let max = self.config.interval_max_ms;
        if max == min {
            return 1.0;
        }
        max.saturating_sub(self.interval_ms) as f64 / (max - min) as f64
    }

    // -----------------------------------------------------------------------
    // Sounds and animations
    // -----------------------------------------------------------------------

    pub fn selected_sound(&self) -> Option<&Path> {
        self.sound_selected
            .and_then(|i| self.sounds.get(i))
            .map(PathBuf::as_path)
    }

    pub fn selected_sound_name(&self) -> String {
        self.selected_sound()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(none)".into())
    }

    pub fn animation_name(&self, index: usize) -> String {
        self.animations
            .get(index)
            .map(|p| display_name(p))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn state_with_assets(sounds: &[&str], animations: &[&str]) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDirs::new(dir.path());
        fs::create_dir(assets.sounds_dir()).unwrap();
        fs::create_dir(assets.animations_dir()).unwrap();
        for name in sounds {
            fs::write(assets.sounds_dir().join(name), b"").unwrap();
        }
        for name in animations {
            fs::write(assets.animations_dir().join(name), b"").unwrap();
        }
        let state = AppState::new(StageConfig::default(), assets);
        (dir, state)
    }

    #[test]
    fn default_sound_is_preselected() {
        let (_dir, state) = state_with_assets(&["beep.wav", "type.mp3"], &[]);
        assert_eq!(state.selected_sound_name(), "type.mp3");
    }

    #[test]
    fn first_sound_when_default_missing() {
        let (_dir, state) = state_with_assets(&["beep.wav", "click.ogg"], &[]);
        assert_eq!(state.selected_sound_name(), "beep.wav");
    }

    #[test]
    fn no_sounds_means_no_selection() {
        let (_dir, state) = state_with_assets(&[], &[]);
        assert!(state.selected_sound().is_none());
        assert_eq!(state.selected_sound_name(), "(none)");
    }

    #[test]
    fn controls_include_one_button_per_animation() {
        let (_dir, mut state) = state_with_assets(&[], &["wave.gif", "idle.gif"]);
        let controls = state.controls();
        assert_eq!(controls.len(), 10);
        assert_eq!(controls[7], Control::Animation(0));
        assert_eq!(state.animation_name(0), "idle");

        state.focus_prev();
        assert_eq!(state.focused(), Control::StopAnimation);
        state.focus_next();
        assert_eq!(state.focused(), Control::Input);
    }

    #[test]
    fn input_editing_handles_multibyte_chars() {
        let (_dir, mut state) = state_with_assets(&[], &[]);
        for c in "héllo".chars() {
            state.insert_char(c);
        }
        state.cursor_left();
        state.cursor_left();
        state.backspace();
        assert_eq!(state.input, "hélo");
        state.cursor_home();
        state.delete();
        assert_eq!(state.input, "élo");
        state.cursor_end();
        state.insert_char('!');
        assert_eq!(state.input, "élo!");
    }

    #[test]
    fn speed_is_clamped_to_slider_range() {
        let (_dir, mut state) = state_with_assets(&[], &[]);
        state.interval_ms = 60;
        assert!(state.faster());
        assert_eq!(state.interval_ms, 50);
        assert!(!state.faster());

        state.interval_ms = 495;
        assert!(state.slower());
        assert_eq!(state.interval_ms, 500);
        assert_eq!(state.speed_fraction(), 0.0);
    }

    #[test]
    fn readout_explains_the_speed() {
        let (_dir, mut state) = state_with_assets(&[], &[]);
        state.interval_ms = 120;
        assert_eq!(state.speed_readout(), "120 ms/char \u{2248} 8.3 chars/s");
    }
}
