use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::engine::dialog::DialogLayout;
use crate::types::{Point, Size};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub key_bindings: KeyBindings,
    /// Delay between revealed characters.
    pub typing_interval_ms: u64,
    pub interval_min_ms: u64,
    pub interval_max_ms: u64,
    pub interval_step_ms: u64,
    /// Play the typing sound every N revealed characters.
    pub sound_every: usize,
    /// Typing sound volume, 0.0 to 1.0.
    pub sound_volume: f32,
    pub animation_period_ms: u64,
    /// Root holding `animations/` and `sounds/`. Relative paths resolve
    /// against the working directory.
    pub assets_dir: PathBuf,
    /// Sound selected at start-up, by file name inside `sounds/`.
    pub default_sound: String,
    /// Canvas cell the sprite is centred on.
    pub sprite_anchor: Point,
    /// Decoded frames are scaled down to fit this many cells.
    pub sprite_max: Size,
    pub dialog: DialogLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
    pub cancel: String,
    pub next_focus: String,
    pub prev_focus: String,
    pub focus_up: String,
    pub focus_down: String,
    pub activate: String,
    pub slower: String,
    pub faster: String,
    pub fullscreen: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            quit: "Ctrl-q".into(),
            cancel: "Esc".into(),
            next_focus: "Tab".into(),
            prev_focus: "BackTab".into(),
            focus_up: "Up".into(),
            focus_down: "Down".into(),
            activate: "Enter".into(),
            slower: "Left".into(),
            faster: "Right".into(),
            fullscreen: "F11".into(),
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        StageConfig {
            key_bindings: KeyBindings::default(),
            typing_interval_ms: 100,
            interval_min_ms: 50,
            interval_max_ms: 500,
            interval_step_ms: 10,
            sound_every: 3,
            sound_volume: 1.0,
            animation_period_ms: 100,
            assets_dir: PathBuf::from("assets"),
            default_sound: "type.mp3".into(),
            sprite_anchor: Point::new(12, 5),
            sprite_max: Size { width: 24, height: 9 },
            dialog: DialogLayout::default(),
        }
    }
}

impl StageConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        let config: Self = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
        };
        config.normalized()
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("ascii-stage");
        path.push("config.json");
        path
    }

    /// Repair ranges a hand-edited file can get wrong.
    fn normalized(mut self) -> Self {
        if self.interval_min_ms > self.interval_max_ms {
            std::mem::swap(&mut self.interval_min_ms, &mut self.interval_max_ms);
        }
        self.interval_min_ms = self.interval_min_ms.max(1);
        self.interval_max_ms = self.interval_max_ms.max(self.interval_min_ms);
        self.interval_step_ms = self.interval_step_ms.max(1);
        self.sound_every = self.sound_every.max(1);
        self.sound_volume = self.sound_volume.clamp(0.0, 1.0);
        self.typing_interval_ms = self.clamp_interval(self.typing_interval_ms);
        self
    }

    pub fn clamp_interval(&self, ms: u64) -> u64 {
        ms.clamp(self.interval_min_ms, self.interval_max_ms)
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl or Alt chords.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "BackTab" | "Shift-Tab" => code == KeyCode::BackTab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
