use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::config::matches_binding;

use super::state::{AppState, Control};

/// What the event loop should do after a key. Stage-facing actions carry
/// everything the loop needs so input handling never touches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Resize,
    Quit,
    ToggleFullscreen,
    Sync(String),
    Append(String),
    Pause,
    EndDialog,
    SetInterval(u64),
    SelectSound(Option<PathBuf>),
    LoadAnimation(PathBuf),
    StopAnimation,
}

pub fn handle_event(state: &mut AppState, event: Event) -> Action {
    match event {
        Event::Key(key) => handle_key(state, key),
        Event::Resize(_, _) => Action::Resize,
        _ => Action::Continue,
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Action {
    // Global shortcut: works from any mode
    if matches_binding(&state.config.key_bindings.fullscreen, &key) {
        return Action::ToggleFullscreen;
    }
    if state.dropdown.is_some() {
        return handle_dropdown(state, key);
    }

    // Printable keys belong to the text field before any plain binding.
    if state.focused() == Control::Input {
        if let Some(action) = handle_input_text(state, key) {
            return action;
        }
    }

    let bindings = &state.config.key_bindings;
    if matches_binding(&bindings.quit, &key) || matches_binding(&bindings.cancel, &key) {
        return Action::Quit;
    }
    if matches_binding(&bindings.next_focus, &key) {
        state.focus_next();
        return Action::Redraw;
    }
    if matches_binding(&bindings.prev_focus, &key) {
        state.focus_prev();
        return Action::Redraw;
    }

    match state.focused() {
        Control::Input => {
            if matches_binding(&bindings.activate, &key) {
                return Action::Sync(state.input.clone());
            }
            Action::Continue
        }
        Control::Speed => {
            if matches_binding(&bindings.slower, &key) {
                return interval_action(state, AppState::slower);
            }
            if matches_binding(&bindings.faster, &key) {
                return interval_action(state, AppState::faster);
            }
            handle_focus_keys(state, key)
        }
        control => {
            if matches_binding(&bindings.activate, &key) {
                return activate(state, control);
            }
            handle_focus_keys(state, key)
        }
    }
}

fn handle_focus_keys(state: &mut AppState, key: KeyEvent) -> Action {
    let bindings = &state.config.key_bindings;
    if matches_binding(&bindings.focus_down, &key) {
        state.focus_next();
        return Action::Redraw;
    }
    if matches_binding(&bindings.focus_up, &key) {
        state.focus_prev();
        return Action::Redraw;
    }
    Action::Continue
}

fn interval_action(state: &mut AppState, adjust: fn(&mut AppState) -> bool) -> Action {
    if adjust(state) {
        Action::SetInterval(state.interval_ms)
    } else {
        Action::Continue
    }
}

/// Editing keys for the text field. `None` lets the key fall through to
/// the bindings.
fn handle_input_text(state: &mut AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => state.insert_char(c),
        KeyCode::Backspace => state.backspace(),
        KeyCode::Delete => state.delete(),
        KeyCode::Left => state.cursor_left(),
        KeyCode::Right => state.cursor_right(),
        KeyCode::Home => state.cursor_home(),
        KeyCode::End => state.cursor_end(),
        _ => return None,
    }
    Some(Action::Redraw)
}

fn activate(state: &mut AppState, control: Control) -> Action {
    match control {
        Control::Input => Action::Sync(state.input.clone()),
        Control::Sync => Action::Sync(state.input.clone()),
        Control::Append => Action::Append(state.input.clone()),
        Control::Pause => Action::Pause,
        Control::EndDialog => Action::EndDialog,
        Control::Speed => Action::Continue,
        Control::Sound => {
            if state.sounds.is_empty() {
                state.status_message =
                    Some(format!("No sounds in {}", state.assets.sounds_dir().display()));
            } else {
                state.dropdown = Some(state.sound_selected.unwrap_or(0));
            }
            Action::Redraw
        }
        Control::Animation(index) => match state.animations.get(index) {
            Some(path) => Action::LoadAnimation(path.clone()),
            None => Action::Continue,
        },
        Control::StopAnimation => Action::StopAnimation,
    }
}

fn handle_dropdown(state: &mut AppState, key: KeyEvent) -> Action {
    let Some(highlight) = state.dropdown else {
        return Action::Continue;
    };
    let bindings = &state.config.key_bindings;
    let count = state.sounds.len();

    if matches_binding(&bindings.focus_down, &key) || matches_binding(&bindings.next_focus, &key) {
        state.dropdown = Some((highlight + 1).min(count.saturating_sub(1)));
        return Action::Redraw;
    }
    if matches_binding(&bindings.focus_up, &key) || matches_binding(&bindings.prev_focus, &key) {
        state.dropdown = Some(highlight.saturating_sub(1));
        return Action::Redraw;
    }
    if matches_binding(&bindings.activate, &key) {
        state.dropdown = None;
        if highlight < count {
            state.sound_selected = Some(highlight);
        }
        state.status_message = Some(format!("Sound: {}", state.selected_sound_name()));
        return Action::SelectSound(state.selected_sound().map(PathBuf::from));
    }
    if matches_binding(&bindings.cancel, &key) {
        state.dropdown = None;
        return Action::Redraw;
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetDirs;
    use crate::config::StageConfig;
    use std::fs;

    fn press(state: &mut AppState, code: KeyCode) -> Action {
        handle_event(state, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn setup() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetDirs::new(dir.path());
        fs::create_dir(assets.sounds_dir()).unwrap();
        fs::create_dir(assets.animations_dir()).unwrap();
        for name in ["beep.wav", "type.mp3"] {
            fs::write(assets.sounds_dir().join(name), b"").unwrap();
        }
        fs::write(assets.animations_dir().join("wave.gif"), b"").unwrap();
        let state = AppState::new(StageConfig::default(), assets);
        (dir, state)
    }

    fn focus_on(state: &mut AppState, control: Control) {
        state.focus = state.controls().iter().position(|c| *c == control).unwrap();
    }

    #[test]
    fn typing_then_enter_syncs_the_input() {
        let (_dir, mut state) = setup();
        for c in "hi q".chars() {
            assert_eq!(press(&mut state, KeyCode::Char(c)), Action::Redraw);
        }
        assert_eq!(press(&mut state, KeyCode::Enter), Action::Sync("hi q".into()));
    }

    #[test]
    fn tab_cycles_focus_and_buttons_activate() {
        let (_dir, mut state) = setup();
        state.input = "more".into();

        press(&mut state, KeyCode::Tab);
        assert_eq!(state.focused(), Control::Sync);
        press(&mut state, KeyCode::Tab);
        assert_eq!(press(&mut state, KeyCode::Enter), Action::Append("more".into()));
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Enter), Action::Pause);
        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Enter), Action::EndDialog);
        press(&mut state, KeyCode::BackTab);
        assert_eq!(state.focused(), Control::Pause);
    }

    #[test]
    fn arrows_adjust_speed_only_on_the_slider() {
        let (_dir, mut state) = setup();
        focus_on(&mut state, Control::Speed);

        assert_eq!(press(&mut state, KeyCode::Right), Action::SetInterval(90));
        assert_eq!(press(&mut state, KeyCode::Left), Action::SetInterval(100));

        focus_on(&mut state, Control::Input);
        state.input = "ab".into();
        state.cursor = 2;
        assert_eq!(press(&mut state, KeyCode::Left), Action::Redraw);
        assert_eq!(state.cursor, 1);
        assert_eq!(state.interval_ms, 100);
    }

    #[test]
    fn sound_dropdown_picks_a_file() {
        let (_dir, mut state) = setup();
        focus_on(&mut state, Control::Sound);

        press(&mut state, KeyCode::Enter);
        assert_eq!(state.dropdown, Some(1));
        press(&mut state, KeyCode::Up);
        let action = press(&mut state, KeyCode::Enter);

        assert!(state.dropdown.is_none());
        assert_eq!(state.selected_sound_name(), "beep.wav");
        assert!(matches!(action, Action::SelectSound(Some(p)) if p.ends_with("beep.wav")));
    }

    #[test]
    fn esc_closes_dropdown_before_quitting() {
        let (_dir, mut state) = setup();
        focus_on(&mut state, Control::Sound);
        press(&mut state, KeyCode::Enter);

        assert_eq!(press(&mut state, KeyCode::Esc), Action::Redraw);
        assert_eq!(state.selected_sound_name(), "type.mp3");
        assert_eq!(press(&mut state, KeyCode::Esc), Action::Quit);
    }

    #[test]
    fn animation_button_loads_its_file() {
        let (_dir, mut state) = setup();
        focus_on(&mut state, Control::Animation(0));
        let action = press(&mut state, KeyCode::Enter);
        assert!(matches!(action, Action::LoadAnimation(p) if p.ends_with("wave.gif")));

        press(&mut state, KeyCode::Down);
        assert_eq!(press(&mut state, KeyCode::Enter), Action::StopAnimation);
    }

    #[test]
    fn ctrl_q_quits_even_from_the_text_field() {
        let (_dir, mut state) = setup();
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(handle_event(&mut state, Event::Key(ctrl_q)), Action::Quit);
        assert!(state.input.is_empty());
    }

    #[test]
    fn f11_toggles_fullscreen_anywhere() {
        let (_dir, mut state) = setup();
        assert_eq!(press(&mut state, KeyCode::F(11)), Action::ToggleFullscreen);
    }
}
