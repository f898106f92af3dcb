use std::io;

use crossterm::{cursor, queue, style};

use super::state::{AppState, Control};
use super::ui::Layout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Heading,
    Plain,
    Dim,
    Focused,
    /// Text field; `cursor` is the column to highlight when focused.
    Input { cursor: Option<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub text: String,
    pub kind: RowKind,
}

impl PanelRow {
    fn new(text: impl Into<String>, kind: RowKind) -> Self {
        PanelRow {
            text: text.into(),
            kind,
        }
    }
}

fn button(label: &str, focused: bool) -> PanelRow {
    if focused {
        PanelRow::new(format!("> {label}"), RowKind::Focused)
    } else {
        PanelRow::new(format!("  {label}"), RowKind::Plain)
    }
}

/// Lay out the panel contents for `inner` usable columns.
pub fn panel_rows(state: &AppState, inner: usize) -> Vec<PanelRow> {
    let focused = state.focused();
    let mut rows = Vec::new();

    rows.push(PanelRow::new("Dialog text", RowKind::Heading));
    rows.push(input_row(state, inner, focused == Control::Input));
    rows.push(button("Sync text", focused == Control::Sync));
    rows.push(button("Append", focused == Control::Append));
    rows.push(button("Pause", focused == Control::Pause));
    rows.push(button("End dialog", focused == Control::EndDialog));
    rows.push(PanelRow::new("", RowKind::Plain));

    rows.push(PanelRow::new("Typing speed", RowKind::Heading));
    let slider = slider(state.speed_fraction(), inner.saturating_sub(6));
    let kind = if focused == Control::Speed {
        RowKind::Focused
    } else {
        RowKind::Plain
    };
    rows.push(PanelRow::new(format!("  \u{25c0}{slider}\u{25b6}"), kind));
    rows.push(PanelRow::new(format!("  {}", state.speed_readout()), RowKind::Dim));
    rows.push(PanelRow::new("", RowKind::Plain));

    rows.push(PanelRow::new("Typing sound", RowKind::Heading));
    rows.push(button(
        &format!("{} \u{25be}", state.selected_sound_name()),
        focused == Control::Sound,
    ));
    if let Some(highlight) = state.dropdown {
        for (i, path) in state.sounds.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if i == highlight {
                rows.push(PanelRow::new(format!("    {name}"), RowKind::Focused));
            } else {
                rows.push(PanelRow::new(format!("    {name}"), RowKind::Dim));
            }
        }
    }
    rows.push(PanelRow::new("", RowKind::Plain));

    rows.push(PanelRow::new("Animations", RowKind::Heading));
    if state.animations.is_empty() {
        rows.push(PanelRow::new("  (no .gif files)", RowKind::Dim));
    }
    for i in 0..state.animations.len() {
        rows.push(button(&state.animation_name(i), focused == Control::Animation(i)));
    }
    rows.push(button("Stop animation", focused == Control::StopAnimation));

    for row in &mut rows {
        if row.text.chars().count() > inner {
            row.text = row.text.chars().take(inner).collect();
        }
    }
    rows
}

fn input_row(state: &AppState, inner: usize, focused: bool) -> PanelRow {
    // "  [" + field + "]"
    let field_w = inner.saturating_sub(4).max(1);
    let chars: Vec<char> = state.input.chars().collect();
    let start = state.cursor.saturating_sub(field_w - 1);
    let visible: String = chars.iter().skip(start).take(field_w).collect();
    let pad = field_w - visible.chars().count();
    let cursor = focused.then_some(3 + state.cursor - start);
    PanelRow::new(
        format!("  [{visible}{}]", " ".repeat(pad)),
        RowKind::Input { cursor },
    )
}

fn slider(fraction: f64, width: usize) -> String {
    let width = width.max(2);
    let knob = ((fraction.clamp(0.0, 1.0) * (width - 1) as f64).round()) as usize;
    (0..width)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '\u{2501}',
            std::cmp::Ordering::Equal => '\u{25cf}',
            std::cmp::Ordering::Greater => '\u{2500}',
        })
        .collect()
}

pub fn render_left_panel(
    stdout: &mut io::Stdout,
    layout: &Layout,
    state: &AppState,
) -> anyhow::Result<()> {
    let pw = layout.left_panel_width;
    if pw < 2 {
        return Ok(());
    }
    let cy = layout.canvas_y;
    let inner = (pw - 2) as usize;
    let rows = panel_rows(state, inner);

    for y in 0..layout.panel_height() {
        queue!(
            stdout,
            cursor::MoveTo(0, cy + y),
            style::Print(" ".repeat(inner + 1)),
            style::Print("\u{2502}"),
        )?;
    }

    for (i, row) in rows.iter().enumerate() {
        let y = cy + i as u16;
        if y >= cy + layout.panel_height() {
            break;
        }
        queue!(stdout, cursor::MoveTo(1, y))?;
        match &row.kind {
            RowKind::Heading => queue!(
                stdout,
                style::SetAttribute(style::Attribute::Bold),
                style::Print(&row.text),
                style::SetAttribute(style::Attribute::Reset),
            )?,
            RowKind::Plain => queue!(stdout, style::Print(&row.text))?,
            RowKind::Dim => queue!(
                stdout,
                style::SetAttribute(style::Attribute::Dim),
                style::Print(&row.text),
                style::SetAttribute(style::Attribute::Reset),
            )?,
            RowKind::Focused => queue!(
                stdout,
                style::SetAttribute(style::Attribute::Reverse),
                style::Print(format!("{:<width$}", row.text, width = inner)),
                style::SetAttribute(style::Attribute::Reset),
            )?,
            RowKind::Input { cursor } => {
                for (col, ch) in row.text.chars().enumerate() {
                    if Some(col) == *cursor {
                        queue!(
                            stdout,
                            style::SetAttribute(style::Attribute::Reverse),
                            style::Print(ch),
                            style::SetAttribute(style::Attribute::Reset),
                        )?;
                    } else {
                        queue!(stdout, style::Print(ch))?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetDirs;
    use crate::config::StageConfig;

    fn state() -> AppState {
        AppState::new(StageConfig::default(), AssetDirs::new("/nonexistent-assets"))
    }

    #[test]
    fn focused_button_is_marked() {
        let mut state = state();
        state.focus = 1;
        let rows = panel_rows(&state, 28);
        let sync = rows.iter().find(|r| r.text.contains("Sync text")).unwrap();
        assert_eq!(sync.kind, RowKind::Focused);
        assert!(sync.text.starts_with("> "));
    }

    #[test]
    fn speed_readout_and_empty_asset_lists_are_shown() {
        let rows = panel_rows(&state(), 28);
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert!(texts.contains(&"  100 ms/char \u{2248} 10.0 chars/s"));
        assert!(texts.contains(&"  (none) \u{25be}"));
        assert!(texts.contains(&"  (no .gif files)"));
    }

    #[test]
    fn long_input_scrolls_to_keep_cursor_visible() {
        let mut state = state();
        state.input = "abcdefghijklmnop".into();
        state.cursor = 16;
        let row = input_row(&state, 12, true);
        // 8-wide field shows the last 7 chars plus room for the cursor.
        assert_eq!(row.text, "  [jklmnop ]");
        assert_eq!(row.kind, RowKind::Input { cursor: Some(10) });
    }

    #[test]
    fn slider_knob_tracks_fraction() {
        assert_eq!(slider(0.0, 5), "\u{25cf}\u{2500}\u{2500}\u{2500}\u{2500}");
        assert_eq!(slider(1.0, 5), "\u{2501}\u{2501}\u{2501}\u{2501}\u{25cf}");
    }

    #[test]
    fn pause_button_sits_between_append_and_end_dialog() {
        let mut state = state();
        state.focus = state.controls().iter().position(|c| *c == Control::Pause).unwrap();
        let rows = panel_rows(&state, 28);
        let texts: Vec<&str> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(&texts[3..6], ["  Append", "> Pause", "  End dialog"]);
    }

    #[test]
    fn rows_fit_the_panel() {
        let rows = panel_rows(&state(), 10);
        assert!(rows.iter().all(|r| r.text.chars().count() <= 10));
    }
}
