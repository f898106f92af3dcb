use std::io;

use crossterm::{cursor, queue, style, terminal};

/// Split a menu item into `(text, is_key)` runs, where keys are the
/// bracketed parts such as `[Tab]`. An unclosed bracket is plain text.
pub fn menu_segments(item: &str) -> Vec<(&str, bool)> {
    let mut segments = Vec::new();
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            segments.push((rest, false));
            break;
        };
        if open > 0 {
            segments.push((&rest[..open], false));
        }
        rest = &rest[open..];
        match rest.find(']') {
            Some(close) => {
                segments.push((&rest[..=close], true));
                rest = &rest[close + 1..];
            }
            None => {
                segments.push((rest, false));
                break;
            }
        }
    }
    segments
}

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(stdout: &mut io::Stdout, item: &str) -> anyhow::Result<()> {
    for (text, is_key) in menu_segments(item) {
        let attr = if is_key {
            style::Attribute::Bold
        } else {
            style::Attribute::Dim
        };
        queue!(
            stdout,
            style::SetAttribute(attr),
            style::Print(text),
            style::SetAttribute(style::Attribute::Reset),
        )?;
    }
    Ok(())
}

/// Clear row `y` and print `items` across it, two spaces apart.
pub fn render_menubar(stdout: &mut io::Stdout, y: u16, items: &[&str]) -> anyhow::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
    )?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            queue!(stdout, style::Print("  "))?;
        }
        print_menu_item(stdout, item)?;
    }
    Ok(())
}

/// Dimmed one-line status message, cut to `width` chars.
pub fn render_status(
    stdout: &mut io::Stdout,
    y: u16,
    width: u16,
    message: &str,
) -> anyhow::Result<()> {
    let text: String = format!(" {message}").chars().take(width as usize).collect();
    let mut cs = style::ContentStyle::default();
    cs.attributes.set(style::Attribute::Dim);
    queue!(
        stdout,
        cursor::MoveTo(0, y),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::PrintStyledContent(style::StyledContent::new(cs, text)),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_mark_keys() {
        assert_eq!(
            menu_segments("[Tab] next [Enter]"),
            vec![("[Tab]", true), (" next ", false), ("[Enter]", true)]
        );
    }

    #[test]
    fn unclosed_bracket_is_plain() {
        assert_eq!(menu_segments("quit [Esc"), vec![("quit ", false), ("[Esc", false)]);
        assert!(menu_segments("").is_empty());
    }
}
