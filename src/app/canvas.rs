//! Painting the stage's cell grid into its region of the terminal.

use std::io;

use crossterm::{cursor, queue, style};

use crate::renderer::Grid;
use crate::types::{Cell, CellChange, Color, NamedColor, Style};

use super::ui::Layout;

pub fn render_full(stdout: &mut io::Stdout, layout: &Layout, grid: &Grid) -> anyhow::Result<()> {
    for (y, row) in grid.iter().enumerate() {
        queue!(stdout, cursor::MoveTo(layout.canvas_x, layout.canvas_y + y as u16))?;
        for cell in row {
            print_cell(stdout, cell)?;
        }
    }
    Ok(())
}

pub fn render_diff(
    stdout: &mut io::Stdout,
    layout: &Layout,
    changes: &[CellChange],
) -> anyhow::Result<()> {
    for change in changes {
        // The glyph to the left already covers this column.
        if change.cell.is_continuation() {
            continue;
        }
        queue!(
            stdout,
            cursor::MoveTo(layout.canvas_x + change.x, layout.canvas_y + change.y),
        )?;
        print_cell(stdout, &change.cell)?;
    }
    Ok(())
}

fn print_cell(stdout: &mut io::Stdout, cell: &Cell) -> anyhow::Result<()> {
    if cell.is_continuation() {
        return Ok(());
    }
    let cs = to_content_style(&cell.style);
    queue!(stdout, style::PrintStyledContent(style::StyledContent::new(cs, cell.ch)))?;
    Ok(())
}

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
            NamedColor::Grey => style::Color::Grey,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
