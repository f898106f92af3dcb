//! Shared boundary types for the stage.
//!
//! This module defines the two key data contracts:
//! - Surface → Renderer (in-memory): `ResolvedScene` containing `DrawOp`s
//! - Renderer → terminal: cell grids and `CellChange` diffs
//!
//! Sprite frames (`Image`) are already expressed in terminal cells, so the
//! engines never see pixels.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared style primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Grey,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg: Option<Color>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub dim: bool,
}

impl Style {
    pub fn is_default(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.dim
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A canvas cell coordinate. Signed so shapes may hang partly off-canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

// ---------------------------------------------------------------------------
// Cells and sprite frames
// ---------------------------------------------------------------------------

/// Placeholder stored in the cell to the right of a double-width glyph.
/// The terminal writer skips it since the glyph already covers that column.
pub const WIDE_CONTINUATION: char = '\0';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub ch: char,
    #[serde(default, skip_serializing_if = "Style::is_default")]
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

impl Cell {
    pub fn is_continuation(&self) -> bool {
        self.ch == WIDE_CONTINUATION
    }
}

/// One decoded sprite frame, already converted to terminal cells.
///
/// `None` cells are transparent and leave whatever is underneath visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    cells: Vec<Option<Cell>>,
}

impl Image {
    /// Build an image from row-major cells. Returns `None` if the cell count
    /// does not match the dimensions.
    pub fn from_cells(width: u16, height: u16, cells: Vec<Option<Cell>>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Image { width, height, cells })
    }

    /// A solid block of `ch`, mostly useful for tests and placeholders.
    pub fn filled(width: u16, height: u16, ch: char) -> Self {
        let cell = Cell { ch, style: Style::default() };
        Image {
            width,
            height,
            cells: vec![Some(cell); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize].as_ref()
    }
}

// ---------------------------------------------------------------------------
// Surface → Renderer boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DrawOp {
    pub x: i32,
    pub y: i32,
    pub ch: char,
    pub style: Style,
    pub z_order: i32,
}

#[derive(Debug, Clone)]
pub struct ResolvedScene {
    pub width: u16,
    pub height: u16,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → terminal boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_rejects_mismatched_cell_count() {
        assert!(Image::from_cells(2, 2, vec![None; 3]).is_none());
        assert!(Image::from_cells(2, 2, vec![None; 4]).is_some());
    }

    #[test]
    fn image_cell_lookup_is_row_major() {
        let mut cells = vec![None; 6];
        cells[4] = Some(Cell { ch: 'x', style: Style::default() });
        let img = Image::from_cells(3, 2, cells).unwrap();
        assert_eq!(img.cell(1, 1).map(|c| c.ch), Some('x'));
        assert!(img.cell(0, 0).is_none());
        assert!(img.cell(3, 0).is_none());
    }

    #[test]
    fn style_default_detection() {
        assert!(Style::default().is_default());
        let bold = Style { bold: true, ..Default::default() };
        assert!(!bold.is_default());
    }
}
