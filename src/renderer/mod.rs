//! Renderer: the deterministic rasterizer.
//!
//! Takes a `ResolvedScene` (in-memory, from the canvas) and produces a
//! fixed-size cell grid, plus cell-level diffs between consecutive grids so
//! the terminal only receives what changed.
//!
//! The renderer is pure and stateless. Given the same input, it always
//! produces the same output. It knows nothing about timers, dialogs or
//! sprites.

use unicode_width::UnicodeWidthChar;

use crate::types::{Cell, CellChange, ResolvedScene, WIDE_CONTINUATION};

pub type Grid = Vec<Vec<Cell>>;

pub struct Renderer;

impl Renderer {
    /// An empty grid of the given size.
    pub fn blank(width: u16, height: u16) -> Grid {
        vec![vec![Cell::default(); width as usize]; height as usize]
    }

    /// Rasterize a resolved scene onto a fixed-size cell grid.
    ///
    /// Draw operations are sorted by z-order so that higher z values
    /// paint over lower ones. The sort is stable, so ops on the same layer
    /// keep emission order. Double-width glyphs claim the cell to their right.
    pub fn rasterize(scene: &ResolvedScene) -> Grid {
        let w = scene.width as usize;
        let h = scene.height as usize;
        let mut grid = Self::blank(scene.width, scene.height);

        let mut ops: Vec<_> = scene.ops.iter().collect();
        ops.sort_by_key(|op| op.z_order);

        for op in ops {
            if op.x < 0 || op.y < 0 {
                continue;
            }
            let x = op.x as usize;
            let y = op.y as usize;
            if x >= w || y >= h {
                continue;
            }
            let wide = op.ch.width().unwrap_or(1) > 1;
            if wide && x + 1 >= w {
                // No room for the second column.
                continue;
            }

            let row = &mut grid[y];
            // Painting over half of an existing wide glyph breaks it.
            if row[x].is_continuation() && x > 0 {
                row[x - 1] = Cell::default();
            }
            if x + 1 < w && row[x + 1].is_continuation() {
                row[x + 1] = Cell::default();
            }

            row[x] = Cell {
                ch: op.ch,
                style: op.style.clone(),
            };
            if wide {
                if x + 2 < w && row[x + 2].is_continuation() {
                    row[x + 2] = Cell::default();
                }
                row[x + 1] = Cell {
                    ch: WIDE_CONTINUATION,
                    style: op.style.clone(),
                };
            }
        }

        grid
    }

    /// Compute a cell-level diff between two grids of the same size.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: next_cell.clone(),
                    });
                }
            }
        }
        changes
    }
}
