//! Canvas item kinds and their resolution into concrete `DrawOp`s.

use serde::{Deserialize, Serialize};

use crate::types::{DrawOp, Image, Point, Size, Style};

use super::text::{char_width, wrap_text};

/// Style for text items. `wrap_width` of 0 disables wrapping, `max_rows` of 0
/// disables clipping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub wrap_width: u16,
    #[serde(default)]
    pub max_rows: u16,
}

/// Border plus optional interior fill for rectangles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxStyle {
    #[serde(default)]
    pub border: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Style>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonStyle {
    pub fill_ch: char,
    #[serde(default)]
    pub style: Style,
}

#[derive(Debug, Clone)]
pub(crate) enum Item {
    Image { pos: Point, image: Image },
    Text { pos: Point, text: String, style: TextStyle },
    Rect { origin: Point, size: Size, style: BoxStyle },
    Polygon { points: Vec<Point>, style: PolygonStyle },
}

impl Item {
    pub(crate) fn resolve(&self, z: i32, ops: &mut Vec<DrawOp>) {
        match self {
            Item::Image { pos, image } => resolve_image(*pos, image, z, ops),
            Item::Text { pos, text, style } => resolve_text(*pos, text, style, z, ops),
            Item::Rect { origin, size, style } => resolve_rect(*origin, *size, style, z, ops),
            Item::Polygon { points, style } => resolve_polygon(points, style, z, ops),
        }
    }
}

fn resolve_image(pos: Point, image: &Image, z: i32, ops: &mut Vec<DrawOp>) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            if let Some(cell) = image.cell(x, y) {
                ops.push(DrawOp {
                    x: pos.x + x as i32,
                    y: pos.y + y as i32,
                    ch: cell.ch,
                    style: cell.style.clone(),
                    z_order: z,
                });
            }
        }
    }
}

fn resolve_text(pos: Point, text: &str, style: &TextStyle, z: i32, ops: &mut Vec<DrawOp>) {
    let rows = wrap_text(text, style.wrap_width as usize);
    let max_rows = if style.max_rows == 0 { rows.len() } else { style.max_rows as usize };
    for (r, row) in rows.iter().take(max_rows).enumerate() {
        let mut col = 0i32;
        for ch in row.chars() {
            ops.push(DrawOp {
                x: pos.x + col,
                y: pos.y + r as i32,
                ch,
                style: style.style.clone(),
                z_order: z,
            });
            col += char_width(ch) as i32;
        }
    }
}

fn resolve_rect(origin: Point, size: Size, style: &BoxStyle, z: i32, ops: &mut Vec<DrawOp>) {
    let (x, y) = (origin.x, origin.y);
    let w = size.width as i32;
    let h = size.height as i32;
    if w == 0 || h == 0 {
        return;
    }
    let s = &style.border;
    let mut push = |x: i32, y: i32, ch: char, style: &Style| {
        ops.push(DrawOp { x, y, ch, style: style.clone(), z_order: z });
    };

    if let Some(fill) = &style.fill {
        for j in 1..h - 1 {
            for i in 1..w - 1 {
                push(x + i, y + j, ' ', fill);
            }
        }
    }

    // Top edge
    push(x, y, '┌', s);
    for i in 1..w - 1 {
        push(x + i, y, '─', s);
    }
    if w > 1 {
        push(x + w - 1, y, '┐', s);
    }

    // Side edges
    for j in 1..h - 1 {
        push(x, y + j, '│', s);
        if w > 1 {
            push(x + w - 1, y + j, '│', s);
        }
    }

    // Bottom edge
    if h > 1 {
        push(x, y + h - 1, '└', s);
        for i in 1..w - 1 {
            push(x + i, y + h - 1, '─', s);
        }
        if w > 1 {
            push(x + w - 1, y + h - 1, '┘', s);
        }
    }
}

/// Even-odd fill sampled at cell centres, plus the outline so thin shapes
/// never vanish between samples.
fn resolve_polygon(points: &[Point], style: &PolygonStyle, z: i32, ops: &mut Vec<DrawOp>) {
    if points.is_empty() {
        return;
    }
    let mut cells: Vec<(i32, i32)> = Vec::new();

    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        line_cells(*a, b, &mut cells);
    }

    let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);
    for cy in min_y..=max_y {
        for cx in min_x..=max_x {
            if contains(points, cx as f64 + 0.5, cy as f64 + 0.5) {
                cells.push((cx, cy));
            }
        }
    }

    cells.sort_unstable();
    cells.dedup();
    for (x, y) in cells {
        ops.push(DrawOp { x, y, ch: style.fill_ch, style: style.style.clone(), z_order: z });
    }
}

fn contains(points: &[Point], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = (points[i].x as f64, points[i].y as f64);
        let (xj, yj) = (points[j].x as f64, points[j].y as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// Bresenham between two cell coordinates, inclusive of both ends.
fn line_cells(a: Point, b: Point, out: &mut Vec<(i32, i32)>) {
    let (mut x, mut y) = (a.x, a.y);
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();
    let mut err = dx + dy;
    loop {
        out.push((x, y));
        if x == b.x && y == b.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_of(item: &Item) -> Vec<(i32, i32, char)> {
        let mut ops = Vec::new();
        item.resolve(0, &mut ops);
        ops.into_iter().map(|op| (op.x, op.y, op.ch)).collect()
    }

    #[test]
    fn rect_draws_corners_and_edges() {
        let item = Item::Rect {
            origin: Point::new(1, 1),
            size: Size { width: 4, height: 3 },
            style: BoxStyle::default(),
        };
        let cells = cells_of(&item);
        assert!(cells.contains(&(1, 1, '┌')));
        assert!(cells.contains(&(4, 1, '┐')));
        assert!(cells.contains(&(1, 3, '└')));
        assert!(cells.contains(&(4, 3, '┘')));
        assert!(cells.contains(&(2, 1, '─')));
        assert!(cells.contains(&(1, 2, '│')));
        // Unfilled interior emits nothing.
        assert!(!cells.iter().any(|&(x, y, _)| (x, y) == (2, 2)));
    }

    #[test]
    fn filled_rect_paints_interior() {
        let item = Item::Rect {
            origin: Point::new(0, 0),
            size: Size { width: 3, height: 3 },
            style: BoxStyle { border: Style::default(), fill: Some(Style::default()) },
        };
        assert!(cells_of(&item).contains(&(1, 1, ' ')));
    }

    #[test]
    fn text_wraps_and_clips_rows() {
        let item = Item::Text {
            pos: Point::new(0, 0),
            text: "aa bb cc".into(),
            style: TextStyle { style: Style::default(), wrap_width: 2, max_rows: 2 },
        };
        let cells = cells_of(&item);
        assert_eq!(cells, vec![(0, 0, 'a'), (1, 0, 'a'), (0, 1, 'b'), (1, 1, 'b')]);
    }

    #[test]
    fn text_advances_two_columns_for_wide_glyphs() {
        let item = Item::Text {
            pos: Point::new(0, 0),
            text: "你a".into(),
            style: TextStyle::default(),
        };
        assert_eq!(cells_of(&item), vec![(0, 0, '你'), (2, 0, 'a')]);
    }

    #[test]
    fn triangle_covers_vertices_and_interior() {
        let item = Item::Polygon {
            points: vec![Point::new(2, 0), Point::new(0, 2), Point::new(4, 2)],
            style: PolygonStyle { fill_ch: '#', style: Style::default() },
        };
        let cells = cells_of(&item);
        for v in [(2, 0), (0, 2), (4, 2), (2, 1)] {
            assert!(cells.iter().any(|&(x, y, _)| (x, y) == v), "missing {v:?}");
        }
        assert!(!cells.iter().any(|&(x, y, _)| (x, y) == (0, 0)));
    }

    #[test]
    fn transparent_image_cells_are_skipped() {
        let image = Image::from_cells(2, 1, vec![None, Some(crate::types::Cell::default())]).unwrap();
        let item = Item::Image { pos: Point::new(5, 5), image };
        assert_eq!(cells_of(&item), vec![(6, 5, ' ')]);
    }
}
