//! Speech-bubble dialog box: a bordered, filled rectangle with a pointer
//! arrow on one edge. Geometry is configuration; the engine only shows and
//! hides it.

use serde::{Deserialize, Serialize};

use crate::surface::{BoxStyle, DisplaySurface, ItemHandle, PolygonStyle};
use crate::types::{Color, NamedColor, Point, Size, Style};

use super::typewriter::TextBounds;

/// Which bubble edge the pointer sits on (and points away from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowSide {
    Up,
    Down,
    Left,
    Right,
    None,
}

fn default_padding() -> u16 {
    1
}

fn default_arrow_offset() -> u16 {
    4
}

fn default_arrow_length() -> u16 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLayout {
    /// Top-left corner of the bubble, relative to the canvas.
    pub origin: Point,
    pub size: Size,
    /// Blank cells between the border and the text.
    #[serde(default = "default_padding")]
    pub padding: u16,
    pub arrow: ArrowSide,
    /// Distance of the arrow base from the start of its edge.
    #[serde(default = "default_arrow_offset")]
    pub arrow_offset: u16,
    /// How far the tip sticks out of the bubble.
    #[serde(default = "default_arrow_length")]
    pub arrow_length: u16,
    #[serde(default = "default_frame_style")]
    pub frame: BoxStyle,
    #[serde(default = "default_arrow_style")]
    pub arrow_style: PolygonStyle,
    #[serde(default = "default_text_style")]
    pub text_style: Style,
}

fn bubble_bg() -> Color {
    Color::Rgb { r: 240, g: 240, b: 240 }
}

fn default_frame_style() -> BoxStyle {
    BoxStyle {
        border: Style {
            fg: Some(Color::Rgb { r: 128, g: 128, b: 128 }),
            bg: Some(bubble_bg()),
            ..Default::default()
        },
        fill: Some(Style {
            bg: Some(bubble_bg()),
            ..Default::default()
        }),
    }
}

fn default_arrow_style() -> PolygonStyle {
    PolygonStyle {
        fill_ch: ' ',
        style: Style {
            bg: Some(bubble_bg()),
            ..Default::default()
        },
    }
}

fn default_text_style() -> Style {
    Style {
        fg: Some(Color::Named(NamedColor::Black)),
        bg: Some(bubble_bg()),
        ..Default::default()
    }
}

impl Default for DialogLayout {
    fn default() -> Self {
        DialogLayout {
            origin: Point::new(2, 12),
            size: Size { width: 44, height: 8 },
            padding: default_padding(),
            arrow: ArrowSide::Up,
            arrow_offset: default_arrow_offset(),
            arrow_length: default_arrow_length(),
            frame: default_frame_style(),
            arrow_style: default_arrow_style(),
            text_style: default_text_style(),
        }
    }
}

impl DialogLayout {
    fn inset(&self) -> u16 {
        1 + self.padding
    }

    /// Where the first text cell goes.
    pub fn text_origin(&self) -> Point {
        let inset = self.inset() as i32;
        Point::new(self.origin.x + inset, self.origin.y + inset)
    }

    /// Room available for text inside the border and padding. Never zero, so
    /// a degenerate layout still bounds the text instead of disabling
    /// wrapping.
    pub fn text_bounds(&self) -> TextBounds {
        let inset = self.inset() * 2;
        TextBounds {
            width: self.size.width.saturating_sub(inset).max(1),
            height: self.size.height.saturating_sub(inset).max(1),
        }
    }

    /// Triangle vertices for the pointer, base on the bubble edge.
    pub fn arrow_points(&self) -> Option<[Point; 3]> {
        let len = self.arrow_length as i32;
        if len == 0 {
            return None;
        }
        let (x, y) = (self.origin.x, self.origin.y);
        let w = self.size.width as i32;
        let h = self.size.height as i32;
        let off = self.arrow_offset as i32;

        let points = match self.arrow {
            ArrowSide::None => return None,
            ArrowSide::Up => {
                let bx = x + off;
                [Point::new(bx, y), Point::new(bx + 2 * len, y), Point::new(bx + len, y - len)]
            }
            ArrowSide::Down => {
                let bx = x + off;
                let by = y + h - 1;
                [Point::new(bx, by), Point::new(bx + 2 * len, by), Point::new(bx + len, by + len)]
            }
            ArrowSide::Left => {
                let by = y + off.min(h - 1);
                [Point::new(x, by), Point::new(x, by + len), Point::new(x - 2 * len, by + len / 2)]
            }
            ArrowSide::Right => {
                let by = y + off.min(h - 1);
                let bx = x + w - 1;
                [Point::new(bx, by), Point::new(bx, by + len), Point::new(bx + 2 * len, by + len / 2)]
            }
        };
        Some(points)
    }
}

/// The bubble's visual elements. Text is not part of it: the typewriter
/// owns its own text item, which the stage raises above the bubble.
pub struct DialogBox {
    layout: DialogLayout,
    frame: Option<ItemHandle>,
    arrow: Option<ItemHandle>,
}

impl DialogBox {
    pub fn new(layout: DialogLayout) -> Self {
        DialogBox {
            layout,
            frame: None,
            arrow: None,
        }
    }

    pub fn layout(&self) -> &DialogLayout {
        &self.layout
    }

    pub fn is_visible(&self) -> bool {
        self.frame.is_some()
    }

    /// Draw the bubble if it is not already on the surface.
    pub fn show(&mut self, surface: &mut dyn DisplaySurface) {
        if self.is_visible() {
            return;
        }
        self.frame = Some(surface.draw_rect(self.layout.origin, self.layout.size, &self.layout.frame));
        self.arrow = self
            .layout
            .arrow_points()
            .map(|points| surface.draw_polygon(&points, &self.layout.arrow_style));
    }

    pub fn hide(&mut self, surface: &mut dyn DisplaySurface) {
        for handle in [self.frame.take(), self.arrow.take()].into_iter().flatten() {
            surface.remove(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Canvas;

    fn layout(arrow: ArrowSide) -> DialogLayout {
        DialogLayout {
            origin: Point::new(10, 10),
            size: Size { width: 20, height: 6 },
            arrow,
            arrow_offset: 3,
            arrow_length: 2,
            ..Default::default()
        }
    }

    #[test]
    fn text_region_sits_inside_border_and_padding() {
        let l = layout(ArrowSide::Up);
        assert_eq!(l.text_origin(), Point::new(12, 12));
        assert_eq!(l.text_bounds(), TextBounds { width: 16, height: 2 });
    }

    #[test]
    fn tiny_bubble_still_bounds_text() {
        let l = DialogLayout {
            size: Size { width: 2, height: 2 },
            ..layout(ArrowSide::Up)
        };
        assert_eq!(l.text_bounds(), TextBounds { width: 1, height: 1 });
    }

    #[test]
    fn up_arrow_points_above_the_top_edge() {
        let [a, b, tip] = layout(ArrowSide::Up).arrow_points().unwrap();
        assert_eq!((a.y, b.y), (10, 10));
        assert_eq!(tip, Point::new(15, 8));
    }

    #[test]
    fn down_arrow_points_below_the_bottom_edge() {
        let [_, _, tip] = layout(ArrowSide::Down).arrow_points().unwrap();
        assert_eq!(tip, Point::new(15, 17));
    }

    #[test]
    fn side_arrows_point_outwards() {
        let [_, _, left_tip] = layout(ArrowSide::Left).arrow_points().unwrap();
        assert!(left_tip.x < 10);
        let [_, _, right_tip] = layout(ArrowSide::Right).arrow_points().unwrap();
        assert!(right_tip.x > 29);
    }

    #[test]
    fn no_arrow_when_disabled() {
        assert!(layout(ArrowSide::None).arrow_points().is_none());
    }

    #[test]
    fn show_and_hide_manage_surface_items() {
        let mut canvas = Canvas::new(40, 20);
        let mut dialog = DialogBox::new(layout(ArrowSide::Up));

        dialog.show(&mut canvas);
        dialog.show(&mut canvas);
        assert!(dialog.is_visible());
        assert_eq!(canvas.len(), 2);

        dialog.hide(&mut canvas);
        assert!(!dialog.is_visible());
        assert!(canvas.is_empty());
    }
}
