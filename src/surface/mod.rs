//! Display surface: the retained-mode drawing target the engines talk to.
//!
//! Engines create items (images, text, rectangles, polygons), keep the
//! returned `ItemHandle`s and mutate or remove them later. `Canvas` is the
//! in-memory implementation; it resolves its items into a `ResolvedScene`
//! for the renderer and never touches the terminal itself.

mod shapes;
pub mod text;

use std::collections::BTreeMap;

use log::debug;

use crate::types::{DrawOp, Image, Point, ResolvedScene, Size};

pub use shapes::{BoxStyle, PolygonStyle, TextStyle};
use shapes::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemHandle(u64);

/// Drawing operations available to the engines.
///
/// Items stack in creation order; `raise` moves one to the top. Mutating a
/// handle that no longer exists is ignored and reported as `false`.
pub trait DisplaySurface {
    fn show_image(&mut self, pos: Point, image: &Image) -> ItemHandle;
    fn update_image(&mut self, handle: ItemHandle, image: &Image) -> bool;
    fn show_text(&mut self, pos: Point, text: &str, style: &TextStyle) -> ItemHandle;
    fn update_text(&mut self, handle: ItemHandle, text: &str) -> bool;
    fn draw_rect(&mut self, origin: Point, size: Size, style: &BoxStyle) -> ItemHandle;
    fn draw_polygon(&mut self, points: &[Point], style: &PolygonStyle) -> ItemHandle;
    fn raise(&mut self, handle: ItemHandle) -> bool;
    fn remove(&mut self, handle: ItemHandle) -> bool;
}

#[derive(Debug)]
struct Entry {
    /// Stacking key; larger draws on top.
    z: u64,
    item: Item,
}

/// In-memory canvas of a fixed size in terminal cells.
#[derive(Debug)]
pub struct Canvas {
    size: Size,
    next_id: u64,
    next_z: u64,
    items: BTreeMap<u64, Entry>,
    dirty: bool,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Canvas {
            size: Size { width, height },
            next_id: 0,
            next_z: 0,
            items: BTreeMap::new(),
            dirty: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Size { width, height };
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.items.contains_key(&handle.0)
    }

    /// Current text of a text item.
    pub fn text(&self, handle: ItemHandle) -> Option<&str> {
        match self.items.get(&handle.0).map(|e| &e.item) {
            Some(Item::Text { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Current image of an image item.
    pub fn image(&self, handle: ItemHandle) -> Option<&Image> {
        match self.items.get(&handle.0).map(|e| &e.item) {
            Some(Item::Image { image, .. }) => Some(image),
            _ => None,
        }
    }

    /// Returns whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Resolve every item, bottom to top, into draw operations.
    pub fn scene(&self) -> ResolvedScene {
        let mut entries: Vec<&Entry> = self.items.values().collect();
        entries.sort_by_key(|e| e.z);

        let mut ops: Vec<DrawOp> = Vec::new();
        for (layer, entry) in entries.into_iter().enumerate() {
            entry.item.resolve(layer as i32, &mut ops);
        }

        ResolvedScene {
            width: self.size.width,
            height: self.size.height,
            ops,
        }
    }

    fn insert(&mut self, item: Item) -> ItemHandle {
        let id = self.next_id;
        self.next_id += 1;
        let z = self.bump_z();
        self.items.insert(id, Entry { z, item });
        self.dirty = true;
        ItemHandle(id)
    }

    fn bump_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    fn item_mut(&mut self, handle: ItemHandle) -> Option<&mut Item> {
        let entry = self.items.get_mut(&handle.0);
        if entry.is_none() {
            debug!("ignoring update to stale canvas item {handle:?}");
        }
        entry.map(|e| &mut e.item)
    }
}

impl DisplaySurface for Canvas {
    fn show_image(&mut self, pos: Point, image: &Image) -> ItemHandle {
        self.insert(Item::Image { pos, image: image.clone() })
    }

    fn update_image(&mut self, handle: ItemHandle, new_image: &Image) -> bool {
        let updated = match self.item_mut(handle) {
            Some(Item::Image { image, .. }) => {
                *image = new_image.clone();
                true
            }
            _ => false,
        };
        self.dirty |= updated;
        updated
    }

    fn show_text(&mut self, pos: Point, text: &str, style: &TextStyle) -> ItemHandle {
        self.insert(Item::Text {
            pos,
            text: text.to_string(),
            style: style.clone(),
        })
    }

    fn update_text(&mut self, handle: ItemHandle, new_text: &str) -> bool {
        let updated = match self.item_mut(handle) {
            Some(Item::Text { text, .. }) => {
                if text != new_text {
                    text.clear();
                    text.push_str(new_text);
                }
                true
            }
            _ => false,
        };
        self.dirty |= updated;
        updated
    }

    fn draw_rect(&mut self, origin: Point, size: Size, style: &BoxStyle) -> ItemHandle {
        self.insert(Item::Rect { origin, size, style: style.clone() })
    }

    fn draw_polygon(&mut self, points: &[Point], style: &PolygonStyle) -> ItemHandle {
        self.insert(Item::Polygon {
            points: points.to_vec(),
            style: style.clone(),
        })
    }

    fn raise(&mut self, handle: ItemHandle) -> bool {
        if !self.items.contains_key(&handle.0) {
            return false;
        }
        let z = self.bump_z();
        if let Some(entry) = self.items.get_mut(&handle.0) {
            entry.z = z;
        }
        self.dirty = true;
        true
    }

    fn remove(&mut self, handle: ItemHandle) -> bool {
        let removed = self.items.remove(&handle.0).is_some();
        self.dirty |= removed;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;

    fn render(canvas: &Canvas) -> Vec<String> {
        Renderer::rasterize(&canvas.scene())
            .into_iter()
            .map(|row| row.into_iter().map(|c| c.ch).collect())
            .collect()
    }

    #[test]
    fn later_items_draw_on_top_until_raised() {
        let mut canvas = Canvas::new(3, 1);
        let text = canvas.show_text(Point::new(0, 0), "abc", &TextStyle::default());
        canvas.draw_rect(Point::new(0, 0), Size { width: 3, height: 1 }, &BoxStyle::default());
        assert_eq!(render(&canvas), vec!["┌─┐"]);

        assert!(canvas.raise(text));
        assert_eq!(render(&canvas), vec!["abc"]);
    }

    #[test]
    fn update_and_remove_track_handles() {
        let mut canvas = Canvas::new(4, 1);
        let img = canvas.show_image(Point::new(0, 0), &Image::filled(1, 1, 'x'));
        assert!(canvas.update_image(img, &Image::filled(1, 1, 'y')));
        assert_eq!(render(&canvas), vec!["y   "]);

        assert!(canvas.remove(img));
        assert!(!canvas.remove(img));
        assert!(!canvas.update_image(img, &Image::filled(1, 1, 'z')));
        assert_eq!(render(&canvas), vec!["    "]);
    }

    #[test]
    fn update_text_rejects_non_text_items() {
        let mut canvas = Canvas::new(2, 2);
        let rect = canvas.draw_rect(Point::new(0, 0), Size { width: 2, height: 2 }, &BoxStyle::default());
        assert!(!canvas.update_text(rect, "hi"));
        assert_eq!(canvas.text(rect), None);
    }

    #[test]
    fn dirty_flag_follows_mutations() {
        let mut canvas = Canvas::new(2, 1);
        assert!(canvas.take_dirty());
        assert!(!canvas.take_dirty());
        let t = canvas.show_text(Point::new(0, 0), "", &TextStyle::default());
        assert!(canvas.take_dirty());
        canvas.update_text(t, "a");
        assert!(canvas.take_dirty());
        assert_eq!(canvas.text(t), Some("a"));
    }
}
