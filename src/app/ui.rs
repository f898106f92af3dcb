/// Width (in columns) of the left-hand control panel, border included.
pub const LEFT_PANEL_WIDTH: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub left_panel_width: u16,
    pub canvas_x: u16,
    pub canvas_y: u16,
    pub canvas_width: u16,
    pub canvas_height: u16,
    pub status_y: u16,
    pub term_width: u16,
    pub menu_h: u16,
}

impl Layout {
    /// Menu bar on top, status row at the bottom, panel left, stage right.
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let menu_h: u16 = 1;
        let status_h: u16 = 1;
        let left = LEFT_PANEL_WIDTH.min(term_width);
        Layout {
            left_panel_width: left,
            canvas_x: left,
            canvas_y: menu_h,
            canvas_width: term_width.saturating_sub(left),
            canvas_height: term_height.saturating_sub(menu_h + status_h),
            status_y: term_height.saturating_sub(status_h),
            term_width,
            menu_h,
        }
    }

    pub fn panel_height(&self) -> u16 {
        self.canvas_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_left_canvas_right() {
        let layout = Layout::compute(100, 30);
        assert_eq!(layout.left_panel_width, LEFT_PANEL_WIDTH);
        assert_eq!((layout.canvas_x, layout.canvas_y), (30, 1));
        assert_eq!((layout.canvas_width, layout.canvas_height), (70, 28));
        assert_eq!(layout.status_y, 29);
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        let layout = Layout::compute(10, 1);
        assert_eq!(layout.canvas_width, 0);
        assert_eq!(layout.canvas_height, 0);
        assert_eq!(layout.status_y, 0);
    }
}
