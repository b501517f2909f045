//! Drawing primitives
//!
//! Thin pass-throughs to the display. Coordinates are never checked or
//! clipped here; the native layer gets them as given.

use crate::color::resolve;
use crate::core::display::{Display, DrawOp, LineStyle};
use crate::core::session::Session;

/// Native arc angle units per degree
const ARC_UNITS_PER_DEGREE: i32 = 64;

/// Current line width and style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStyle {
    pub width: u32,
    pub style: LineStyle,
}

impl<D: Display> Session<D> {
    /// Change the current drawing color
    pub fn set_color(&mut self, r: u8, g: u8, b: u8) {
        let pixel = resolve(self.color_mode(), &mut self.display, r, g, b);
        self.display.set_foreground(pixel);
    }

    /// Clear the window to the background color
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Change the background color, clear and flush
    pub fn set_background(&mut self, r: u8, g: u8, b: u8) {
        let pixel = resolve(self.color_mode(), &mut self.display, r, g, b);
        self.display.set_background(pixel);
        self.display.clear();
        self.display.flush();
    }

    /// Set line width and style until the next change
    pub fn set_line_style(&mut self, width: u32, style: LineStyle) {
        self.style = DrawStyle { width, style };
        self.display.set_line_attributes(width, style);
    }

    pub fn line_style(&self) -> DrawStyle {
        self.style
    }

    pub fn point(&mut self, x: i32, y: i32) {
        self.display.draw(&DrawOp::Point { x, y });
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.display.draw(&DrawOp::Line { x1, y1, x2, y2 });
    }

    pub fn rectangle(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.display.draw(&DrawOp::Rectangle { x, y, width, height, fill: false });
    }

    pub fn fill_rectangle(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.display.draw(&DrawOp::Rectangle { x, y, width, height, fill: true });
    }

    /// Arc inside the `width` x `height` box at `(x, y)`, from `start`
    /// degrees sweeping `sweep` degrees counter-clockwise
    pub fn arc(&mut self, x: i32, y: i32, width: u32, height: u32, start: i32, sweep: i32) {
        self.display.draw(&arc_op(x, y, width, height, start, sweep, false));
    }

    pub fn fill_arc(&mut self, x: i32, y: i32, width: u32, height: u32, start: i32, sweep: i32) {
        self.display.draw(&arc_op(x, y, width, height, start, sweep, true));
    }

    /// Circular arc: an [`arc`](Self::arc) with a square box of side `radius`
    pub fn segment(&mut self, x: i32, y: i32, radius: u32, start: i32, sweep: i32) {
        self.arc(x, y, radius, radius, start, sweep);
    }

    pub fn fill_segment(&mut self, x: i32, y: i32, radius: u32, start: i32, sweep: i32) {
        self.fill_arc(x, y, radius, radius, start, sweep);
    }

    /// Triangle outline as three lines
    pub fn triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.line(x1, y1, x2, y2);
        self.line(x2, y2, x3, y3);
        self.line(x3, y3, x1, y1);
    }

    pub fn fill_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.display.draw(&DrawOp::FillTriangle {
            points: [(x1, y1), (x2, y2), (x3, y3)],
        });
    }

    /// Draw `bytes` with its baseline at `(x, y)` on a background-filled box
    pub fn text(&mut self, x: i32, y: i32, bytes: &[u8]) {
        self.display.draw(&DrawOp::Text { x, y, bytes: bytes.to_vec() });
    }
}

fn arc_op(x: i32, y: i32, width: u32, height: u32, start: i32, sweep: i32, fill: bool) -> DrawOp {
    DrawOp::Arc {
        x,
        y,
        width,
        height,
        start: start.saturating_mul(ARC_UNITS_PER_DEGREE),
        sweep: sweep.saturating_mul(ARC_UNITS_PER_DEGREE),
        fill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::{Pixel, VisualClass};
    use crate::core::headless::HeadlessDisplay;

    fn session() -> Session<HeadlessDisplay> {
        Session::open_with(HeadlessDisplay::new(), 200, 100, "draw").unwrap()
    }

    #[test]
    fn test_primitives_pass_through() {
        let mut s = session();
        s.point(-5, 1000);
        s.line(0, 0, 10, 10);
        s.rectangle(1, 2, 3, 4);
        s.fill_rectangle(5, 6, 7, 8);
        assert_eq!(
            s.display().ops(),
            &[
                DrawOp::Point { x: -5, y: 1000 },
                DrawOp::Line { x1: 0, y1: 0, x2: 10, y2: 10 },
                DrawOp::Rectangle { x: 1, y: 2, width: 3, height: 4, fill: false },
                DrawOp::Rectangle { x: 5, y: 6, width: 7, height: 8, fill: true },
            ]
        );
    }

    #[test]
    fn test_arcs_use_native_angle_units() {
        let mut s = session();
        s.arc(10, 10, 50, 30, 0, 90);
        s.fill_segment(0, 0, 20, 45, 360);
        assert_eq!(
            s.display().ops(),
            &[
                DrawOp::Arc { x: 10, y: 10, width: 50, height: 30, start: 0, sweep: 90 * 64, fill: false },
                DrawOp::Arc { x: 0, y: 0, width: 20, height: 20, start: 45 * 64, sweep: 360 * 64, fill: true },
            ]
        );
    }

    #[test]
    fn test_triangles() {
        let mut s = session();
        s.triangle(0, 0, 10, 0, 5, 8);
        assert_eq!(
            s.display_mut().take_ops(),
            vec![
                DrawOp::Line { x1: 0, y1: 0, x2: 10, y2: 0 },
                DrawOp::Line { x1: 10, y1: 0, x2: 5, y2: 8 },
                DrawOp::Line { x1: 5, y1: 8, x2: 0, y2: 0 },
            ]
        );

        s.fill_triangle(0, 0, 10, 0, 5, 8);
        assert_eq!(
            s.display().ops(),
            &[DrawOp::FillTriangle { points: [(0, 0), (10, 0), (5, 8)] }]
        );
    }

    #[test]
    fn test_text() {
        let mut s = session();
        s.text(4, 20, b"hello");
        assert_eq!(
            s.display().ops(),
            &[DrawOp::Text { x: 4, y: 20, bytes: b"hello".to_vec() }]
        );
    }

    #[test]
    fn test_set_color_fast_mode() {
        let mut s = session();
        s.set_color(0x11, 0x22, 0x33);
        assert_eq!(s.display().foreground(), Pixel(0x112233));
        assert!(s.display().palette_requests().is_empty());
    }

    #[test]
    fn test_set_color_palette_mode() {
        let display = HeadlessDisplay::with_visual(VisualClass::PseudoColor);
        let mut s = Session::open_with(display, 10, 10, "p").unwrap();
        s.set_color(1, 2, 3);
        s.set_color(200, 0, 0);
        assert_eq!(s.display().palette_requests(), &[(0x100, 0x200, 0x300), (0xc800, 0, 0)]);
        assert_eq!(s.display().foreground(), Pixel(1));
    }

    #[test]
    fn test_set_background_clears_and_flushes() {
        let mut s = session();
        let flushes = s.display().flushes();
        s.set_background(0, 128, 0);
        assert_eq!(s.display().background(), Pixel(0x008000));
        assert_eq!(s.display().clears(), 1);
        assert_eq!(s.display().flushes(), flushes + 1);

        s.clear();
        assert_eq!(s.display().clears(), 2);
    }

    #[test]
    fn test_line_style_persists() {
        let mut s = session();
        assert_eq!(s.line_style(), DrawStyle::default());
        s.set_line_style(4, LineStyle::Dashed);
        s.line(0, 0, 1, 1);
        assert_eq!(s.line_style(), DrawStyle { width: 4, style: LineStyle::Dashed });
        assert_eq!(s.display().line_attributes(), (4, LineStyle::Dashed));
    }
}
