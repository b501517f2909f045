//! Headless display
//!
//! An in-memory stand-in for the X server. Events are scripted into a queue,
//! the palette is a small table with nearest-match fallback, and every
//! drawing request is recorded so callers can inspect what was drawn.

use std::collections::VecDeque;
use std::fmt::Write as _;

use super::display::{Display, DrawOp, EventMask, LineStyle, NativeEvent, Pixel, VisualClass};
use crate::error::{GfxError, Result};

/// Window state as the headless server sees it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub mapped: bool,
    pub input: EventMask,
}

/// Scripted display with no server behind it
#[derive(Debug)]
pub struct HeadlessDisplay {
    visual: VisualClass,
    queue: VecDeque<NativeEvent>,
    window: Option<HeadlessWindow>,
    gc_created: bool,
    foreground: Pixel,
    background: Pixel,
    line: (u32, LineStyle),
    palette: Vec<(u16, u16, u16)>,
    capacity: usize,
    palette_requests: Vec<(u16, u16, u16)>,
    ops: Vec<DrawOp>,
    clears: usize,
    flushes: usize,
    closed: bool,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDisplay {
    /// True-color display with an empty queue
    pub fn new() -> Self {
        Self::with_visual(VisualClass::TrueColor)
    }

    pub fn with_visual(visual: VisualClass) -> Self {
        Self {
            visual,
            queue: VecDeque::new(),
            window: None,
            gc_created: false,
            foreground: Pixel(0),
            background: Pixel(0),
            line: (0, LineStyle::Solid),
            palette: Vec::new(),
            capacity: 256,
            palette_requests: Vec::new(),
            ops: Vec::new(),
            clears: 0,
            flushes: 0,
            closed: false,
        }
    }

    /// Limit the number of distinct palette cells
    pub fn palette_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Queue events to be delivered in order
    pub fn with_events<I: IntoIterator<Item = NativeEvent>>(mut self, events: I) -> Self {
        self.queue.extend(events);
        self
    }

    /// Append an event to the tail of the queue
    pub fn push_event(&mut self, event: NativeEvent) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn peek(&self) -> Option<&NativeEvent> {
        self.queue.front()
    }

    pub fn window(&self) -> Option<&HeadlessWindow> {
        self.window.as_ref()
    }

    pub fn has_gc(&self) -> bool {
        self.gc_created
    }

    pub fn foreground(&self) -> Pixel {
        self.foreground
    }

    pub fn background(&self) -> Pixel {
        self.background
    }

    pub fn line_attributes(&self) -> (u32, LineStyle) {
        self.line
    }

    /// Channel triples passed to `alloc_color`, in order
    pub fn palette_requests(&self) -> &[(u16, u16, u16)] {
        &self.palette_requests
    }

    /// Drawing requests issued so far
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Human-readable dump of the recorded drawing requests
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        for op in &self.ops {
            let _ = match op {
                DrawOp::Point { x, y } => writeln!(out, "point ({}, {})", x, y),
                DrawOp::Line { x1, y1, x2, y2 } => {
                    writeln!(out, "line ({}, {}) -> ({}, {})", x1, y1, x2, y2)
                }
                DrawOp::Rectangle { x, y, width, height, fill } => writeln!(
                    out,
                    "{} ({}, {}) {}x{}",
                    if *fill { "fill-rectangle" } else { "rectangle" },
                    x, y, width, height
                ),
                DrawOp::Arc { x, y, width, height, start, sweep, fill } => writeln!(
                    out,
                    "{} ({}, {}) {}x{} from {} sweep {}",
                    if *fill { "fill-arc" } else { "arc" },
                    x, y, width, height,
                    start / 64, sweep / 64
                ),
                DrawOp::FillTriangle { points } => writeln!(
                    out,
                    "fill-triangle ({}, {}) ({}, {}) ({}, {})",
                    points[0].0, points[0].1, points[1].0, points[1].1, points[2].0, points[2].1
                ),
                DrawOp::Text { x, y, bytes } => {
                    writeln!(out, "text ({}, {}) {:?}", x, y, String::from_utf8_lossy(bytes))
                }
            };
        }
        out
    }

    fn nearest_cell(&self, red: u16, green: u16, blue: u16) -> Option<usize> {
        let dist = |&(r, g, b): &(u16, u16, u16)| {
            let dr = i64::from(r) - i64::from(red);
            let dg = i64::from(g) - i64::from(green);
            let db = i64::from(b) - i64::from(blue);
            dr * dr + dg * dg + db * db
        };
        self.palette
            .iter()
            .enumerate()
            .min_by_key(|(_, cell)| dist(cell))
            .map(|(i, _)| i)
    }
}

impl Display for HeadlessDisplay {
    type Raw = NativeEvent;

    fn visual_class(&self) -> VisualClass {
        self.visual
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        // Same rule the native title property enforces
        std::ffi::CString::new(title).map_err(GfxError::InvalidTitle)?;
        self.window = Some(HeadlessWindow {
            width,
            height,
            title: title.to_string(),
            mapped: false,
            input: EventMask::empty(),
        });
        Ok(())
    }

    fn select_input(&mut self, mask: EventMask) {
        if let Some(window) = &mut self.window {
            window.input = mask;
        }
    }

    fn map_window(&mut self) {
        if let Some(window) = &mut self.window {
            window.mapped = true;
            if window.input.contains(EventMask::STRUCTURE_NOTIFY) {
                self.queue.push_back(NativeEvent::MapNotify);
            }
        }
    }

    fn create_gc(&mut self) {
        self.gc_created = true;
        self.foreground = Pixel(0xffffff);
    }

    fn next_event(&mut self) -> Result<NativeEvent> {
        self.queue.pop_front().ok_or(GfxError::Disconnected)
    }

    fn check_event(&mut self) -> Option<NativeEvent> {
        self.queue.pop_front()
    }

    fn put_back(&mut self, raw: NativeEvent) {
        self.queue.push_front(raw);
    }

    fn translate(&mut self, raw: &NativeEvent) -> NativeEvent {
        raw.clone()
    }

    fn alloc_color(&mut self, red: u16, green: u16, blue: u16) -> Option<Pixel> {
        self.palette_requests.push((red, green, blue));
        let cell = (red, green, blue);
        if let Some(i) = self.palette.iter().position(|c| *c == cell) {
            return Some(Pixel(i as u64));
        }
        if self.palette.len() < self.capacity {
            self.palette.push(cell);
            return Some(Pixel((self.palette.len() - 1) as u64));
        }
        self.nearest_cell(red, green, blue).map(|i| Pixel(i as u64))
    }

    fn set_foreground(&mut self, pixel: Pixel) {
        self.foreground = pixel;
    }

    fn set_background(&mut self, pixel: Pixel) {
        self.background = pixel;
    }

    fn set_line_attributes(&mut self, width: u32, style: LineStyle) {
        self.line = (width, style);
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn draw(&mut self, op: &DrawOp) {
        self.ops.push(op.clone());
    }

    fn close(&mut self) {
        self.closed = true;
        if let Some(window) = &mut self.window {
            window.mapped = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_queues_notify() {
        let mut display = HeadlessDisplay::new();
        display.create_window(10, 10, "t").unwrap();
        display.map_window();
        // No structure mask selected: nothing queued
        assert_eq!(display.pending(), 0);

        display.select_input(EventMask::SESSION);
        display.map_window();
        assert_eq!(display.peek(), Some(&NativeEvent::MapNotify));
    }

    #[test]
    fn test_put_back_goes_to_head() {
        let mut display = HeadlessDisplay::new().with_events([
            NativeEvent::Other(1),
            NativeEvent::Other(2),
        ]);
        let first = display.check_event().unwrap();
        display.put_back(first.clone());
        assert_eq!(display.next_event().unwrap(), first);
        assert_eq!(display.next_event().unwrap(), NativeEvent::Other(2));
        assert!(matches!(display.next_event(), Err(GfxError::Disconnected)));
    }

    #[test]
    fn test_render_log() {
        let mut display = HeadlessDisplay::new();
        display.draw(&DrawOp::Point { x: 1, y: 2 });
        display.draw(&DrawOp::Arc {
            x: 0, y: 0, width: 5, height: 5, start: 90 * 64, sweep: 180 * 64, fill: true,
        });
        assert_eq!(
            display.render_log(),
            "point (1, 2)\nfill-arc (0, 0) 5x5 from 90 sweep 180\n"
        );
    }
}
