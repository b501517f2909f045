//! Native display boundary
//!
//! Everything the library needs from the windowing system goes through the
//! [`Display`] trait. The X11 connection and the headless test display both
//! implement it.

use bitflags::bitflags;

use crate::error::Result;
use crate::input::{KeyPress, Modifiers};

bitflags! {
    /// Input selected on the window
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EventMask: u32 {
        const KEY_PRESS        = 0b0001;
        const BUTTON_PRESS     = 0b0010;
        const STRUCTURE_NOTIFY = 0b0100;
    }
}

impl EventMask {
    /// Mask every session selects at open
    pub const SESSION: EventMask = EventMask::STRUCTURE_NOTIFY
        .union(EventMask::KEY_PRESS)
        .union(EventMask::BUTTON_PRESS);
}

/// Pixel-format class of the default visual
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualClass {
    StaticGray,
    GrayScale,
    StaticColor,
    PseudoColor,
    TrueColor,
    DirectColor,
}

impl VisualClass {
    /// Whether every RGB triple has its own pixel value
    pub fn is_true_color(self) -> bool {
        self == VisualClass::TrueColor
    }
}

/// Opaque native pixel value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel(pub u64);

/// Line style of the graphics context
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// A native event after translation into library terms
#[derive(Clone, Debug, PartialEq)]
pub enum NativeEvent {
    KeyPress(KeyPress),
    ButtonPress { x: i32, y: i32, button: u32, modifiers: Modifiers },
    Configure { width: u32, height: u32 },
    MapNotify,
    /// Any other event type, by native type code
    Other(i32),
}

impl NativeEvent {
    /// Button press with no modifiers held
    pub fn button(x: i32, y: i32, button: u32) -> Self {
        NativeEvent::ButtonPress { x, y, button, modifiers: Modifiers::empty() }
    }
}

/// A single drawing request against the window
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawOp {
    Point { x: i32, y: i32 },
    Line { x1: i32, y1: i32, x2: i32, y2: i32 },
    Rectangle { x: i32, y: i32, width: u32, height: u32, fill: bool },
    /// Angles in 1/64 degree, as the native layer takes them
    Arc { x: i32, y: i32, width: u32, height: u32, start: i32, sweep: i32, fill: bool },
    FillTriangle { points: [(i32, i32); 3] },
    Text { x: i32, y: i32, bytes: Vec<u8> },
}

/// Connection to a windowing system with exactly one window
pub trait Display {
    /// Raw event as the native queue stores it
    type Raw;

    fn visual_class(&self) -> VisualClass;

    /// Create the window with black border and background, backing store
    /// always on, and the given title
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<()>;

    fn select_input(&mut self, mask: EventMask);

    fn map_window(&mut self);

    /// Create the graphics context with a white foreground and bind the
    /// default colormap
    fn create_gc(&mut self);

    /// Block until the next event. Fails only when no event can ever arrive.
    fn next_event(&mut self) -> Result<Self::Raw>;

    /// Remove and return the head of the queue without blocking
    fn check_event(&mut self) -> Option<Self::Raw>;

    /// Push an event back onto the head of the queue
    fn put_back(&mut self, raw: Self::Raw);

    /// Decode a raw event, including key-to-text lookup
    fn translate(&mut self, raw: &Self::Raw) -> NativeEvent;

    /// Allocate the nearest palette color for 16-bit channels. Returns the
    /// pixel the system picked, or `None` when the palette gave nothing.
    fn alloc_color(&mut self, red: u16, green: u16, blue: u16) -> Option<Pixel>;

    fn set_foreground(&mut self, pixel: Pixel);

    fn set_background(&mut self, pixel: Pixel);

    fn set_line_attributes(&mut self, width: u32, style: LineStyle);

    fn clear(&mut self);

    fn flush(&mut self);

    fn draw(&mut self, op: &DrawOp);

    /// Release the window and the connection
    fn close(&mut self);
}
