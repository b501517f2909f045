//! Xlib display connection
//!
//! Wraps the one X11 connection a process may hold. libX11 is loaded at
//! runtime through `x11-dl`, so the crate builds on machines without X11
//! development headers and fails at `connect` instead.

use std::ffi::CString;
use std::mem::MaybeUninit;
use std::os::raw::{c_char, c_int, c_long, c_short, c_ulong};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};
use x11_dl::xlib;

use super::display::{Display, DrawOp, EventMask, LineStyle, NativeEvent, Pixel, VisualClass};
use crate::error::{GfxError, Result};
use crate::input::{KeyPress, Modifiers};

/// Set while an `X11Display` holds a live connection
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Bytes requested from the input-method lookup
const LOOKUP_BUFFER: usize = 4;

/// Live Xlib connection with at most one window
pub struct X11Display {
    xlib: xlib::Xlib,
    display: *mut xlib::Display,
    screen: c_int,
    visual: VisualClass,
    window: xlib::Window,
    gc: xlib::GC,
    colormap: xlib::Colormap,
}

impl X11Display {
    /// Connect to the display named by `$DISPLAY`
    pub fn connect() -> Result<Self> {
        if CONNECTED.swap(true, Ordering::SeqCst) {
            return Err(GfxError::AlreadyOpen);
        }

        match Self::connect_internal() {
            Ok(display) => Ok(display),
            Err(e) => {
                CONNECTED.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn connect_internal() -> Result<Self> {
        let xlib = xlib::Xlib::open().map_err(|e| GfxError::LibraryLoad(e.to_string()))?;

        unsafe {
            let display = (xlib.XOpenDisplay)(ptr::null());
            if display.is_null() {
                return Err(GfxError::DisplayOpen);
            }

            let screen = (xlib.XDefaultScreen)(display);
            let visual = (xlib.XDefaultVisual)(display, screen);
            let visual = if visual.is_null() {
                VisualClass::StaticGray
            } else {
                visual_class_from_native((*visual).class)
            };
            info!("Connected to X display, visual class {:?}", visual);

            Ok(Self {
                xlib,
                display,
                screen,
                visual,
                window: 0,
                gc: ptr::null_mut(),
                colormap: 0,
            })
        }
    }

    fn is_open(&self) -> bool {
        !self.display.is_null()
    }

    fn has_window(&self) -> bool {
        self.is_open() && self.window != 0
    }

    fn has_gc(&self) -> bool {
        self.is_open() && !self.gc.is_null()
    }
}

fn visual_class_from_native(class: c_int) -> VisualClass {
    match class {
        xlib::TrueColor => VisualClass::TrueColor,
        xlib::DirectColor => VisualClass::DirectColor,
        xlib::PseudoColor => VisualClass::PseudoColor,
        xlib::StaticColor => VisualClass::StaticColor,
        xlib::GrayScale => VisualClass::GrayScale,
        _ => VisualClass::StaticGray,
    }
}

fn native_event_mask(mask: EventMask) -> c_long {
    let mut result: c_long = 0;
    if mask.contains(EventMask::KEY_PRESS) {
        result |= xlib::KeyPressMask;
    }
    if mask.contains(EventMask::BUTTON_PRESS) {
        result |= xlib::ButtonPressMask;
    }
    if mask.contains(EventMask::STRUCTURE_NOTIFY) {
        result |= xlib::StructureNotifyMask;
    }
    result
}

fn native_line_style(style: LineStyle) -> c_int {
    match style {
        LineStyle::Solid => xlib::LineSolid,
        LineStyle::Dashed => xlib::LineOnOffDash,
    }
}

/// Clamp a coordinate into the 16-bit range of an `XPoint`
fn to_point_coord(v: i32) -> c_short {
    v.clamp(c_short::MIN as i32, c_short::MAX as i32) as c_short
}

impl Display for X11Display {
    type Raw = xlib::XEvent;

    fn visual_class(&self) -> VisualClass {
        self.visual
    }

    fn create_window(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        let title = CString::new(title).map_err(GfxError::InvalidTitle)?;
        if !self.is_open() {
            return Err(GfxError::Disconnected);
        }

        unsafe {
            let black = (self.xlib.XBlackPixel)(self.display, self.screen);
            let root = (self.xlib.XDefaultRootWindow)(self.display);

            self.window = (self.xlib.XCreateSimpleWindow)(
                self.display, root, 0, 0, width, height, 0, black, black,
            );

            let mut attr: xlib::XSetWindowAttributes = std::mem::zeroed();
            attr.backing_store = xlib::Always;
            (self.xlib.XChangeWindowAttributes)(
                self.display,
                self.window,
                xlib::CWBackingStore,
                &mut attr,
            );

            (self.xlib.XStoreName)(self.display, self.window, title.as_ptr());
        }

        debug!("Created window 0x{:x} ({}x{})", self.window, width, height);
        Ok(())
    }

    fn select_input(&mut self, mask: EventMask) {
        if !self.has_window() {
            return;
        }
        unsafe {
            (self.xlib.XSelectInput)(self.display, self.window, native_event_mask(mask));
        }
    }

    fn map_window(&mut self) {
        if !self.has_window() {
            return;
        }
        unsafe {
            (self.xlib.XMapWindow)(self.display, self.window);
        }
    }

    fn create_gc(&mut self) {
        if !self.has_window() || self.has_gc() {
            return;
        }
        unsafe {
            self.gc = (self.xlib.XCreateGC)(self.display, self.window, 0, ptr::null_mut());
            self.colormap = (self.xlib.XDefaultColormap)(self.display, self.screen);
            let white = (self.xlib.XWhitePixel)(self.display, self.screen);
            (self.xlib.XSetForeground)(self.display, self.gc, white);
        }
    }

    fn next_event(&mut self) -> Result<xlib::XEvent> {
        if !self.is_open() {
            return Err(GfxError::Disconnected);
        }
        let mut event = MaybeUninit::<xlib::XEvent>::uninit();
        unsafe {
            (self.xlib.XNextEvent)(self.display, event.as_mut_ptr());
            Ok(event.assume_init())
        }
    }

    fn check_event(&mut self) -> Option<xlib::XEvent> {
        if !self.is_open() {
            return None;
        }
        let mut event = MaybeUninit::<xlib::XEvent>::uninit();
        unsafe {
            // Every mask bit, so any queued event counts
            if (self.xlib.XCheckMaskEvent)(self.display, -1, event.as_mut_ptr()) != 0 {
                Some(event.assume_init())
            } else {
                None
            }
        }
    }

    fn put_back(&mut self, mut raw: xlib::XEvent) {
        if !self.is_open() {
            return;
        }
        unsafe {
            (self.xlib.XPutBackEvent)(self.display, &mut raw);
        }
    }

    fn translate(&mut self, raw: &xlib::XEvent) -> NativeEvent {
        match raw.get_type() {
            xlib::KeyPress => {
                let mut key = unsafe { raw.key };
                let mut buf = [0 as c_char; LOOKUP_BUFFER];
                let mut keysym: xlib::KeySym = 0;
                let n = unsafe {
                    (self.xlib.XLookupString)(
                        &mut key,
                        buf.as_mut_ptr(),
                        LOOKUP_BUFFER as c_int,
                        &mut keysym,
                        ptr::null_mut(),
                    )
                };
                let len = (n.max(0) as usize).min(LOOKUP_BUFFER);
                NativeEvent::KeyPress(KeyPress {
                    x: key.x,
                    y: key.y,
                    text: buf[..len].iter().map(|&c| c as u8).collect(),
                    keysym: keysym as u32,
                    modifiers: Modifiers::from_x11_state(key.state),
                })
            }
            xlib::ButtonPress => {
                let button = unsafe { raw.button };
                NativeEvent::ButtonPress {
                    x: button.x,
                    y: button.y,
                    button: button.button,
                    modifiers: Modifiers::from_x11_state(button.state),
                }
            }
            xlib::ConfigureNotify => {
                let configure = unsafe { raw.configure };
                NativeEvent::Configure {
                    width: configure.width.max(0) as u32,
                    height: configure.height.max(0) as u32,
                }
            }
            xlib::MapNotify => NativeEvent::MapNotify,
            other => NativeEvent::Other(other),
        }
    }

    fn alloc_color(&mut self, red: u16, green: u16, blue: u16) -> Option<Pixel> {
        if !self.has_gc() {
            return None;
        }
        let mut color = xlib::XColor {
            pixel: 0,
            red,
            green,
            blue,
            flags: 0,
            pad: 0,
        };
        let status = unsafe { (self.xlib.XAllocColor)(self.display, self.colormap, &mut color) };
        if status == 0 {
            None
        } else {
            Some(Pixel(color.pixel as u64))
        }
    }

    fn set_foreground(&mut self, pixel: Pixel) {
        if !self.has_gc() {
            return;
        }
        unsafe {
            (self.xlib.XSetForeground)(self.display, self.gc, pixel.0 as c_ulong);
        }
    }

    fn set_background(&mut self, pixel: Pixel) {
        if !self.has_window() {
            return;
        }
        unsafe {
            (self.xlib.XSetWindowBackground)(self.display, self.window, pixel.0 as c_ulong);
        }
    }

    fn set_line_attributes(&mut self, width: u32, style: LineStyle) {
        if !self.has_gc() {
            return;
        }
        unsafe {
            (self.xlib.XSetLineAttributes)(
                self.display,
                self.gc,
                width,
                native_line_style(style),
                xlib::CapButt,
                xlib::JoinRound,
            );
        }
    }

    fn clear(&mut self) {
        if !self.has_window() {
            return;
        }
        unsafe {
            (self.xlib.XClearWindow)(self.display, self.window);
        }
    }

    fn flush(&mut self) {
        if !self.is_open() {
            return;
        }
        unsafe {
            (self.xlib.XFlush)(self.display);
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        if !self.has_window() || !self.has_gc() {
            return;
        }
        let (d, w, gc) = (self.display, self.window, self.gc);
        unsafe {
            match op {
                DrawOp::Point { x, y } => {
                    (self.xlib.XDrawPoint)(d, w, gc, *x, *y);
                }
                DrawOp::Line { x1, y1, x2, y2 } => {
                    (self.xlib.XDrawLine)(d, w, gc, *x1, *y1, *x2, *y2);
                }
                DrawOp::Rectangle { x, y, width, height, fill: false } => {
                    (self.xlib.XDrawRectangle)(d, w, gc, *x, *y, *width, *height);
                }
                DrawOp::Rectangle { x, y, width, height, fill: true } => {
                    (self.xlib.XFillRectangle)(d, w, gc, *x, *y, *width, *height);
                }
                DrawOp::Arc { x, y, width, height, start, sweep, fill: false } => {
                    (self.xlib.XDrawArc)(d, w, gc, *x, *y, *width, *height, *start, *sweep);
                }
                DrawOp::Arc { x, y, width, height, start, sweep, fill: true } => {
                    (self.xlib.XFillArc)(d, w, gc, *x, *y, *width, *height, *start, *sweep);
                }
                DrawOp::FillTriangle { points } => {
                    // XPoint is 16-bit: far-off vertices are clamped, not wrapped
                    let mut pts = points.map(|(x, y)| xlib::XPoint {
                        x: to_point_coord(x),
                        y: to_point_coord(y),
                    });
                    (self.xlib.XFillPolygon)(
                        d,
                        w,
                        gc,
                        pts.as_mut_ptr(),
                        pts.len() as c_int,
                        xlib::Convex,
                        xlib::CoordModeOrigin,
                    );
                }
                DrawOp::Text { x, y, bytes } => {
                    (self.xlib.XDrawImageString)(
                        d,
                        w,
                        gc,
                        *x,
                        *y,
                        bytes.as_ptr() as *const c_char,
                        bytes.len() as c_int,
                    );
                }
            }
        }
    }

    fn close(&mut self) {
        if !self.is_open() {
            return;
        }

        unsafe {
            if !self.gc.is_null() {
                (self.xlib.XFreeGC)(self.display, self.gc);
            }
            if self.window != 0 {
                (self.xlib.XDestroyWindow)(self.display, self.window);
            }
            (self.xlib.XCloseDisplay)(self.display);
        }

        self.gc = ptr::null_mut();
        self.window = 0;
        self.display = ptr::null_mut();
        CONNECTED.store(false, Ordering::SeqCst);
        info!("Closed X display");
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Display in the state `close` leaves behind, or `None` without libX11
    fn closed_display() -> Option<X11Display> {
        let xlib = xlib::Xlib::open().ok()?;
        Some(X11Display {
            xlib,
            display: ptr::null_mut(),
            screen: 0,
            visual: VisualClass::TrueColor,
            window: 0,
            gc: ptr::null_mut(),
            colormap: 0,
        })
    }

    #[test]
    fn test_closed_display_makes_no_native_calls() {
        let Some(mut display) = closed_display() else {
            return;
        };

        assert!(matches!(
            display.create_window(10, 10, "closed"),
            Err(GfxError::Disconnected)
        ));
        display.select_input(EventMask::SESSION);
        display.map_window();
        display.create_gc();
        assert!(matches!(display.next_event(), Err(GfxError::Disconnected)));
        assert!(display.check_event().is_none());
        assert_eq!(display.alloc_color(0xff00, 0, 0), None);
        display.set_foreground(Pixel(1));
        display.set_background(Pixel(2));
        display.set_line_attributes(2, LineStyle::Dashed);
        display.clear();
        display.flush();
        display.draw(&DrawOp::Point { x: 0, y: 0 });
        display.draw(&DrawOp::FillTriangle { points: [(0, 0), (1, 0), (0, 1)] });
        display.draw(&DrawOp::Text { x: 0, y: 0, bytes: b"x".to_vec() });
        display.close();
    }

    #[test]
    fn test_closed_display_session_fails_cleanly() {
        let Some(display) = closed_display() else {
            return;
        };
        let result = crate::Session::open_with(display, 10, 10, "closed");
        assert!(matches!(result, Err(GfxError::Disconnected)));
    }

    #[test]
    fn test_translate_button_modifiers() {
        let Some(mut display) = closed_display() else {
            return;
        };

        let mut button: xlib::XButtonEvent = unsafe { std::mem::zeroed() };
        button.type_ = xlib::ButtonPress;
        button.x = 11;
        button.y = 22;
        button.button = 3;
        button.state = xlib::ShiftMask | xlib::ControlMask;
        let raw = xlib::XEvent { button };

        assert_eq!(
            display.translate(&raw),
            NativeEvent::ButtonPress {
                x: 11,
                y: 22,
                button: 3,
                modifiers: Modifiers::SHIFT | Modifiers::CTRL,
            }
        );
    }

    #[test]
    fn test_single_connection_guard() {
        // Both halves touch the process-wide flag, so they share one test
        CONNECTED.store(true, Ordering::SeqCst);
        assert!(matches!(X11Display::connect(), Err(GfxError::AlreadyOpen)));
        assert!(CONNECTED.load(Ordering::SeqCst));

        CONNECTED.store(false, Ordering::SeqCst);
        std::env::remove_var("DISPLAY");
        assert!(X11Display::connect().is_err());
        assert!(!CONNECTED.load(Ordering::SeqCst));
    }

    #[test]
    fn test_point_coord_clamps() {
        assert_eq!(to_point_coord(100), 100);
        assert_eq!(to_point_coord(-5), -5);
        assert_eq!(to_point_coord(40_000), c_short::MAX);
        assert_eq!(to_point_coord(-40_000), c_short::MIN);
    }

    #[test]
    fn test_event_mask_conversion() {
        assert_eq!(native_event_mask(EventMask::empty()), 0);
        assert_eq!(
            native_event_mask(EventMask::SESSION),
            xlib::StructureNotifyMask | xlib::KeyPressMask | xlib::ButtonPressMask
        );
    }

    #[test]
    fn test_visual_class_conversion() {
        assert_eq!(visual_class_from_native(xlib::TrueColor), VisualClass::TrueColor);
        assert_eq!(visual_class_from_native(xlib::PseudoColor), VisualClass::PseudoColor);
        assert_eq!(visual_class_from_native(99), VisualClass::StaticGray);
    }

    #[test]
    fn test_line_style_conversion() {
        assert_eq!(native_line_style(LineStyle::Solid), xlib::LineSolid);
        assert_eq!(native_line_style(LineStyle::Dashed), xlib::LineOnOffDash);
    }
}
