//! Session management
//!
//! A session owns the display connection and its single window, plus the
//! little state the library keeps between calls: color mode, window size,
//! last pointer position and line style.

use tracing::{debug, error, info, trace};

use super::display::{Display, EventMask, NativeEvent};
use crate::color::{ColorMode, ColorModePreference};
use crate::config::Config;
use crate::draw::DrawStyle;
use crate::error::Result;
use crate::input::translator::{classify, is_input, Action, Position};

#[cfg(unix)]
use super::x11::X11Display;

/// Last known window size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

/// An open window and its drawing state
pub struct Session<D: Display> {
    pub(crate) display: D,
    color_mode: ColorMode,
    geometry: Geometry,
    last_input: Position,
    pub(crate) style: DrawStyle,
    closed: bool,
}

#[cfg(unix)]
impl Session<X11Display> {
    /// Open a window on the X display
    pub fn open(width: u32, height: u32, title: &str) -> Result<Self> {
        Self::open_with(X11Display::connect()?, width, height, title)
    }

    /// Open a window, or report and exit the process with status 1
    pub fn open_or_exit(width: u32, height: u32, title: &str) -> Self {
        match Self::open(width, height, title) {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to open window: {}", e);
                eprintln!("minigfx: unable to open the graphics window: {}", e);
                std::process::exit(1);
            }
        }
    }
}

impl<D: Display> Session<D> {
    /// Open a window on an existing display connection.
    ///
    /// Blocks until the window is mapped. Events that arrive before the map
    /// notification are discarded.
    pub fn open_with(display: D, width: u32, height: u32, title: &str) -> Result<Self> {
        Self::open_with_preference(display, width, height, title, ColorModePreference::Auto)
    }

    /// Like [`Session::open_with`], with an explicit color mode choice
    pub fn open_with_preference(
        mut display: D,
        width: u32,
        height: u32,
        title: &str,
        preference: ColorModePreference,
    ) -> Result<Self> {
        let visual = display.visual_class();
        let color_mode = preference.pick(visual);

        display.create_window(width, height, title)?;
        display.select_input(EventMask::SESSION);
        display.map_window();
        display.create_gc();

        loop {
            let raw = display.next_event()?;
            match display.translate(&raw) {
                NativeEvent::MapNotify => break,
                event => trace!("discarding {:?} before map", event),
            }
        }

        info!(
            "Opened {}x{} window {:?} (visual {:?}, {:?} colors)",
            width, height, title, visual, color_mode
        );

        Ok(Self {
            display,
            color_mode,
            geometry: Geometry { width, height },
            last_input: Position::default(),
            style: DrawStyle::default(),
            closed: false,
        })
    }

    /// Open a window from configuration and apply its colors and line style
    pub fn open_configured(display: D, config: &Config) -> Result<Self> {
        let window = &config.window;
        let mut session = Self::open_with_preference(
            display,
            window.width,
            window.height,
            &window.title,
            config.colors.mode,
        )?;

        let bg = config.colors.background;
        session.set_background(bg.r, bg.g, bg.b);
        let fg = config.colors.foreground;
        session.set_color(fg.r, fg.g, fg.b);
        session.set_line_style(config.line.width, config.line.style);

        Ok(session)
    }

    /// Block until a key or mouse button is pressed and return its code.
    ///
    /// Printable keys return their byte value, navigation keys 129 to 137,
    /// and buttons their button number. Resize notifications update the
    /// stored size without returning.
    pub fn wait(&mut self) -> Result<u32> {
        self.display.flush();

        loop {
            let raw = self.display.next_event()?;
            let event = self.display.translate(&raw);
            let translation = classify(&event);

            if let Some(position) = translation.pointer {
                self.last_input = position;
            }

            match translation.action {
                Action::Return(code) => return Ok(code),
                Action::UpdateGeometry(width, height) => {
                    debug!("Window resized to {}x{}", width, height);
                    self.geometry = Geometry { width, height };
                }
                Action::Ignore => {}
            }
        }
    }

    /// Check, without blocking, whether a key or button press is queued.
    ///
    /// A queued press is put back for the next `wait`. Any other event at
    /// the head of the queue is consumed and dropped, resize included.
    pub fn event_waiting(&mut self) -> bool {
        self.display.flush();

        let Some(raw) = self.display.check_event() else {
            return false;
        };

        let event = self.display.translate(&raw);
        if is_input(&event) {
            self.display.put_back(raw);
            true
        } else {
            trace!("poll dropped {:?}", event);
            false
        }
    }

    /// X position of the last key or button press
    pub fn xpos(&self) -> i32 {
        self.last_input.x
    }

    /// Y position of the last key or button press
    pub fn ypos(&self) -> i32 {
        self.last_input.y
    }

    pub fn last_input(&self) -> Position {
        self.last_input
    }

    /// Window width as of the last resize
    pub fn xsize(&self) -> u32 {
        self.geometry.width
    }

    /// Window height as of the last resize
    pub fn ysize(&self) -> u32 {
        self.geometry.height
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Send pending drawing to the display
    pub fn flush(&mut self) {
        self.display.flush();
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Destroy the window and close the connection
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.closed = true;
            self.display.close();
        }
    }
}

impl<D: Display> Drop for Session<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
