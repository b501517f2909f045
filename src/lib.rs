//! minigfx - a tiny single-window drawing library for X11
//!
//! One window, one current color, a handful of shape primitives and a
//! key/mouse query interface. Meant for teaching and quick visual
//! experiments, not for building applications.
//!
//! # Example
//!
//! ```no_run
//! use minigfx::{LineStyle, Session};
//!
//! let mut gfx = Session::open(400, 300, "demo")?;
//! gfx.set_color(255, 200, 0);
//! gfx.set_line_style(2, LineStyle::Dashed);
//! gfx.fill_segment(150, 100, 100, 0, 360);
//! gfx.text(10, 20, b"press q to quit");
//!
//! while gfx.wait()? != u32::from(b'q') {
//!     gfx.point(gfx.xpos(), gfx.ypos());
//! }
//! # Ok::<(), minigfx::Error>(())
//! ```
//!
//! # Return codes of `wait`
//!
//! | Input | Code |
//! |-------|------|
//! | Key producing one character | its byte value |
//! | Home, Left, Up, Right, Down, PageUp, PageDown, End, Begin | 129 to 137 |
//! | Mouse button | button number (1 = left) |

pub mod color;
pub mod config;
pub mod core;
pub mod draw;
pub mod error;
pub mod input;

pub use crate::color::{ColorMode, ColorModePreference, Rgb};
pub use crate::config::Config;
pub use crate::core::display::{Display, DrawOp, EventMask, LineStyle, NativeEvent, Pixel, VisualClass};
pub use crate::core::headless::HeadlessDisplay;
pub use crate::core::session::{Geometry, Session};
#[cfg(unix)]
pub use crate::core::x11::X11Display;
pub use crate::draw::DrawStyle;
pub use crate::error::{Error, GfxError, Result};
pub use crate::input::{KeyPress, Modifiers, NavKey, Position};
