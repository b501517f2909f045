//! Core window and display components.
//!
//! - **display**: the `Display` trait every backend implements, plus the
//!   event, pixel and drawing-request types that cross it
//! - **x11**: Xlib backend (Unix only)
//! - **headless**: in-memory backend with a scripted event queue
//! - **session**: the open window, its event loop and saved state
//!
//! # Architecture
//!
//! ```text
//! Session<D: Display>
//! ├── D (X11Display | HeadlessDisplay)
//! │   ├── window + graphics context + colormap
//! │   └── event queue
//! ├── ColorMode (fixed at open)
//! ├── Geometry (updated by resize events)
//! ├── Position (last key/button press)
//! └── DrawStyle
//! ```

pub mod display;
pub mod headless;
pub mod session;
#[cfg(unix)]
pub mod x11;
