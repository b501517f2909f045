//! Library error type

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GfxError {
    #[error("Failed to load the X11 client library: {0}")]
    LibraryLoad(String),

    #[error("Unable to open the graphics window: no connection to the display server")]
    DisplayOpen,

    #[error("A graphics session is already open in this process")]
    AlreadyOpen,

    #[error("Window title contains a NUL byte")]
    InvalidTitle(#[source] std::ffi::NulError),

    #[error("Display connection closed, no more events")]
    Disconnected,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Error = GfxError;

pub type Result<T> = std::result::Result<T, GfxError>;
