//! Color resolution
//!
//! Turns an RGB triple into a native pixel. On true-color visuals the pixel is
//! computed directly; otherwise it is allocated from the shared colormap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::display::{Display, Pixel, VisualClass};

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How pixels are obtained, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Pack channels into `0xRRGGBB`
    Fast,
    /// Ask the colormap for the nearest color
    Palette,
}

impl ColorMode {
    pub fn for_visual(class: VisualClass) -> Self {
        if class.is_true_color() {
            ColorMode::Fast
        } else {
            ColorMode::Palette
        }
    }
}

/// User override for the color mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModePreference {
    #[default]
    Auto,
    Fast,
    Palette,
}

impl ColorModePreference {
    pub fn pick(self, class: VisualClass) -> ColorMode {
        match self {
            ColorModePreference::Auto => ColorMode::for_visual(class),
            ColorModePreference::Fast => ColorMode::Fast,
            ColorModePreference::Palette => ColorMode::Palette,
        }
    }
}

/// Pack a triple the way a 24-bit true-color visual lays it out
pub fn pack_rgb(r: u8, g: u8, b: u8) -> Pixel {
    Pixel(u64::from(r) << 16 | u64::from(g) << 8 | u64::from(b))
}

/// Widen an 8-bit channel to the 16-bit range the colormap uses
pub fn widen_channel(c: u8) -> u16 {
    u16::from(c) << 8
}

/// Resolve a triple to a pixel in the given mode.
///
/// Palette misses are not errors: the native layer substitutes the nearest
/// color, and a failed allocation leaves pixel 0.
pub fn resolve<D: Display>(mode: ColorMode, display: &mut D, r: u8, g: u8, b: u8) -> Pixel {
    match mode {
        ColorMode::Fast => pack_rgb(r, g, b),
        ColorMode::Palette => {
            let pixel = display.alloc_color(widen_channel(r), widen_channel(g), widen_channel(b));
            debug!("palette color ({}, {}, {}) -> {:?}", r, g, b, pixel);
            pixel.unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::headless::HeadlessDisplay;
    use std::collections::HashSet;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgb(0, 0, 0), Pixel(0));
        assert_eq!(pack_rgb(0xff, 0, 0), Pixel(0xff0000));
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), Pixel(0x123456));
        assert_eq!(pack_rgb(255, 255, 255), Pixel(0xffffff));
    }

    #[test]
    fn test_fast_mode_is_injective() {
        // Every red/green pair against a spread of blues
        let mut seen = HashSet::new();
        let mut display = HeadlessDisplay::new();
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in [0u8, 1, 127, 254, 255] {
                    let pixel = resolve(ColorMode::Fast, &mut display, r, g, b);
                    assert!(pixel.0 <= 0xffffff);
                    assert!(seen.insert(pixel));
                }
            }
        }
        // No native calls on the fast path
        assert_eq!(display.palette_requests().len(), 0);
    }

    #[test]
    fn test_palette_mode_widens_channels() {
        let mut display = HeadlessDisplay::with_visual(VisualClass::PseudoColor);
        let first = resolve(ColorMode::Palette, &mut display, 255, 128, 1);
        assert_eq!(display.palette_requests(), &[(0xff00, 0x8000, 0x0100)]);

        // Same color comes back as the same cell
        let again = resolve(ColorMode::Palette, &mut display, 255, 128, 1);
        assert_eq!(first, again);
    }

    #[test]
    fn test_palette_exhaustion_is_silent() {
        let mut display = HeadlessDisplay::with_visual(VisualClass::PseudoColor).palette_capacity(2);
        let red = resolve(ColorMode::Palette, &mut display, 255, 0, 0);
        let blue = resolve(ColorMode::Palette, &mut display, 0, 0, 255);
        // Full palette: the nearest allocated color stands in
        let dark_red = resolve(ColorMode::Palette, &mut display, 200, 0, 0);
        assert_ne!(red, blue);
        assert_eq!(dark_red, red);
    }

    #[test]
    fn test_failed_allocation_is_pixel_zero() {
        let mut display = HeadlessDisplay::with_visual(VisualClass::StaticGray).palette_capacity(0);
        assert_eq!(resolve(ColorMode::Palette, &mut display, 10, 20, 30), Pixel(0));
    }

    #[test]
    fn test_mode_for_visual() {
        assert_eq!(ColorMode::for_visual(VisualClass::TrueColor), ColorMode::Fast);
        assert_eq!(ColorMode::for_visual(VisualClass::PseudoColor), ColorMode::Palette);
        assert_eq!(ColorMode::for_visual(VisualClass::DirectColor), ColorMode::Palette);
        assert_eq!(
            ColorModePreference::Palette.pick(VisualClass::TrueColor),
            ColorMode::Palette
        );
        assert_eq!(ColorModePreference::Auto.pick(VisualClass::TrueColor), ColorMode::Fast);
    }
}
