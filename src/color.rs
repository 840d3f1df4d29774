//! Colors for polygon styles.
//!
//! KML writes colors as eight hex digits in `aabbggrr` order, the reverse channel order
//! of the usual `#rrggbb`. [`Rgb::to_kml`] takes care of the swap.
//!
//! Polygon colors are random. Anything implementing [`ColorSource`] can supply them, so
//! callers that need reproducible output can pass a fixed sequence instead of
//! [`RandomColors`].
#![allow(clippy::module_name_repetitions)]
use rand::Rng;

/// Outline alpha: fully opaque.
pub const LINE_ALPHA: u8 = 0xff;

/// Fill alpha: `0x4c`, about 30% opacity.
pub const FILL_ALPHA: u8 = 0x4c;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the color as a KML `aabbggrr` string.
    ///
    /// ```
    /// use fmaps2kml::color::Rgb;
    ///
    /// assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_kml(0xff), "ff563412");
    /// ```
    #[must_use]
    pub fn to_kml(self, alpha: u8) -> String {
        format!("{alpha:02x}{:02x}{:02x}{:02x}", self.b, self.g, self.r)
    }
}

pub trait ColorSource {
    fn next_color(&mut self) -> Rgb;
}

/// Draws every channel uniformly from `0..=255`.
#[derive(Debug, Clone, Default)]
pub struct RandomColors<R = rand::rngs::ThreadRng>(pub R);

impl RandomColors {
    /// Colors from the calling thread's generator.
    #[must_use]
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl<R: Rng> ColorSource for RandomColors<R> {
    fn next_color(&mut self) -> Rgb {
        Rgb::new(self.0.random(), self.0.random(), self.0.random())
    }
}

/// Replays a fixed list of colors, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct FixedColors {
    colors: Vec<Rgb>,
    next: usize,
}

impl FixedColors {
    /// # Panics
    ///
    /// Panics if `colors` is empty.
    #[must_use]
    pub fn new(colors: Vec<Rgb>) -> Self {
        assert!(!colors.is_empty(), "FixedColors needs at least one color");
        Self { colors, next: 0 }
    }
}

impl ColorSource for FixedColors {
    fn next_color(&mut self) -> Rgb {
        let color = self.colors[self.next % self.colors.len()];
        self.next += 1;
        color
    }
}
