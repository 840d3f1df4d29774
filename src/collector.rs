//! Rendering of `geo` geometries into the text of a KML `<coordinates>` element.
//!
//! [`CoordinatesCollector`] implements geozero's [`GeomProcessor`] and appends one
//! `lng,lat` token per visited position, separated by single spaces. Positions are
//! written in the order geozero visits them, so a [`geo::LineString`] keeps its input
//! order and is never closed or deduplicated.
//!
//! # Example
//!
//! ```rust
//! use geo::{line_string, Geometry};
//! use fmaps2kml::collector::CoordinatesCollector;
//!
//! let ring = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 1.0), (x: 1.5, y: 1.0)];
//! let text = CoordinatesCollector::render(&Geometry::LineString(ring)).unwrap();
//! assert_eq!(text, "0,0 0,1 1.5,1");
//! ```
#![allow(clippy::module_name_repetitions)]
use std::fmt::Write;

use geo::Geometry;
use geozero::{error::GeozeroError, GeomProcessor, GeozeroGeometry};

#[derive(Debug, Default)]
pub struct CoordinatesCollector {
    pub text: String,
}

impl CoordinatesCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `geometry` through a fresh collector and returns the collected text.
    ///
    /// # Errors
    ///
    /// Returns an error if geozero fails to walk the geometry.
    pub fn render(geometry: &Geometry) -> geozero::error::Result<String> {
        let mut collector = Self::new();
        geometry.process_geom(&mut collector)?;
        Ok(collector.text)
    }
}

impl GeomProcessor for CoordinatesCollector {
    fn xy(&mut self, x: f64, y: f64, _idx: usize) -> geozero::error::Result<()> {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        write!(self.text, "{x},{y}").map_err(|err| GeozeroError::Geometry(err.to_string()))
    }
}
