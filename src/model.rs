//! In-memory form of a decoded fmaps file.
//!
//! Geometry is held as [`geo`] types: markers as a [`Point`] and polygon outer rings as a
//! [`LineString`]. The ring is deliberately not a [`geo::Polygon`], which would close it.

use geo::{LineString, Point};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FmapsDocument {
    pub markers: Vec<Marker>,
    /// Only features that decoded to a recognized geometry type.
    pub drawn_items: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub denomination: String,
    /// `x` is longitude, `y` is latitude.
    pub coordinate: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Polygon { outer_ring: LineString },
}

impl FmapsDocument {
    pub fn polygons(&self) -> impl Iterator<Item = &LineString> {
        self.drawn_items.iter().map(|feature| match feature {
            Feature::Polygon { outer_ring } => outer_ring,
        })
    }
}
