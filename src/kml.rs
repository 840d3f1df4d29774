//! The KML document produced from an [`FmapsDocument`].
//!
//! The tree only models what a conversion emits: one `Document` holding point placemarks
//! for the markers, followed by styled polygon placemarks for the drawn polygons.
//! Coordinate text is rendered while building, so [`crate::ser::serialize`] only has to
//! write elements.
#![allow(clippy::module_name_repetitions)]
use geo::Geometry;

use crate::{
    collector::CoordinatesCollector,
    color::{ColorSource, RandomColors, FILL_ALPHA, LINE_ALPHA},
    error::{Error, Result},
    model::FmapsDocument,
};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// Outline width of every polygon.
pub const LINE_WIDTH: &str = "2";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KmlDocument {
    pub placemarks: Vec<Placemark>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placemark {
    Point(PointPlacemark),
    Polygon(PolygonPlacemark),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointPlacemark {
    pub name: String,
    pub description: String,
    /// `lng,lat`
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonPlacemark {
    pub style: PolygonStyle,
    /// Outer ring as space separated `lng,lat` tokens.
    pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonStyle {
    /// `LineStyle` color, `ff` alpha.
    pub line_color: String,
    pub line_width: String,
    /// `PolyStyle` color, `4c` alpha.
    pub fill_color: String,
}

impl PolygonStyle {
    pub fn random<C: ColorSource>(colors: &mut C) -> Self {
        let line = colors.next_color();
        let fill = colors.next_color();
        Self {
            line_color: line.to_kml(LINE_ALPHA),
            line_width: LINE_WIDTH.to_string(),
            fill_color: fill.to_kml(FILL_ALPHA),
        }
    }
}

impl KmlDocument {
    pub fn points(&self) -> impl Iterator<Item = &PointPlacemark> {
        self.placemarks.iter().filter_map(|placemark| match placemark {
            Placemark::Point(point) => Some(point),
            Placemark::Polygon(_) => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = &PolygonPlacemark> {
        self.placemarks.iter().filter_map(|placemark| match placemark {
            Placemark::Polygon(polygon) => Some(polygon),
            Placemark::Point(_) => None,
        })
    }
}

/// Builds the KML tree for `document`, drawing polygon colors from the thread's
/// random generator.
///
/// # Errors
///
/// Returns an error if a geometry cannot be rendered to coordinate text.
pub fn build(document: &FmapsDocument) -> Result<KmlDocument> {
    build_with(document, &mut RandomColors::new())
}

/// Builds the KML tree for `document` with polygon colors taken from `colors`.
///
/// Every marker becomes a point placemark, in input order, and every polygon then
/// becomes a polygon placemark, in input order. Each polygon draws its line color first
/// and its fill color second.
///
/// # Examples
///
/// ```
/// use fmaps2kml::{build_with, decode};
/// use fmaps2kml::color::{FixedColors, Rgb};
///
/// let input = br#"{
///     "Markers": [],
///     "DrawnItems": {"features": [
///         {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1], [0, 0]]]}}
///     ]}
/// }"#;
///
/// let mut colors = FixedColors::new(vec![Rgb::new(0xff, 0, 0), Rgb::new(0, 0, 0xff)]);
/// let kml = build_with(&decode(input).unwrap(), &mut colors).unwrap();
///
/// let polygon = kml.polygons().next().unwrap();
/// assert_eq!(polygon.style.line_color, "ff0000ff");
/// assert_eq!(polygon.style.fill_color, "4cff0000");
/// assert_eq!(polygon.coordinates, "0,0 0,1 1,1 0,0");
/// ```
///
/// # Errors
///
/// Returns an error if a geometry cannot be rendered to coordinate text.
pub fn build_with<C: ColorSource>(
    document: &FmapsDocument,
    colors: &mut C,
) -> Result<KmlDocument> {
    let mut placemarks = Vec::with_capacity(document.markers.len() + document.drawn_items.len());

    for marker in &document.markers {
        placemarks.push(Placemark::Point(PointPlacemark {
            name: marker.label.clone(),
            description: marker.denomination.clone(),
            coordinates: render(&Geometry::Point(marker.coordinate))?,
        }));
    }

    for ring in document.polygons() {
        placemarks.push(Placemark::Polygon(PolygonPlacemark {
            style: PolygonStyle::random(colors),
            coordinates: render(&Geometry::LineString(ring.clone()))?,
        }));
    }

    Ok(KmlDocument { placemarks })
}

fn render(geometry: &Geometry) -> Result<String> {
    CoordinatesCollector::render(geometry).map_err(|err| Error::Geometry(err.to_string()))
}
