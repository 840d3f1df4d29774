use geo::{Coord, LineString, Point};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    error::{Error, Result},
    model::{Feature, FmapsDocument, Marker},
};

#[derive(Deserialize)]
struct RawFmaps {
    #[serde(rename = "Markers")]
    markers: Vec<RawMarker>,
    #[serde(rename = "DrawnItems", default)]
    drawn_items: Option<RawDrawnItems>,
}

#[derive(Deserialize)]
struct RawMarker {
    #[serde(rename = "Etichetta")]
    label: String,
    #[serde(rename = "Denominazione")]
    denomination: String,
    #[serde(rename = "Coordinate")]
    coordinate: RawCoordinate,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lng: f64,
    lat: f64,
}

#[derive(Deserialize)]
struct RawDrawnItems {
    #[serde(default)]
    features: Option<Vec<RawFeature>>,
}

#[derive(Deserialize)]
struct RawFeature {
    geometry: RawGeometry,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: Value,
    #[serde(default)]
    coordinates: Value,
}

/// A position inside a ring: `[lng, lat]`, optionally followed by more ordinates.
#[derive(Deserialize)]
struct RawPosition(Vec<f64>);

impl RawPosition {
    fn into_coord(self) -> std::result::Result<Coord, serde_json::Error> {
        match self.0.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(serde::de::Error::invalid_length(
                self.0.len(),
                &"a position with at least two ordinates",
            )),
        }
    }
}

/// Decodes the raw bytes of an fmaps file.
///
/// The bytes are first parsed as generic JSON, then projected onto the fmaps layout: a
/// required `Markers` sequence and an optional `DrawnItems.features` sequence. Features
/// whose `geometry.type` is anything other than the string `"Polygon"` are skipped.
///
/// # Examples
///
/// ```
/// use fmaps2kml::decode;
///
/// let input = br#"{
///     "Markers": [
///         {"Etichetta": "A", "Denominazione": "d", "Coordinate": {"lng": 1.5, "lat": 2.5}}
///     ]
/// }"#;
///
/// let document = decode(input).unwrap();
/// assert_eq!(document.markers[0].label, "A");
/// assert!(document.drawn_items.is_empty());
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not valid JSON ([`Error::Parse`])
/// - `Markers` or a required marker field is missing or mistyped ([`Error::Structure`])
/// - A `Polygon` feature has no outer ring ([`Error::MissingOuterRing`])
/// - A marker's text holds a character XML cannot represent ([`Error::InvalidText`])
pub fn decode(bytes: &[u8]) -> Result<FmapsDocument> {
    let value: Value = serde_json::from_slice(bytes).map_err(Error::Parse)?;
    let raw = RawFmaps::deserialize(value).map_err(Error::Structure)?;

    let markers = raw
        .markers
        .into_iter()
        .enumerate()
        .map(|(idx, marker)| {
            check_xml_text(idx, "Etichetta", &marker.label)?;
            check_xml_text(idx, "Denominazione", &marker.denomination)?;
            Ok(Marker {
                label: marker.label,
                denomination: marker.denomination,
                coordinate: Point::new(marker.coordinate.lng, marker.coordinate.lat),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let features = raw
        .drawn_items
        .and_then(|items| items.features)
        .unwrap_or_default();

    let mut drawn_items = Vec::new();
    for (idx, feature) in features.into_iter().enumerate() {
        if feature.geometry.kind.as_str() != Some("Polygon") {
            trace!(feature = idx, kind = %feature.geometry.kind, "skipping non-polygon feature");
            continue;
        }
        drawn_items.push(Feature::Polygon {
            outer_ring: outer_ring(feature.geometry.coordinates, idx)?,
        });
    }

    debug!(
        markers = markers.len(),
        polygons = drawn_items.len(),
        "decoded fmaps document"
    );

    Ok(FmapsDocument {
        markers,
        drawn_items,
    })
}

/// Text that XML 1.0 can carry, escaped or not: no C0 controls other than tab, line feed
/// and carriage return, and no `U+FFFE`/`U+FFFF`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..)
}

fn check_xml_text(marker: usize, field: &'static str, text: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(character) => Err(Error::InvalidText {
            marker,
            field,
            character,
        }),
        None => Ok(()),
    }
}

fn outer_ring(coordinates: Value, feature: usize) -> Result<LineString> {
    let rings: Vec<Vec<RawPosition>> = match coordinates {
        Value::Null => return Err(Error::MissingOuterRing { feature }),
        coordinates => Vec::deserialize(coordinates).map_err(Error::Structure)?,
    };

    let ring = rings
        .into_iter()
        .next()
        .ok_or(Error::MissingOuterRing { feature })?;

    ring.into_iter()
        .map(|position| position.into_coord().map_err(Error::Structure))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_markers_in_order() -> Result<()> {
        let input = r#"{
            "Markers": [
                {"Etichetta": "A", "Denominazione": "first", "Coordinate": {"lng": 1.5, "lat": 2.5}},
                {"Etichetta": "", "Denominazione": "second", "Coordinate": {"lng": -3, "lat": 4}}
            ]
        }"#;

        let document = decode(input.as_bytes())?;

        assert_eq!(document.markers.len(), 2);
        assert!(document.drawn_items.is_empty());

        let first = &document.markers[0];
        assert_eq!(first.label, "A");
        assert_eq!(first.denomination, "first");
        assert_relative_eq!(first.coordinate.x(), 1.5);
        assert_relative_eq!(first.coordinate.y(), 2.5);

        let second = &document.markers[1];
        assert_eq!(second.label, "");
        assert_relative_eq!(second.coordinate.x(), -3.0);
        assert_relative_eq!(second.coordinate.y(), 4.0);

        Ok(())
    }

    #[test]
    fn test_polygons_and_skipped_features() -> Result<()> {
        let input = r#"{
            "Markers": [],
            "DrawnItems": {
                "type": "FeatureCollection",
                "features": [
                    {"geometry": {"type": "Point", "coordinates": [9, 9]}},
                    {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1], [1, 1, 120.0]], [[5, 5]]]}},
                    {"geometry": {"type": "LineString"}}
                ]
            }
        }"#;

        let document = decode(input.as_bytes())?;
        let rings: Vec<_> = document.polygons().collect();

        assert_eq!(rings.len(), 1);
        let coords: Vec<_> = rings[0].coords().copied().collect();
        assert_eq!(
            coords,
            vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 0.0, y: 1.0 },
                Coord { x: 1.0, y: 1.0 },
            ]
        );
        // the ring is kept open, exactly as given
        assert!(!rings[0].is_closed());

        Ok(())
    }

    #[test]
    fn test_absent_drawn_items() -> Result<()> {
        for input in [
            r#"{"Markers": [], "DrawnItems": {}}"#,
            r#"{"Markers": [], "DrawnItems": null}"#,
            r#"{"Markers": [], "DrawnItems": {"features": null}}"#,
        ] {
            assert!(decode(input.as_bytes())?.drawn_items.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_not_json() {
        let err = decode(b"not json").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_missing_markers() {
        let err = decode(b"{}").unwrap_err();
        assert!(err.is_structure());
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_incomplete_marker() {
        for input in [
            r#"{"Markers": [{"Denominazione": "d", "Coordinate": {"lng": 1, "lat": 2}}]}"#,
            r#"{"Markers": [{"Etichetta": "A", "Coordinate": {"lng": 1, "lat": 2}}]}"#,
            r#"{"Markers": [{"Etichetta": "A", "Denominazione": "d", "Coordinate": {"lng": 1}}]}"#,
            r#"{"Markers": [{"Etichetta": "A", "Denominazione": "d", "Coordinate": {"lng": "x", "lat": 2}}]}"#,
        ] {
            let err = decode(input.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Structure(_)), "{input}");
        }
    }

    #[test]
    fn test_unusual_geometry_types_skipped() -> Result<()> {
        let input = r#"{"Markers": [], "DrawnItems": {"features": [
            {"geometry": {"type": null}},
            {"geometry": {"type": 3, "coordinates": []}},
            {"geometry": {"type": ["Polygon"]}},
            {"geometry": {"type": "polygon", "coordinates": [[[0, 0]]]}}
        ]}}"#;
        assert!(decode(input.as_bytes())?.drawn_items.is_empty());
        Ok(())
    }

    #[test]
    fn test_control_characters_rejected() {
        let input = r#"{"Markers": [
            {"Etichetta": "ok", "Denominazione": "ok", "Coordinate": {"lng": 0, "lat": 0}},
            {"Etichetta": "A", "Denominazione": "x\u0001y", "Coordinate": {"lng": 1, "lat": 2}}
        ]}"#;
        let err = decode(input.as_bytes()).unwrap_err();
        assert!(err.is_structure());
        assert!(matches!(
            err,
            Error::InvalidText {
                marker: 1,
                field: "Denominazione",
                character: '\u{1}',
            }
        ));
    }

    #[test]
    fn test_xml_whitespace_and_unicode_accepted() -> Result<()> {
        let input = "{\"Markers\": [{\"Etichetta\": \"a\\tb\\nc\\r\", \
            \"Denominazione\": \"Caff\u{e8} \u{1f5fa}\", \
            \"Coordinate\": {\"lng\": 0, \"lat\": 0}}]}";
        let document = decode(input.as_bytes())?;
        assert_eq!(document.markers[0].label, "a\tb\nc\r");
        assert_eq!(document.markers[0].denomination, "Caff\u{e8} \u{1f5fa}");
        Ok(())
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char(' '));
        assert!(is_xml_char('\u{e000}'));
        assert!(is_xml_char('\u{10ffff}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1f}'));
        assert!(!is_xml_char('\u{fffe}'));
        assert!(!is_xml_char('\u{ffff}'));
    }

    #[test]
    fn test_polygon_without_outer_ring() {
        for input in [
            r#"{"Markers": [], "DrawnItems": {"features": [{"geometry": {"type": "Polygon", "coordinates": []}}]}}"#,
            r#"{"Markers": [], "DrawnItems": {"features": [{"geometry": {"type": "Polygon"}}]}}"#,
        ] {
            let err = decode(input.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::MissingOuterRing { feature: 0 }), "{input}");
        }
    }

    #[test]
    fn test_short_position() {
        let input = r#"{"Markers": [], "DrawnItems": {"features": [
            {"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1]]]}}
        ]}}"#;
        let err = decode(input.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_decode_is_repeatable() -> Result<()> {
        let input = br#"{
            "Markers": [{"Etichetta": "A", "Denominazione": "d", "Coordinate": {"lng": 1.5, "lat": 2.5}}],
            "DrawnItems": {"features": [{"geometry": {"type": "Polygon", "coordinates": [[[0, 0], [0, 1]]]}}]}
        }"#;
        assert_eq!(decode(input)?, decode(input)?);
        Ok(())
    }
}
