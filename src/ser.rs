use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use crate::{
    error::Result,
    kml::{KmlDocument, Placemark, PointPlacemark, PolygonPlacemark, KML_NAMESPACE},
};

/// Writes `document` as UTF-8 KML.
///
/// The output starts with an XML declaration, has a `kml` root carrying the KML 2.2
/// namespace and a single `Document` child. It is not indented.
///
/// # Errors
///
/// Returns an error if quick-xml fails to write an event.
pub fn serialize(document: &KmlDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("Document")))?;

    for placemark in &document.placemarks {
        writer.write_event(Event::Start(BytesStart::new("Placemark")))?;
        match placemark {
            Placemark::Point(point) => write_point(&mut writer, point)?,
            Placemark::Polygon(polygon) => write_polygon(&mut writer, polygon)?,
        }
        writer.write_event(Event::End(BytesEnd::new("Placemark")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("Document")))?;
    writer.write_event(Event::End(BytesEnd::new("kml")))?;

    Ok(writer.into_inner())
}

fn write_point(writer: &mut Writer<Vec<u8>>, point: &PointPlacemark) -> Result<()> {
    text_element(writer, "name", &point.name)?;
    text_element(writer, "description", &point.description)?;
    open(writer, "Point")?;
    text_element(writer, "coordinates", &point.coordinates)?;
    close(writer, "Point")
}

fn write_polygon(writer: &mut Writer<Vec<u8>>, polygon: &PolygonPlacemark) -> Result<()> {
    open(writer, "Style")?;
    open(writer, "LineStyle")?;
    text_element(writer, "color", &polygon.style.line_color)?;
    text_element(writer, "width", &polygon.style.line_width)?;
    close(writer, "LineStyle")?;
    open(writer, "PolyStyle")?;
    text_element(writer, "color", &polygon.style.fill_color)?;
    close(writer, "PolyStyle")?;
    close(writer, "Style")?;

    open(writer, "Polygon")?;
    open(writer, "outerBoundaryIs")?;
    open(writer, "LinearRing")?;
    text_element(writer, "coordinates", &polygon.coordinates)?;
    close(writer, "LinearRing")?;
    close(writer, "outerBoundaryIs")?;
    close(writer, "Polygon")
}

fn open(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    Ok(writer.write_event(Event::Start(BytesStart::new(name)))?)
}

fn close(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    Ok(writer.write_event(Event::End(BytesEnd::new(name)))?)
}

/// `<name>text</name>`, with `text` escaped. Empty text still gets both tags.
fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    open(writer, name)?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    close(writer, name)
}
