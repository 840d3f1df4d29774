//! # fmaps2kml
//!
//! Converts fmaps map-annotation files into KML.
//!
//! An fmaps file is JSON holding a list of point markers and, optionally, the polygons
//! drawn over the map. The conversion runs in two pure steps:
//!
//! 1. [`decode`] parses the bytes into an [`FmapsDocument`]
//! 2. [`build`] turns that into a [`KmlDocument`] which [`serialize`] writes as XML
//!
//! [`convert`] chains both on in-memory buffers and [`convert_file`] adds the file
//! reading and writing around them.
//!
//! ## Example
//!
//! ```rust
//! let input = br#"{
//!     "Markers": [
//!         {"Etichetta": "A", "Denominazione": "d", "Coordinate": {"lng": 1.5, "lat": 2.5}}
//!     ]
//! }"#;
//!
//! let kml = String::from_utf8(fmaps2kml::convert(input).unwrap()).unwrap();
//!
//! assert!(kml.contains("<name>A</name>"));
//! assert!(kml.contains("<description>d</description>"));
//! assert!(kml.contains("<coordinates>1.5,2.5</coordinates>"));
//! ```
//!
//! ## Modules
//!
//! - [`de`] - Decoding of the fmaps JSON layout
//! - [`model`] - The decoded document
//! - [`kml`] - The KML tree and how it is built
//! - [`ser`] - XML serialization of the KML tree
//! - [`collector`] - Coordinate text rendering through geozero
//! - [`color`] - Random polygon colors
//! - [`error`] - Error types and handling

pub mod collector;
pub mod color;
pub mod de;
pub mod error;
pub mod kml;
pub mod model;
pub mod ser;

use std::path::Path;

use tracing::info;

pub use color::ColorSource;
pub use de::decode;
pub use error::{Error, Result};
pub use kml::{build, build_with, KmlDocument};
pub use model::FmapsDocument;
pub use ser::serialize;

/// Converts fmaps bytes into KML bytes.
///
/// # Errors
///
/// Returns an error if the input cannot be decoded, see [`decode`].
pub fn convert(input: &[u8]) -> Result<Vec<u8>> {
    convert_with(input, &mut color::RandomColors::new())
}

/// Same as [`convert`] with polygon colors taken from `colors`.
///
/// # Errors
///
/// Returns an error if the input cannot be decoded, see [`decode`].
pub fn convert_with<C: ColorSource>(input: &[u8], colors: &mut C) -> Result<Vec<u8>> {
    let document = decode(input)?;
    serialize(&build_with(&document, colors)?)
}

/// Reads the fmaps file at `input` and writes its KML conversion to `output`.
///
/// The whole conversion happens in memory before `output` is opened, so a failed
/// conversion leaves `output` untouched.
///
/// # Errors
///
/// Returns an error if:
/// - `input` cannot be read or `output` cannot be written ([`Error::Io`])
/// - The input cannot be decoded, see [`decode`]
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let bytes = std::fs::read(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let kml = convert(&bytes)?;
    std::fs::write(output, &kml).map_err(|source| Error::Io {
        path: output.to_path_buf(),
        source,
    })?;

    info!(input = %input.display(), output = %output.display(), bytes = kml.len(), "wrote KML");
    Ok(())
}
