use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Input is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Input does not follow the fmaps layout: {0}")]
    Structure(#[source] serde_json::Error),

    #[error("Polygon feature #{feature} has no outer ring.")]
    MissingOuterRing { feature: usize },

    #[error("Marker #{marker} has a character XML cannot hold in `{field}`: {character:?}")]
    InvalidText {
        marker: usize,
        field: &'static str,
        character: char,
    },

    #[error("Cannot render coordinates: {0}")]
    Geometry(String),

    #[error("Error while writing KML.")]
    Xml(#[from] quick_xml::Error),

    #[error("Cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// True when the input bytes were not JSON at all.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// True when the input was JSON but a required fmaps field was missing or mistyped.
    #[must_use]
    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            Error::Structure(_) | Error::MissingOuterRing { .. } | Error::InvalidText { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
