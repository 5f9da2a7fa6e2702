use std::fmt;

/// Errors raised by extraction backends.
///
/// `Display` and `std::error::Error` are implemented by hand because the
/// `source` field holds the image's source label (a path or identifier),
/// not a chained error; `thiserror` would otherwise treat a field named
/// `source` as the error source and require it to implement `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractorError {
    /// The image contains no detectable face.
    NoFaceDetected { source: String },

    /// The image contains more than one face; single-face extraction is
    /// ambiguous.
    MultipleFacesDetected { source: String, count: usize },

    /// The backend itself failed.
    Backend(String),
}

impl fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFaceDetected { source } => {
                write!(f, "no face detected in image {source}")
            }
            Self::MultipleFacesDetected { source, count } => {
                write!(f, "{count} faces detected in image {source}, expected exactly one")
            }
            Self::Backend(msg) => write!(f, "extractor backend error: {msg}"),
        }
    }
}

impl std::error::Error for ExtractorError {}
