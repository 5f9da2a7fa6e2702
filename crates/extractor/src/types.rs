use bytes::Bytes;
use descriptor::Descriptor;

/// Number of landmark points reported per detected face.
pub const LANDMARK_POINTS: usize = 68;

/// An image handed to the extractor, with a label for log and error
/// messages.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Where the image came from, typically a URL or file path.
    pub source: String,
    /// Raw encoded image bytes.
    pub data: Bytes,
}

impl ImageInput {
    pub fn new(source: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
        }
    }
}

/// Axis-aligned bounding box of a detected face, in coordinates relative to
/// the image (0.0 to 1.0 on each axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Detector confidence that the box contains a face.
    pub confidence: f32,
}

/// One facial landmark point, in the same relative coordinates as
/// [`FaceBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// Everything the extractor produces for one face.
#[derive(Debug, Clone)]
pub struct FaceObservation {
    pub descriptor: Descriptor,
    pub landmarks: Vec<Landmark>,
    pub face_box: FaceBox,
}
