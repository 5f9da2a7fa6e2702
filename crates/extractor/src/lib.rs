//! Extraction seam between raw images and the descriptor pipeline.
//!
//! Enrollment and search both start from an image: a mugshot photograph or a
//! scanned composite sketch. [`FeatureExtractor`] is the boundary behind
//! which a detection and embedding backend lives. The pipeline only ever
//! talks to the trait, so backends can be swapped without touching matching
//! code.
//!
//! The crate ships one implementation, [`SyntheticExtractor`], which derives
//! descriptors deterministically from the image bytes. It exists for tests,
//! demos and capacity runs where the real model is unavailable; identical
//! bytes always produce an identical descriptor, so a sketch enrolled from
//! the same image as a mugshot is a guaranteed match.

mod error;
mod stub;
mod types;

pub use crate::error::ExtractorError;
pub use crate::stub::SyntheticExtractor;
pub use crate::types::{FaceBox, FaceObservation, ImageInput, Landmark, LANDMARK_POINTS};

/// A face detection and embedding backend.
pub trait FeatureExtractor: Send + Sync {
    /// Locate faces in an image without computing descriptors.
    fn detect(&self, image: &ImageInput) -> Result<Vec<FaceBox>, ExtractorError>;

    /// Produce the descriptor and landmarks for the single face in an
    /// image. Fails if the image holds no face or more than one; callers
    /// wanting per-face extraction should crop around [`detect`] boxes
    /// first.
    ///
    /// [`detect`]: FeatureExtractor::detect
    fn extract(&self, image: &ImageInput) -> Result<FaceObservation, ExtractorError>;
}
