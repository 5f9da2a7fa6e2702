use descriptor::{Descriptor, DESCRIPTOR_LEN};

use crate::error::ExtractorError;
use crate::types::{FaceBox, FaceObservation, ImageInput, Landmark, LANDMARK_POINTS};
use crate::FeatureExtractor;

const MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const LANE_SALT: u64 = 0xA24B_AED4_963E_E407;

/// Deterministic extractor backend for tests and demos.
///
/// Descriptors are derived purely from the image bytes, so the same bytes
/// always yield the same descriptor regardless of the source label. Any
/// non-empty image is treated as holding exactly one face unless a count is
/// forced with [`with_face_count`].
///
/// [`with_face_count`]: SyntheticExtractor::with_face_count
#[derive(Debug, Clone, Default)]
pub struct SyntheticExtractor {
    forced_faces: Option<usize>,
}

impl SyntheticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `count` faces for every image, regardless of content. Used to
    /// exercise the no-face and multi-face paths.
    pub fn with_face_count(count: usize) -> Self {
        Self {
            forced_faces: Some(count),
        }
    }

    fn face_count(&self, image: &ImageInput) -> usize {
        match self.forced_faces {
            Some(count) => count,
            None if image.data.is_empty() => 0,
            None => 1,
        }
    }
}

impl FeatureExtractor for SyntheticExtractor {
    fn detect(&self, image: &ImageInput) -> Result<Vec<FaceBox>, ExtractorError> {
        let seed = fxhash::hash64(image.data.as_ref());
        Ok((0..self.face_count(image))
            .map(|idx| synthetic_box(seed, idx))
            .collect())
    }

    fn extract(&self, image: &ImageInput) -> Result<FaceObservation, ExtractorError> {
        match self.face_count(image) {
            0 => Err(ExtractorError::NoFaceDetected {
                source: image.source.clone(),
            }),
            1 => {
                let seed = fxhash::hash64(image.data.as_ref());
                let face_box = synthetic_box(seed, 0);
                Ok(FaceObservation {
                    descriptor: synthetic_descriptor(seed)?,
                    landmarks: synthetic_landmarks(&face_box),
                    face_box,
                })
            }
            count => Err(ExtractorError::MultipleFacesDetected {
                source: image.source.clone(),
                count,
            }),
        }
    }
}

fn synthetic_descriptor(seed: u64) -> Result<Descriptor, ExtractorError> {
    let components: Vec<f32> = (0..DESCRIPTOR_LEN)
        .map(|idx| component(seed, idx))
        .collect();
    Descriptor::from_vec(components).map_err(|err| ExtractorError::Backend(err.to_string()))
}

// Splitmix-style lane mixing: rotate by a prime stride so neighbouring
// components decorrelate, then map the top 24 bits into [0, 1).
fn component(seed: u64, idx: usize) -> f32 {
    let lane = seed
        .rotate_left((idx % 61) as u32)
        .wrapping_mul(MIX)
        ^ (idx as u64).wrapping_mul(LANE_SALT);
    (lane >> 40) as f32 / (1u32 << 24) as f32
}

fn synthetic_box(seed: u64, idx: usize) -> FaceBox {
    let lane = seed.wrapping_add(idx as u64).wrapping_mul(MIX);
    let jitter = (lane & 0xFF) as f32 / 4096.0;
    FaceBox {
        x: 0.05 + jitter,
        y: 0.05 + jitter,
        width: 0.8,
        height: 0.8,
        confidence: 0.90 + ((lane >> 8) & 0xFF) as f32 / 2560.0,
    }
}

// 68 points on an ellipse inset in the box, matching the usual landmark
// count of dlib-style detectors.
fn synthetic_landmarks(face_box: &FaceBox) -> Vec<Landmark> {
    (0..LANDMARK_POINTS)
        .map(|idx| {
            let angle = idx as f32 / LANDMARK_POINTS as f32 * std::f32::consts::TAU;
            Landmark {
                x: face_box.x + face_box.width * (0.5 + 0.4 * angle.cos()),
                y: face_box.y + face_box.height * (0.5 + 0.4 * angle.sin()),
            }
        })
        .collect()
}
