use crate::Descriptor;

/// Euclidean distance below which two descriptors are considered the same
/// face. Calibrated for descriptors in the unit range; tighten for fewer
/// false positives, loosen for fewer misses.
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Outcome of comparing two weighted descriptors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Euclidean distance between the two component vectors.
    pub distance: f32,
    /// `1.0 - distance / MATCH_THRESHOLD`. Equal to `1.0` for identical
    /// descriptors, `0.0` at the threshold and negative beyond it. Only
    /// meaningful as a ranking score when `is_match` holds.
    pub similarity: f32,
    /// Whether `distance` is strictly below [`MATCH_THRESHOLD`].
    pub is_match: bool,
}

/// Compare two descriptors under the Euclidean metric.
///
/// Both inputs are expected to be weighted with the same profile; comparing
/// descriptors weighted differently produces distances with no calibrated
/// meaning. Distance is symmetric, so `compare(a, b) == compare(b, a)`.
pub fn compare(a: &Descriptor, b: &Descriptor) -> Comparison {
    let squared: f32 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| {
            let diff = x - y;
            diff * diff
        })
        .sum();
    let distance = squared.sqrt();
    Comparison {
        distance,
        similarity: 1.0 - distance / MATCH_THRESHOLD,
        is_match: distance < MATCH_THRESHOLD,
    }
}
