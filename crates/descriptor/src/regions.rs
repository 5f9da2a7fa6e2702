use std::fmt;
use std::ops::Range;

/// Named feature regions of a descriptor.
///
/// The 128 components are partitioned into seven contiguous spans, one per
/// facial feature. The spans are fixed by the embedding model and together
/// cover every index exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureRegion {
    Eyes,
    Nose,
    Mouth,
    FaceShape,
    Hair,
    FacialHair,
    Glasses,
}

impl FeatureRegion {
    /// Every region, in index order.
    pub const ALL: [FeatureRegion; 7] = [
        FeatureRegion::Eyes,
        FeatureRegion::Nose,
        FeatureRegion::Mouth,
        FeatureRegion::FaceShape,
        FeatureRegion::Hair,
        FeatureRegion::FacialHair,
        FeatureRegion::Glasses,
    ];

    /// The half-open component index range owned by this region.
    pub const fn span(self) -> Range<usize> {
        match self {
            FeatureRegion::Eyes => 0..20,
            FeatureRegion::Nose => 20..40,
            FeatureRegion::Mouth => 40..60,
            FeatureRegion::FaceShape => 60..80,
            FeatureRegion::Hair => 80..100,
            FeatureRegion::FacialHair => 100..120,
            FeatureRegion::Glasses => 120..128,
        }
    }

    /// Human-readable region name, matching the wire spelling used by
    /// weight profiles.
    pub const fn name(self) -> &'static str {
        match self {
            FeatureRegion::Eyes => "eyes",
            FeatureRegion::Nose => "nose",
            FeatureRegion::Mouth => "mouth",
            FeatureRegion::FaceShape => "faceShape",
            FeatureRegion::Hair => "hair",
            FeatureRegion::FacialHair => "facialHair",
            FeatureRegion::Glasses => "glasses",
        }
    }
}

impl fmt::Display for FeatureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
