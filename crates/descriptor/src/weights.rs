use serde::{Deserialize, Serialize};

use crate::regions::FeatureRegion;
use crate::{from_components_unchecked, Descriptor};

/// Per-region confidence multipliers supplied alongside a sketch.
///
/// A weight of `1.0` leaves a region untouched, values above emphasise it,
/// values below de-emphasise it and `0.0` removes it from the comparison.
/// Missing fields deserialize to the neutral `1.0`, so a partial profile on
/// the wire is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightProfile {
    pub eyes: f32,
    pub nose: f32,
    pub mouth: f32,
    pub face_shape: f32,
    pub hair: f32,
    pub facial_hair: f32,
    pub glasses: f32,
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl WeightProfile {
    /// Profile with every region set to the same weight.
    pub fn uniform(weight: f32) -> Self {
        Self {
            eyes: weight,
            nose: weight,
            mouth: weight,
            face_shape: weight,
            hair: weight,
            facial_hair: weight,
            glasses: weight,
        }
    }

    /// The multiplier for one region.
    pub fn weight_for(&self, region: FeatureRegion) -> f32 {
        match region {
            FeatureRegion::Eyes => self.eyes,
            FeatureRegion::Nose => self.nose,
            FeatureRegion::Mouth => self.mouth,
            FeatureRegion::FaceShape => self.face_shape,
            FeatureRegion::Hair => self.hair,
            FeatureRegion::FacialHair => self.facial_hair,
            FeatureRegion::Glasses => self.glasses,
        }
    }

    /// Whether every weight is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        FeatureRegion::ALL
            .iter()
            .all(|&region| is_usable(self.weight_for(region)))
    }

    /// Copy of the profile with every unusable weight replaced by the
    /// neutral `1.0`. Weighting never fails: a malformed profile degrades
    /// to an unweighted comparison for the affected regions.
    pub fn sanitized(&self) -> Self {
        Self {
            eyes: sanitize(self.eyes),
            nose: sanitize(self.nose),
            mouth: sanitize(self.mouth),
            face_shape: sanitize(self.face_shape),
            hair: sanitize(self.hair),
            facial_hair: sanitize(self.facial_hair),
            glasses: sanitize(self.glasses),
        }
    }

    pub fn with_eyes(mut self, weight: f32) -> Self {
        self.eyes = weight;
        self
    }

    pub fn with_nose(mut self, weight: f32) -> Self {
        self.nose = weight;
        self
    }

    pub fn with_mouth(mut self, weight: f32) -> Self {
        self.mouth = weight;
        self
    }

    pub fn with_face_shape(mut self, weight: f32) -> Self {
        self.face_shape = weight;
        self
    }

    pub fn with_hair(mut self, weight: f32) -> Self {
        self.hair = weight;
        self
    }

    pub fn with_facial_hair(mut self, weight: f32) -> Self {
        self.facial_hair = weight;
        self
    }

    pub fn with_glasses(mut self, weight: f32) -> Self {
        self.glasses = weight;
        self
    }
}

fn is_usable(weight: f32) -> bool {
    weight.is_finite() && weight >= 0.0
}

fn sanitize(weight: f32) -> f32 {
    if is_usable(weight) {
        weight
    } else {
        1.0
    }
}

/// Produce a weighted copy of `descriptor`, multiplying every component by
/// its region's weight. The input is never mutated; both sides of a
/// comparison must be weighted with the same profile for the distance to
/// mean anything.
pub fn apply_weights(descriptor: &Descriptor, profile: &WeightProfile) -> Descriptor {
    let mut components = descriptor.as_slice().to_vec();
    for region in FeatureRegion::ALL {
        let weight = profile.weight_for(region);
        for component in &mut components[region.span()] {
            *component *= weight;
        }
    }
    from_components_unchecked(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DESCRIPTOR_LEN;

    fn indexed_descriptor() -> Descriptor {
        let components: Vec<f32> = (0..DESCRIPTOR_LEN).map(|idx| idx as f32 + 1.0).collect();
        Descriptor::from_vec(components).unwrap()
    }

    #[test]
    fn default_profile_is_identity() {
        let descriptor = indexed_descriptor();
        let weighted = apply_weights(&descriptor, &WeightProfile::default());
        assert_eq!(weighted, descriptor);
    }

    #[test]
    fn weighting_leaves_the_input_untouched() {
        let descriptor = indexed_descriptor();
        let before = descriptor.as_slice().to_vec();
        let _ = apply_weights(&descriptor, &WeightProfile::uniform(3.0));
        assert_eq!(descriptor.as_slice(), before.as_slice());
    }

    #[test]
    fn eyes_weight_touches_only_the_eyes_span() {
        let descriptor = indexed_descriptor();
        let profile = WeightProfile::default().with_eyes(2.0);
        let weighted = apply_weights(&descriptor, &profile);

        for idx in 0..20 {
            assert_eq!(weighted.as_slice()[idx], descriptor.as_slice()[idx] * 2.0);
        }
        for idx in 20..DESCRIPTOR_LEN {
            assert_eq!(
                weighted.as_slice()[idx].to_bits(),
                descriptor.as_slice()[idx].to_bits()
            );
        }
    }

    #[test]
    fn zero_weight_zeroes_the_region() {
        let descriptor = indexed_descriptor();
        let profile = WeightProfile::default().with_glasses(0.0);
        let weighted = apply_weights(&descriptor, &profile);
        assert!(weighted.region(FeatureRegion::Glasses)
            .iter()
            .all(|&c| c == 0.0));
        assert_eq!(
            weighted.region(FeatureRegion::Hair),
            descriptor.region(FeatureRegion::Hair)
        );
    }

    #[test]
    fn every_region_weight_reaches_its_span() {
        let descriptor = Descriptor::uniform(1.0);
        let profile = WeightProfile {
            eyes: 2.0,
            nose: 3.0,
            mouth: 4.0,
            face_shape: 5.0,
            hair: 6.0,
            facial_hair: 7.0,
            glasses: 8.0,
        };
        let weighted = apply_weights(&descriptor, &profile);
        for region in FeatureRegion::ALL {
            let expected = profile.weight_for(region);
            assert!(weighted.region(region).iter().all(|&c| c == expected));
        }
    }

    #[test]
    fn validity_flags_negative_and_non_finite_weights() {
        assert!(WeightProfile::default().is_valid());
        assert!(WeightProfile::uniform(0.0).is_valid());
        assert!(!WeightProfile::default().with_nose(-0.5).is_valid());
        assert!(!WeightProfile::default().with_hair(f32::NAN).is_valid());
        assert!(!WeightProfile::default().with_mouth(f32::INFINITY).is_valid());
    }

    #[test]
    fn sanitized_replaces_only_unusable_weights() {
        let profile = WeightProfile::default()
            .with_eyes(2.5)
            .with_nose(-1.0)
            .with_hair(f32::NAN);
        let clean = profile.sanitized();
        assert_eq!(clean.eyes, 2.5);
        assert_eq!(clean.nose, 1.0);
        assert_eq!(clean.hair, 1.0);
        assert_eq!(clean.mouth, 1.0);
        assert!(clean.is_valid());
    }

    #[test]
    fn profile_deserializes_from_camel_case() {
        let profile: WeightProfile =
            serde_json::from_str(r#"{"faceShape": 0.5, "facialHair": 2.0}"#).unwrap();
        assert_eq!(profile.face_shape, 0.5);
        assert_eq!(profile.facial_hair, 2.0);
        assert_eq!(profile.eyes, 1.0);
        assert_eq!(profile.glasses, 1.0);
    }

    #[test]
    fn profile_serializes_to_camel_case() {
        let json = serde_json::to_value(WeightProfile::default().with_face_shape(0.25)).unwrap();
        assert_eq!(json["faceShape"], 0.25);
        assert_eq!(json["facialHair"], 1.0);
        assert!(json.get("face_shape").is_none());
    }

    #[test]
    fn empty_profile_document_is_neutral() {
        let profile: WeightProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, WeightProfile::default());
    }
}
