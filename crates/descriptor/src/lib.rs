//! Descriptor core for the lineup matching pipeline.
//!
//! A face is represented as a fixed-length vector of 128 `f32` components
//! produced by an external embedding model. This crate owns everything that
//! happens to that vector before a match decision comes out the other end:
//!
//! - **Validation**: [`Descriptor`] is a newtype whose constructors are the
//!   single place the 128-component invariant is checked. Code holding a
//!   `Descriptor` never re-validates length.
//! - **Regions**: [`FeatureRegion`] names the seven contiguous index ranges
//!   of the descriptor (eyes, nose, mouth, face shape, hair, facial hair,
//!   glasses) that callers can weight independently.
//! - **Weighting**: [`WeightProfile`] carries one multiplier per region;
//!   [`apply_weights`] produces a re-weighted copy of a descriptor.
//! - **Metric**: [`compare`] computes the Euclidean distance between two
//!   already-weighted descriptors and derives the match decision and the
//!   similarity score from the fixed [`MATCH_THRESHOLD`].
//!
//! # Example
//!
//! ```
//! use descriptor::{apply_weights, compare, Descriptor, WeightProfile};
//!
//! let sketch = Descriptor::uniform(0.5);
//! let mugshot = Descriptor::uniform(0.52);
//!
//! // Witness was confident about the eyes, unsure about the hair.
//! let profile = WeightProfile::default().with_eyes(2.0).with_hair(0.5);
//!
//! let outcome = compare(
//!     &apply_weights(&sketch, &profile),
//!     &apply_weights(&mugshot, &profile),
//! );
//! assert!(outcome.is_match);
//! assert!(outcome.similarity > 0.0);
//! ```

mod error;
mod metric;
mod regions;
mod weights;

pub use crate::error::DescriptorError;
pub use crate::metric::{compare, Comparison, MATCH_THRESHOLD};
pub use crate::regions::FeatureRegion;
pub use crate::weights::{apply_weights, WeightProfile};

/// Number of components in every descriptor.
pub const DESCRIPTOR_LEN: usize = 128;

/// A validated 128-component facial descriptor.
///
/// Immutable once constructed. The only way to obtain one is through the
/// fallible constructors, so every `Descriptor` in the system is known to
/// hold exactly [`DESCRIPTOR_LEN`] components.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    components: Vec<f32>,
}

impl Descriptor {
    /// Take ownership of a component vector, checking its length.
    pub fn from_vec(components: Vec<f32>) -> Result<Self, DescriptorError> {
        if components.len() != DESCRIPTOR_LEN {
            return Err(DescriptorError::LengthMismatch {
                expected: DESCRIPTOR_LEN,
                found: components.len(),
            });
        }
        Ok(Self { components })
    }

    /// Copy a component slice, checking its length.
    pub fn from_slice(components: &[f32]) -> Result<Self, DescriptorError> {
        Self::from_vec(components.to_vec())
    }

    /// Descriptor with every component set to `value`. Handy for tests and
    /// demos; real descriptors come from the embedding extractor.
    pub fn uniform(value: f32) -> Self {
        Self {
            components: vec![value; DESCRIPTOR_LEN],
        }
    }

    /// All components in index order.
    pub fn as_slice(&self) -> &[f32] {
        &self.components
    }

    /// The components owned by one feature region.
    pub fn region(&self, region: FeatureRegion) -> &[f32] {
        &self.components[region.span()]
    }

    /// Consume the descriptor, yielding the raw component vector.
    pub fn into_vec(self) -> Vec<f32> {
        self.components
    }
}

// Crate-internal constructor for operations that preserve length by
// construction (weighting). Not exposed: external callers must validate.
pub(crate) fn from_components_unchecked(components: Vec<f32>) -> Descriptor {
    debug_assert_eq!(components.len(), DESCRIPTOR_LEN);
    Descriptor { components }
}
