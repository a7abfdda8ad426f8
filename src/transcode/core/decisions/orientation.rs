use crate::transcode::common::error::Result;
use crate::transcode::config::Configuration;
use crate::transcode::image::{Orientation, Size};
use crate::transcode::requirements::Rotate;

/// Where the final orientation is realised: in the pixels or in output metadata.
///
/// Exactly one of `orientation` and `metadata_orientation` differs from `Up`, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationDecision {
    /// Orientation to apply to pixels.
    pub orientation: Orientation,
    /// Orientation to record in output metadata.
    pub metadata_orientation: Orientation,
    /// Size of the encoded pixels.
    pub size: Size,
}

impl OrientationDecision {
    pub fn calculate(
        rotate: Option<&Rotate>,
        input_orientation: Orientation,
        size: Size,
        configuration: &Configuration,
        compressor_supports_setting_metadata: bool,
    ) -> Result<Self> {
        let final_orientation = match rotate {
            Some(rotate) if !rotate.is_noop() => {
                input_orientation.rotated_and_flipped(rotate)?
            }
            _ => input_orientation,
        };

        let requires_straight_pixels = rotate.is_some_and(|rotate| rotate.force_up_orientation);
        let store_in_metadata = compressor_supports_setting_metadata
            && configuration.general.interpret_metadata()
            && !requires_straight_pixels;

        Ok(if store_in_metadata {
            Self {
                orientation: Orientation::Up,
                metadata_orientation: final_orientation,
                size,
            }
        } else {
            Self {
                orientation: final_orientation,
                metadata_orientation: Orientation::Up,
                size: size.oriented(final_orientation),
            }
        })
    }

    /// Size as displayed once the metadata orientation is honoured.
    pub fn metadata_aware_size(&self) -> Size {
        self.size.oriented(self.metadata_orientation)
    }

    pub fn should_rotate_pixels(&self) -> bool {
        self.orientation != Orientation::Up
    }
}
