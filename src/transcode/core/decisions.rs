//! Pure computations deriving the output image from the input, the request and codec
//! capabilities.

pub mod base;
pub mod chroma;
pub mod metadata;
pub mod orientation;
pub mod pixel;
pub mod resize;

pub use base::BaseDecision;
pub use chroma::calculate_output_chroma_sampling_mode;
pub use metadata::calculate_output_metadata;
pub use orientation::OrientationDecision;
pub use pixel::calculate_output_pixel_specification;
pub use resize::{
    DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING, Rating, ResizeDecision, ResizeRating,
    calculate_resize_decision,
};
