//! Image data model: formats, geometry, orientation, pixel layouts, metadata and scanlines.

pub mod color;
pub mod format;
pub mod geometry;
pub mod metadata;
pub mod orientation;
pub mod pixel;
pub mod scanline;
pub mod specification;

pub use color::Color;
pub use format::{Format, formats};
pub use geometry::{Point, Ratio, Rect, Rounding, Size};
pub use metadata::{Entries, Entry, EntryType, IccProfile, Metadata};
pub use orientation::Orientation;
pub use pixel::{
    AlphaInfo, ColorModel, ComponentsOrder, PixelSpecification, PixelSpecificationNarrower,
    color_models, narrow_to_rgb_or_gray, specifications,
};
pub use scanline::Scanline;
pub use specification::{ChromaSamplingMode, Specification};
