pub mod bitmap;
pub mod compressor;
pub mod decompressor;
pub mod format_detector;
pub mod provider;
pub mod repository;
pub mod specification_detector;

pub use bitmap::{BitmapCompressor, BitmapDecompressor};
pub use compressor::{
    Compressor, enforce_cannot_encode_metadata, enforce_lossless, enforce_lossy,
    enforce_pixel_specification_set, enforce_size_below_maximum_side_dimension,
    sanitized_quality,
};
pub use decompressor::{Decompressor, ensure_no_sampling_ratio};
pub use format_detector::{FormatDetector, FormatDetectorHandler, default_handlers, simple_handler};
pub use provider::{
    CompressorFactory, CompressorOptions, CompressorProvider, DecompressorFactory,
    DecompressorProvider,
};
pub use repository::Repository;
pub use specification_detector::SpecificationDetector;
