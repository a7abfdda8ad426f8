use thiserror::Error;

use crate::transcode::image::Format;

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("No rule matches the requested operation: {0}")]
    NoMatchingRule(String),

    #[error("No decompressor registered for format {0}")]
    DecompressorNotFound(Format),

    #[error("No compressor registered for format {0}")]
    CompressorNotFound(Format),

    #[error("Could not detect the encoded image format")]
    FormatNotDetected,

    #[error("Format detector handler created with an empty header")]
    FormatDetectorEmptyHeader,

    #[error("Decompressor cannot sample: {0}")]
    DecompressorCannotSample(String),

    #[error("Failed to decode image: {0}")]
    DecompressorFailure(String),

    #[error("Compressor requires a lossless encode requirement")]
    CompressorRequiresLossless,

    #[error("Compressor requires a lossy encode requirement")]
    CompressorRequiresLossy,

    #[error("Compressor cannot encode metadata")]
    CompressorCannotEncodeMetadata,

    #[error("Compressor requires a known pixel specification")]
    CompressorPixelSpecificationNotSet,

    #[error("Compressor input size {width}x{height} exceeds maximum side dimension {max}")]
    CompressorInputSizeTooLarge { width: u32, height: u32, max: u32 },

    #[error("Failed to encode image: {0}")]
    CompressorFailure(String),

    #[error("Crop requirement cannot be rotated: {0}")]
    CropCannotRotate(String),

    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    #[error("Chroma sampling mode override {0} is not supported by the compressor")]
    ChromaSamplingModeOverrideUnsupported(String),

    #[error("Compressor declares no supported chroma sampling mode")]
    NoSupportedChromaSamplingMode,

    #[error("Output metadata requested for a compressor without metadata support: {0}")]
    MetadataWithoutCapability(String),

    #[error("Cannot convert scanline from {from} to {to}")]
    ScanlineConversionUnsupported { from: String, to: String },

    #[error("Premultiplied alpha is not supported by scanline conversion")]
    UnsupportedPremultipliedAlpha,

    #[error("Pipeline invariant violated at {location}: {message}")]
    PipelineInvariant { message: String, location: String },

    #[error("Numeric overflow converting {0}")]
    NumericOverflow(String),

    #[error("Numeric underflow converting {0}")]
    NumericUnderflow(String),

    #[error("Input source is empty")]
    EmptyInputSource,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscodeError {
    /// Stable, machine-matchable name of the failure.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoMatchingRule(_) => "no_matching_rule",
            Self::DecompressorNotFound(_) => "codec_repo_decompressor_not_found",
            Self::CompressorNotFound(_) => "codec_repo_compressor_not_found",
            Self::FormatNotDetected => "encoded_image_format_not_detected",
            Self::FormatDetectorEmptyHeader => "format_detector_empty_header",
            Self::DecompressorCannotSample(_) => "decompressor_cannot_sample",
            Self::DecompressorFailure(_) => "decompressor_failure",
            Self::CompressorRequiresLossless => "compressor_requires_lossless",
            Self::CompressorRequiresLossy => "compressor_requires_lossy",
            Self::CompressorCannotEncodeMetadata => "compressor_cannot_encode_metadata",
            Self::CompressorPixelSpecificationNotSet => "compressor_pixel_specification_not_set",
            Self::CompressorInputSizeTooLarge { .. } => "compressor_input_size_too_large",
            Self::CompressorFailure(_) => "compressor_failure",
            Self::CropCannotRotate(_) => "crop_requirement_cannot_rotate_with_requirement",
            Self::InvalidRequirement(_) => "invalid_requirement",
            Self::ChromaSamplingModeOverrideUnsupported(_) => {
                "chroma_sampling_mode_override_unsupported"
            }
            Self::NoSupportedChromaSamplingMode => "no_supported_chroma_sampling_mode",
            Self::MetadataWithoutCapability(_) => "metadata_without_capability",
            Self::ScanlineConversionUnsupported { .. } => {
                "cannot_convert_scanline_between_specifications"
            }
            Self::UnsupportedPremultipliedAlpha => {
                "scanline_conversion_unsupported_premultiplied_alpha"
            }
            Self::PipelineInvariant { .. } => "pipeline_invariant",
            Self::NumericOverflow(_) => "numeric_overflow",
            Self::NumericUnderflow(_) => "numeric_underflow",
            Self::EmptyInputSource => "empty_input_source",
            Self::Io(_) => "io_failure",
        }
    }

    /// Failures caused by the request or the input bytes rather than by a plugin.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingRule(_)
                | Self::DecompressorNotFound(_)
                | Self::CompressorNotFound(_)
                | Self::FormatNotDetected
                | Self::DecompressorFailure(_)
                | Self::CompressorRequiresLossless
                | Self::CompressorRequiresLossy
                | Self::CompressorInputSizeTooLarge { .. }
                | Self::CropCannotRotate(_)
                | Self::InvalidRequirement(_)
                | Self::ChromaSamplingModeOverrideUnsupported(_)
                | Self::EmptyInputSource
        )
    }

    /// Failures that indicate a capability contract broken by a plugin or by block wiring.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::FormatDetectorEmptyHeader
                | Self::DecompressorCannotSample(_)
                | Self::CompressorCannotEncodeMetadata
                | Self::CompressorPixelSpecificationNotSet
                | Self::NoSupportedChromaSamplingMode
                | Self::MetadataWithoutCapability(_)
                | Self::PipelineInvariant { .. }
        )
    }

    pub(crate) fn invariant(message: impl Into<String>, location: String) -> Self {
        Self::PipelineInvariant {
            message: message.into(),
            location,
        }
    }
}

pub type Result<T> = std::result::Result<T, TranscodeError>;

/// Returns `PipelineInvariant` with the call site when the condition does not hold.
macro_rules! ensure {
    ($cond:expr) => {
        if !($cond) {
            return Err($crate::transcode::common::error::TranscodeError::invariant(
                stringify!($cond),
                format!("{}:{}", file!(), line!()),
            ));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            return Err($crate::transcode::common::error::TranscodeError::invariant(
                format!($($arg)+),
                format!("{}:{}", file!(), line!()),
            ));
        }
    };
}

pub(crate) use ensure;
