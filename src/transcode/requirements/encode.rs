use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodeMode {
    Lossless,
    Lossy,
    #[default]
    Any,
}

/// Target format plus quality and mode constraints for the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encode {
    pub format: Format,
    pub quality: u32,
    pub mode: EncodeMode,
}

impl Encode {
    pub const QUALITY_UNSET: u32 = 0;
    pub const QUALITY_MIN: u32 = 1;
    pub const QUALITY_DEFAULT: u32 = 75;
    pub const QUALITY_MAX: u32 = 100;

    pub fn new(format: Format) -> Self {
        Self {
            format,
            quality: Self::QUALITY_UNSET,
            mode: EncodeMode::Any,
        }
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_mode(mut self, mode: EncodeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn has_quality(&self) -> bool {
        self.quality != Self::QUALITY_UNSET
    }

    /// Quality clamped into `min..=max`, or `default` when unset.
    pub fn sanitized_quality(&self, default: u32, min: u32, max: u32) -> u32 {
        if self.has_quality() {
            self.quality.clamp(min, max)
        } else {
            default
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality > Self::QUALITY_MAX {
            return Err(TranscodeError::InvalidRequirement(format!(
                "quality {} exceeds {}",
                self.quality,
                Self::QUALITY_MAX
            )));
        }
        Ok(())
    }
}
