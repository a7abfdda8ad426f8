use std::fmt;
use std::sync::Arc;

use crate::transcode::codecs::compressor::Compressor;
use crate::transcode::codecs::decompressor::Decompressor;
use crate::transcode::common::error::Result;
use crate::transcode::config::Configuration;
use crate::transcode::image::{
    ChromaSamplingMode, Format, PixelSpecification, PixelSpecificationNarrower, Ratio,
    Specification,
};
use crate::transcode::io::{ImageSink, ImageSource};
use crate::transcode::requirements::Encode;

/// Everything a compressor factory receives.
pub struct CompressorOptions<'a> {
    pub sink: &'a mut dyn ImageSink,
    pub image_specification: Specification,
    pub encode_requirement: Option<Encode>,
    pub configuration: Configuration,
}

pub type CompressorFactory = Arc<
    dyn for<'a> Fn(CompressorOptions<'a>) -> Result<Box<dyn Compressor + 'a>> + Send + Sync,
>;

pub type DecompressorFactory = Arc<
    dyn for<'a> Fn(
            &'a mut dyn ImageSource,
            Option<Ratio>,
            &Configuration,
        ) -> Result<Box<dyn Decompressor + 'a>>
        + Send
        + Sync,
>;

/// Capabilities and factory of a compressor for one format.
///
/// `supported_chroma_sampling_modes` is ordered: when neither an override nor the source
/// mode applies, the first entry is used.
#[derive(Clone)]
pub struct CompressorProvider {
    pub format: Format,
    pub supports_setting_metadata: bool,
    pub pixel_specification_narrower: Option<PixelSpecificationNarrower>,
    pub supported_chroma_sampling_modes: Vec<ChromaSamplingMode>,
    factory: CompressorFactory,
}

impl CompressorProvider {
    pub fn new<F>(format: Format, factory: F) -> Self
    where
        F: for<'a> Fn(CompressorOptions<'a>) -> Result<Box<dyn Compressor + 'a>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format,
            supports_setting_metadata: false,
            pixel_specification_narrower: None,
            supported_chroma_sampling_modes: Vec::new(),
            factory: Arc::new(factory),
        }
    }

    pub fn with_metadata_support(mut self) -> Self {
        self.supports_setting_metadata = true;
        self
    }

    pub fn with_pixel_specification_narrower<N>(mut self, narrower: N) -> Self
    where
        N: Fn(&PixelSpecification) -> PixelSpecification + Send + Sync + 'static,
    {
        self.pixel_specification_narrower = Some(Arc::new(narrower));
        self
    }

    pub fn with_chroma_sampling_modes(mut self, modes: Vec<ChromaSamplingMode>) -> Self {
        self.supported_chroma_sampling_modes = modes;
        self
    }

    pub fn make<'a>(&self, options: CompressorOptions<'a>) -> Result<Box<dyn Compressor + 'a>> {
        (self.factory)(options)
    }
}

impl fmt::Debug for CompressorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressorProvider")
            .field("format", &self.format)
            .field("supports_setting_metadata", &self.supports_setting_metadata)
            .field("has_narrower", &self.pixel_specification_narrower.is_some())
            .field(
                "supported_chroma_sampling_modes",
                &self.supported_chroma_sampling_modes,
            )
            .finish()
    }
}

/// Capabilities and factory of a decompressor for one format.
#[derive(Clone)]
pub struct DecompressorProvider {
    pub format: Format,
    /// Ratios (≤ 1) the decoder can downscale by while decoding.
    pub supported_sampling_ratios: Vec<Ratio>,
    factory: DecompressorFactory,
}

impl DecompressorProvider {
    pub fn new<F>(format: Format, factory: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut dyn ImageSource,
                Option<Ratio>,
                &Configuration,
            ) -> Result<Box<dyn Decompressor + 'a>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            format,
            supported_sampling_ratios: Vec::new(),
            factory: Arc::new(factory),
        }
    }

    pub fn with_sampling_ratios(mut self, ratios: Vec<Ratio>) -> Self {
        self.supported_sampling_ratios = ratios;
        self
    }

    pub fn make<'a>(
        &self,
        source: &'a mut dyn ImageSource,
        sampling_ratio: Option<Ratio>,
        configuration: &Configuration,
    ) -> Result<Box<dyn Decompressor + 'a>> {
        (self.factory)(source, sampling_ratio, configuration)
    }
}

impl fmt::Debug for DecompressorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressorProvider")
            .field("format", &self.format)
            .field("supported_sampling_ratios", &self.supported_sampling_ratios)
            .finish()
    }
}
