use crate::transcode::codecs::{
    Compressor, CompressorOptions, CompressorProvider, Decompressor, DecompressorProvider,
};
use crate::transcode::common::error::Result;
use crate::transcode::config::{Configuration, Transformations};
use crate::transcode::image::{Format, Metadata, PixelSpecification, Ratio, Specification};
use crate::transcode::io::{ImageSink, ImageSource};
use crate::transcode::requirements::Encode;

/// Source and sink of one call, borrowed from the caller.
pub struct Io<'a> {
    pub source: &'a mut dyn ImageSource,
    pub sink: &'a mut dyn ImageSink,
}

/// Providers resolved for the input and output formats.
#[derive(Debug, Clone)]
pub struct Codecs {
    pub decompressor_provider: DecompressorProvider,
    pub compressor_provider: CompressorProvider,
}

/// What the caller asked for, independent of the codecs that will serve it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub input_image_specification: Specification,
    pub output_image_format: Format,
    pub transformations: Transformations,
    pub encode_requirement: Option<Encode>,
    pub extra_metadata: Option<Metadata>,
    pub output_pixel_specification_requirement: Option<PixelSpecification>,
}

impl Parameters {
    /// Parameters for `input` with nothing requested but the output format.
    pub fn new(input_image_specification: Specification, output_image_format: Format) -> Self {
        Self {
            input_image_specification,
            output_image_format,
            transformations: Transformations::default(),
            encode_requirement: None,
            extra_metadata: None,
            output_pixel_specification_requirement: None,
        }
    }
}

/// Context of one transcode call.
pub struct Operation<'a> {
    pub io: Io<'a>,
    pub codecs: Codecs,
    pub parameters: Parameters,
    pub configuration: Configuration,
}

impl Operation<'_> {
    /// Decompressor over the operation's source.
    pub fn make_decompressor(
        &mut self,
        sampling_ratio: Option<Ratio>,
    ) -> Result<Box<dyn Decompressor + '_>> {
        self.codecs.decompressor_provider.make(
            &mut *self.io.source,
            sampling_ratio,
            &self.configuration,
        )
    }

    /// Compressor writing `output_image_specification` to the operation's sink.
    pub fn make_compressor(
        &mut self,
        output_image_specification: Specification,
    ) -> Result<Box<dyn Compressor + '_>> {
        self.codecs.compressor_provider.make(CompressorOptions {
            sink: &mut *self.io.sink,
            image_specification: output_image_specification,
            encode_requirement: self.parameters.encode_requirement,
            configuration: self.configuration,
        })
    }

    /// Both ends of the pipeline at once; the decompressor is built first so it can read the
    /// header before anything is written.
    pub fn make_codecs(
        &mut self,
        sampling_ratio: Option<Ratio>,
        output_image_specification: Specification,
    ) -> Result<(Box<dyn Decompressor + '_>, Box<dyn Compressor + '_>)> {
        let Operation {
            io,
            codecs,
            parameters,
            configuration,
        } = self;

        let decompressor =
            codecs
                .decompressor_provider
                .make(&mut *io.source, sampling_ratio, configuration)?;
        let compressor = codecs.compressor_provider.make(CompressorOptions {
            sink: &mut *io.sink,
            image_specification: output_image_specification,
            encode_requirement: parameters.encode_requirement,
            configuration: *configuration,
        })?;
        Ok((decompressor, compressor))
    }
}
