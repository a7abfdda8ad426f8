//! TIFF output.
//!
//! The `tiff` encoder wants the whole raster at once, so rows are collected and the file
//! is written to the sink when the compressor is finished.

use std::io::Cursor;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::Predictor;
use tracing::debug;

use crate::transcode::codecs::{
    CompressorOptions, CompressorProvider, Compressor, enforce_cannot_encode_metadata,
    enforce_lossless,
};
use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::common::numeric::{checked_mul, to_usize};
use crate::transcode::config::{Configuration, TiffCompression};
use crate::transcode::core::plugin::Plugin;
use crate::transcode::image::{
    ChromaSamplingMode, Scanline, Specification, formats, narrow_to_rgb_or_gray, specifications,
};
use crate::transcode::io::ImageSink;

fn compression(configuration: &Configuration) -> Compression {
    match configuration.tiff.compression() {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    }
}

fn encode_error(error: tiff::TiffError) -> TranscodeError {
    TranscodeError::CompressorFailure(error.to_string())
}

pub struct TiffCompressor<'a> {
    sink: &'a mut dyn ImageSink,
    specification: Specification,
    configuration: Configuration,
    pixels: Vec<u8>,
    rows_written: u32,
}

impl<'a> TiffCompressor<'a> {
    pub fn new(options: CompressorOptions<'a>) -> Result<Self> {
        let CompressorOptions {
            sink,
            image_specification,
            encode_requirement,
            configuration,
        } = options;

        enforce_lossless(encode_requirement.as_ref())?;
        enforce_cannot_encode_metadata(&image_specification.metadata)?;

        let pixel_specification = image_specification.pixel_specification;
        ensure!(
            [specifications::GRAY8, specifications::RGB, specifications::RGBA]
                .contains(&pixel_specification),
            "TIFF cannot store {}",
            pixel_specification
        );

        let row_bytes = image_specification
            .size
            .row_bytes(pixel_specification.bytes_per_pixel)?;
        let capacity = checked_mul(
            row_bytes,
            to_usize(u64::from(image_specification.size.height))?,
        )?;

        Ok(Self {
            sink,
            specification: image_specification,
            configuration,
            pixels: Vec::with_capacity(capacity),
            rows_written: 0,
        })
    }

    pub fn provider() -> CompressorProvider {
        CompressorProvider::new(formats::TIFF, |options| {
            Ok(Box::new(TiffCompressor::new(options)?))
        })
        .with_pixel_specification_narrower(narrow_to_rgb_or_gray)
        .with_chroma_sampling_modes(vec![ChromaSamplingMode::S444])
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression(&self.configuration));
        if self.configuration.tiff.use_horizontal_predictor() {
            encoder = encoder.with_predictor(Predictor::Horizontal);
        }

        let size = self.specification.size;
        let pixel_specification = self.specification.pixel_specification;
        let written = if pixel_specification == specifications::GRAY8 {
            encoder.write_image::<colortype::Gray8>(size.width, size.height, &self.pixels)
        } else if pixel_specification == specifications::RGBA {
            encoder.write_image::<colortype::RGBA8>(size.width, size.height, &self.pixels)
        } else {
            encoder.write_image::<colortype::RGB8>(size.width, size.height, &self.pixels)
        };
        written.map_err(encode_error)?;

        Ok(buffer)
    }
}

impl Compressor for TiffCompressor<'_> {
    fn write_scanline(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(
            scanline.specification() == self.specification.pixel_specification,
            "scanline is {} but TIFF expects {}",
            scanline.specification(),
            self.specification.pixel_specification
        );
        ensure!(
            self.rows_written < self.specification.size.height,
            "more than {} scanlines written",
            self.specification.size.height
        );
        self.pixels.extend_from_slice(scanline.data());
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        ensure!(
            self.rows_written == self.specification.size.height,
            "TIFF finished after {} of {} scanlines",
            self.rows_written,
            self.specification.size.height
        );
        debug!(
            "Encoding TIFF image: {}x{} {}",
            self.specification.size.width,
            self.specification.size.height,
            self.specification.pixel_specification
        );
        let encoded = self.encode()?;
        self.sink.write(&encoded)?;
        debug!("TIFF encoding complete, {} bytes", encoded.len());
        Ok(())
    }
}

/// TIFF output for every input the base recipe can decode.
pub fn plugin() -> Plugin {
    Plugin::new().with_compressor_provider(TiffCompressor::provider())
}
