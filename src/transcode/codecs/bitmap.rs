use tracing::trace;

use crate::transcode::codecs::compressor::{
    Compressor, enforce_cannot_encode_metadata, enforce_lossless,
};
use crate::transcode::codecs::decompressor::{Decompressor, ensure_no_sampling_ratio};
use crate::transcode::codecs::provider::{
    CompressorOptions, CompressorProvider, DecompressorProvider,
};
use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::common::numeric::to_usize;
use crate::transcode::image::{ChromaSamplingMode, Ratio, Scanline, Specification, formats};
use crate::transcode::io::{ImageSink, ImageSource, read_fully};

/// Writes scanline bytes unchanged.
pub struct BitmapCompressor<'a> {
    sink: &'a mut dyn ImageSink,
    specification: Specification,
    next_scanline: u32,
}

impl<'a> BitmapCompressor<'a> {
    pub fn new(options: CompressorOptions<'a>) -> Result<Self> {
        let CompressorOptions {
            sink,
            image_specification,
            encode_requirement,
            ..
        } = options;

        enforce_cannot_encode_metadata(&image_specification.metadata)?;
        enforce_lossless(encode_requirement.as_ref())?;

        sink.set_configuration(
            image_specification.size,
            image_specification.pixel_specification,
        );

        Ok(Self {
            sink,
            specification: image_specification,
            next_scanline: 0,
        })
    }

    pub fn provider() -> CompressorProvider {
        CompressorProvider::new(formats::BITMAP, |options| {
            Ok(Box::new(BitmapCompressor::new(options)?))
        })
        .with_chroma_sampling_modes(vec![ChromaSamplingMode::S444])
    }
}

impl Compressor for BitmapCompressor<'_> {
    fn write_scanline(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(
            scanline.specification() == self.specification.pixel_specification,
            "scanline is {} but bitmap expects {}",
            scanline.specification(),
            self.specification.pixel_specification
        );
        ensure!(
            self.next_scanline < self.specification.size.height,
            "more than {} scanlines written",
            self.specification.size.height
        );
        ensure!(
            scanline.width() == to_usize(u64::from(self.specification.size.width))?,
            "scanline width {} differs from image width {}",
            scanline.width(),
            self.specification.size.width
        );

        self.sink.write(scanline.data())?;
        self.next_scanline += 1;
        Ok(())
    }
}

/// Reads rows of raw pixel bytes from a bitmap source.
pub struct BitmapDecompressor<'a> {
    source: &'a mut dyn ImageSource,
    specification: Specification,
    current_line: u32,
}

impl<'a> BitmapDecompressor<'a> {
    pub fn new(source: &'a mut dyn ImageSource, sampling_ratio: Option<Ratio>) -> Result<Self> {
        ensure_no_sampling_ratio(sampling_ratio)?;
        let specification = source.bitmap_specification().ok_or_else(|| {
            TranscodeError::DecompressorFailure("source does not describe a bitmap".into())
        })?;
        Ok(Self {
            source,
            specification,
            current_line: 0,
        })
    }

    pub fn provider() -> DecompressorProvider {
        DecompressorProvider::new(formats::BITMAP, |source, sampling_ratio, _configuration| {
            Ok(Box::new(BitmapDecompressor::new(source, sampling_ratio)?))
        })
    }
}

impl Decompressor for BitmapDecompressor<'_> {
    fn source_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn output_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn read_scanline(&mut self) -> Result<Option<Scanline>> {
        if self.current_line >= self.specification.size.height {
            return Ok(None);
        }

        let width = to_usize(u64::from(self.specification.size.width))?;
        let mut scanline = Scanline::new(self.specification.pixel_specification, width);
        let expected = scanline.size_bytes();
        let read = read_fully(self.source, scanline.data_mut())?;
        if read != expected {
            return Err(TranscodeError::DecompressorFailure(format!(
                "bitmap row {} truncated: {read} of {expected} bytes",
                self.current_line
            )));
        }

        trace!("Read bitmap row {}", self.current_line);
        self.current_line += 1;
        Ok(Some(scanline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::config::Configuration;
    use crate::transcode::image::{Entry, Metadata, Size, specifications};
    use crate::transcode::io::{VectorBitmapImageSource, VectorImageSink, VectorImageSource};
    use crate::transcode::requirements::{Encode, EncodeMode};

    fn gray_specification(width: u32, height: u32) -> Specification {
        Specification::new(
            Size::new(width, height),
            formats::BITMAP,
            specifications::GRAY8,
        )
    }

    #[test]
    fn decompressor_reads_rows_then_ends() {
        let mut source =
            VectorBitmapImageSource::new(vec![1, 2, 3, 4, 5, 6], gray_specification(3, 2));
        let mut decompressor = BitmapDecompressor::new(&mut source, None).unwrap();

        assert_eq!(
            decompressor.read_scanline().unwrap().unwrap().data(),
            &[1, 2, 3]
        );
        assert_eq!(
            decompressor.read_scanline().unwrap().unwrap().data(),
            &[4, 5, 6]
        );
        assert!(decompressor.read_scanline().unwrap().is_none());
    }

    #[test]
    fn decompressor_rejects_sampling_and_plain_sources() {
        let mut source = VectorBitmapImageSource::new(vec![0; 4], gray_specification(2, 2));
        assert!(matches!(
            BitmapDecompressor::new(&mut source, Some(Ratio::new(1, 2))),
            Err(TranscodeError::DecompressorCannotSample(_))
        ));

        let mut plain = VectorImageSource::new(vec![0; 4]);
        assert!(matches!(
            BitmapDecompressor::new(&mut plain, None),
            Err(TranscodeError::DecompressorFailure(_))
        ));
    }

    #[test]
    fn truncated_bitmap_fails() {
        let mut source = VectorBitmapImageSource::new(vec![1, 2, 3], gray_specification(2, 2));
        let mut decompressor = BitmapDecompressor::new(&mut source, None).unwrap();
        decompressor.read_scanline().unwrap();
        assert!(matches!(
            decompressor.read_scanline(),
            Err(TranscodeError::DecompressorFailure(_))
        ));
    }

    #[test]
    fn compressor_configures_sink_and_writes_rows() {
        let mut sink = VectorImageSink::new();
        {
            let mut compressor = BitmapCompressor::new(CompressorOptions {
                sink: &mut sink,
                image_specification: gray_specification(2, 1),
                encode_requirement: None,
                configuration: Configuration::default(),
            })
            .unwrap();
            let row = Scanline::from_bytes(specifications::GRAY8, vec![7, 8]).unwrap();
            compressor.write_scanline(row).unwrap();

            let extra = Scanline::from_bytes(specifications::GRAY8, vec![9, 9]).unwrap();
            assert!(matches!(
                compressor.write_scanline(extra),
                Err(TranscodeError::PipelineInvariant { .. })
            ));
        }
        assert_eq!(sink.data(), &[7, 8]);
        assert_eq!(
            sink.configuration(),
            Some((Size::new(2, 1), specifications::GRAY8))
        );
    }

    #[test]
    fn compressor_rejects_wrong_scanline_layout() {
        let mut sink = VectorImageSink::new();
        let mut compressor = BitmapCompressor::new(CompressorOptions {
            sink: &mut sink,
            image_specification: gray_specification(2, 2),
            encode_requirement: None,
            configuration: Configuration::default(),
        })
        .unwrap();

        let rgb = Scanline::new(specifications::RGB, 2);
        assert!(compressor.write_scanline(rgb).is_err());
        let narrow = Scanline::new(specifications::GRAY8, 1);
        assert!(compressor.write_scanline(narrow).is_err());
    }

    #[test]
    fn compressor_requires_lossless_without_metadata() {
        let mut sink = VectorImageSink::new();
        let lossy = Encode::new(formats::BITMAP).with_mode(EncodeMode::Lossy);
        let result = BitmapCompressor::new(CompressorOptions {
            sink: &mut sink,
            image_specification: gray_specification(1, 1),
            encode_requirement: Some(lossy),
            configuration: Configuration::default(),
        });
        assert!(matches!(
            result,
            Err(TranscodeError::CompressorRequiresLossless)
        ));

        let mut metadata = Metadata::empty();
        metadata.entries.exif.insert(0x9003, Entry::ascii(0x9003, "2020").unwrap());
        let mut other_sink = VectorImageSink::new();
        let result = BitmapCompressor::new(CompressorOptions {
            sink: &mut other_sink,
            image_specification: gray_specification(1, 1).with_metadata(metadata),
            encode_requirement: None,
            configuration: Configuration::default(),
        });
        assert!(matches!(
            result,
            Err(TranscodeError::CompressorCannotEncodeMetadata)
        ));
    }
}
