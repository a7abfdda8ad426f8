use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::{Metadata, Scanline, Size};
use crate::transcode::requirements::{Encode, EncodeMode};

/// Encodes scanlines into an image sink.
///
/// Compressors never convert scanlines: they receive rows already in the pixel specification
/// they were constructed with.
pub trait Compressor {
    fn write_scanline(&mut self, scanline: Scanline) -> Result<()>;

    /// Called once after the last scanline. Compressors that buffer the image write it here.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Rejects an explicitly lossy request.
pub fn enforce_lossless(encode_requirement: Option<&Encode>) -> Result<()> {
    match encode_requirement {
        Some(encode) if encode.mode == EncodeMode::Lossy => {
            Err(TranscodeError::CompressorRequiresLossless)
        }
        _ => Ok(()),
    }
}

/// Rejects an explicitly lossless request.
pub fn enforce_lossy(encode_requirement: Option<&Encode>) -> Result<()> {
    match encode_requirement {
        Some(encode) if encode.mode == EncodeMode::Lossless => {
            Err(TranscodeError::CompressorRequiresLossy)
        }
        _ => Ok(()),
    }
}

pub fn enforce_cannot_encode_metadata(metadata: &Metadata) -> Result<()> {
    if metadata.is_empty() {
        Ok(())
    } else {
        Err(TranscodeError::CompressorCannotEncodeMetadata)
    }
}

pub fn enforce_pixel_specification_set<T: Copy>(pixel_specification: Option<T>) -> Result<T> {
    pixel_specification.ok_or(TranscodeError::CompressorPixelSpecificationNotSet)
}

pub fn enforce_size_below_maximum_side_dimension(size: Size, maximum: u32) -> Result<()> {
    if size.width > maximum || size.height > maximum {
        return Err(TranscodeError::CompressorInputSizeTooLarge {
            width: size.width,
            height: size.height,
            max: maximum,
        });
    }
    Ok(())
}

/// Quality from the requirement clamped into `min..=max`, or `default`.
pub fn sanitized_quality(encode_requirement: Option<&Encode>, default: u32, min: u32, max: u32) -> u32 {
    encode_requirement
        .map(|encode| encode.sanitized_quality(default, min, max))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::image::{Entry, formats};

    #[test]
    fn lossless_and_lossy_enforcement() {
        let lossy = Encode::new(formats::JPEG).with_mode(EncodeMode::Lossy);
        let lossless = Encode::new(formats::PNG).with_mode(EncodeMode::Lossless);
        let any = Encode::new(formats::PNG);

        assert!(matches!(
            enforce_lossless(Some(&lossy)),
            Err(TranscodeError::CompressorRequiresLossless)
        ));
        assert!(enforce_lossless(Some(&lossless)).is_ok());
        assert!(enforce_lossless(Some(&any)).is_ok());
        assert!(enforce_lossless(None).is_ok());

        assert!(matches!(
            enforce_lossy(Some(&lossless)),
            Err(TranscodeError::CompressorRequiresLossy)
        ));
        assert!(enforce_lossy(Some(&lossy)).is_ok());
    }

    #[test]
    fn metadata_enforcement() {
        assert!(enforce_cannot_encode_metadata(&Metadata::empty()).is_ok());

        let mut metadata = Metadata::empty();
        metadata
            .entries
            .tiff
            .insert(0x010f, Entry::ascii(0x010f, "camera").unwrap());
        assert!(matches!(
            enforce_cannot_encode_metadata(&metadata),
            Err(TranscodeError::CompressorCannotEncodeMetadata)
        ));
    }

    #[test]
    fn size_enforcement() {
        assert!(enforce_size_below_maximum_side_dimension(Size::new(100, 100), 100).is_ok());
        let err = enforce_size_below_maximum_side_dimension(Size::new(101, 5), 100).unwrap_err();
        assert!(matches!(
            err,
            TranscodeError::CompressorInputSizeTooLarge { width: 101, .. }
        ));
    }

    #[test]
    fn quality_defaults_without_requirement() {
        assert_eq!(sanitized_quality(None, 90, 1, 100), 90);
        let encode = Encode::new(formats::JPEG).with_quality(120);
        assert_eq!(sanitized_quality(Some(&encode), 90, 1, 100), 100);
    }

    #[test]
    fn pixel_specification_must_be_set() {
        assert_eq!(enforce_pixel_specification_set(Some(3u8)).unwrap(), 3);
        assert!(matches!(
            enforce_pixel_specification_set::<u8>(None),
            Err(TranscodeError::CompressorPixelSpecificationNotSet)
        ));
    }
}
