use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::{Ratio, Scanline, Specification};

/// Decodes an image source into scanlines.
pub trait Decompressor {
    /// Specification of the encoded image as stored.
    fn source_image_specification(&self) -> Specification;

    /// Specification of the scanlines `read_scanline` yields; differs from the source when
    /// the decoder samples.
    fn output_image_specification(&self) -> Specification;

    /// Next row, or `None` once every row has been read.
    fn read_scanline(&mut self) -> Result<Option<Scanline>>;
}

/// Decompressors without sampling support call this from their constructor.
pub fn ensure_no_sampling_ratio(sampling_ratio: Option<Ratio>) -> Result<()> {
    match sampling_ratio {
        Some(ratio) if !ratio.is_one() => Err(TranscodeError::DecompressorCannotSample(
            ratio.to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ratio_is_not_sampling() {
        assert!(ensure_no_sampling_ratio(None).is_ok());
        assert!(ensure_no_sampling_ratio(Some(Ratio::new(1, 1))).is_ok());
        assert!(matches!(
            ensure_no_sampling_ratio(Some(Ratio::new(1, 2))),
            Err(TranscodeError::DecompressorCannotSample(_))
        ));
    }
}
