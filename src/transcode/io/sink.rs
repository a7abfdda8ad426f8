use crate::transcode::common::error::Result;
use crate::transcode::image::{PixelSpecification, Size};

/// Byte-oriented output.
pub trait ImageSink {
    fn write(&mut self, data: &[u8]) -> Result<()>;

    fn total_bytes_written(&self) -> usize;

    /// Announces the bitmap layout before the first write. Encoded sinks ignore it.
    fn set_configuration(&mut self, _size: Size, _pixel_specification: PixelSpecification) {}
}
