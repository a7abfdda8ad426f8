use crate::transcode::common::error::Result;
use crate::transcode::image::Specification;

/// Byte-oriented input.
pub trait ImageSource {
    /// Reads up to `destination.len()` bytes; `Ok(0)` means the source is exhausted.
    fn read(&mut self, destination: &mut [u8]) -> Result<usize>;

    fn total_bytes_read(&self) -> usize;

    /// Bytes still available without blocking.
    fn available(&self) -> usize;

    /// Specification of the pixels, for sources that hold a decoded bitmap.
    fn bitmap_specification(&self) -> Option<Specification> {
        None
    }
}

/// Source of raw scanline bytes whose layout is known up front.
pub trait BitmapImageSource: ImageSource {
    fn image_specification(&self) -> Specification;
}

/// Reads until `destination` is full or the source is exhausted.
pub fn read_fully(source: &mut dyn ImageSource, destination: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < destination.len() {
        let read = source.read(&mut destination[filled..])?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled)
}

/// Drains the remaining bytes of `source`.
pub fn read_to_end(source: &mut dyn ImageSource) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(source.available());
    let mut chunk = [0u8; 64 * 1024];
    loop {
        let read = source.read(&mut chunk)?;
        if read == 0 {
            return Ok(data);
        }
        data.extend_from_slice(&chunk[..read]);
    }
}
