use crate::transcode::image::pixel::PixelSpecification;

/// One row of pixels.
///
/// Scanlines move by value between pipeline stages; a stage either forwards, replaces or
/// holds one, never shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanline {
    specification: PixelSpecification,
    bytes: Vec<u8>,
    width: usize,
}

impl Scanline {
    /// Zero-filled row of `width` pixels.
    pub fn new(specification: PixelSpecification, width: usize) -> Self {
        Self {
            specification,
            bytes: vec![0; usize::from(specification.bytes_per_pixel) * width],
            width,
        }
    }

    /// Wraps existing bytes; returns `None` when the length is not a whole number of pixels.
    pub fn from_bytes(specification: PixelSpecification, bytes: Vec<u8>) -> Option<Self> {
        let bytes_per_pixel = usize::from(specification.bytes_per_pixel);
        if bytes_per_pixel == 0 || bytes.len() % bytes_per_pixel != 0 {
            return None;
        }
        Some(Self {
            specification,
            width: bytes.len() / bytes_per_pixel,
            bytes,
        })
    }

    pub fn specification(&self) -> PixelSpecification {
        self.specification
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn pixel(&self, index: usize) -> &[u8] {
        let bytes_per_pixel = usize::from(self.specification.bytes_per_pixel);
        &self.bytes[index * bytes_per_pixel..(index + 1) * bytes_per_pixel]
    }

    pub fn pixel_mut(&mut self, index: usize) -> &mut [u8] {
        let bytes_per_pixel = usize::from(self.specification.bytes_per_pixel);
        &mut self.bytes[index * bytes_per_pixel..(index + 1) * bytes_per_pixel]
    }

    /// Copies pixel `from_index` of `self` into pixel `to_index` of `output`.
    pub fn copy_pixel_to(&self, from_index: usize, output: &mut Scanline, to_index: usize) {
        output.pixel_mut(to_index).copy_from_slice(self.pixel(from_index));
    }
}
