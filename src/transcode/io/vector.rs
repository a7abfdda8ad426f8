use crate::transcode::common::error::Result;
use crate::transcode::image::{PixelSpecification, Size, Specification};
use crate::transcode::io::sink::ImageSink;
use crate::transcode::io::source::{BitmapImageSource, ImageSource};

/// In-memory source.
#[derive(Debug, Clone, Default)]
pub struct VectorImageSource {
    data: Vec<u8>,
    position: usize,
}

impl VectorImageSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }
}

impl ImageSource for VectorImageSource {
    fn read(&mut self, destination: &mut [u8]) -> Result<usize> {
        let count = destination.len().min(self.data.len() - self.position);
        destination[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn total_bytes_read(&self) -> usize {
        self.position
    }

    fn available(&self) -> usize {
        self.data.len() - self.position
    }
}

/// In-memory scanline bytes with a known layout.
#[derive(Debug, Clone)]
pub struct VectorBitmapImageSource {
    source: VectorImageSource,
    specification: Specification,
}

impl VectorBitmapImageSource {
    pub fn new(data: Vec<u8>, specification: Specification) -> Self {
        Self {
            source: VectorImageSource::new(data),
            specification,
        }
    }
}

impl ImageSource for VectorBitmapImageSource {
    fn read(&mut self, destination: &mut [u8]) -> Result<usize> {
        self.source.read(destination)
    }

    fn total_bytes_read(&self) -> usize {
        self.source.total_bytes_read()
    }

    fn available(&self) -> usize {
        self.source.available()
    }

    fn bitmap_specification(&self) -> Option<Specification> {
        Some(self.image_specification())
    }
}

impl BitmapImageSource for VectorBitmapImageSource {
    fn image_specification(&self) -> Specification {
        self.specification.clone()
    }
}

/// In-memory sink.
#[derive(Debug, Clone, Default)]
pub struct VectorImageSink {
    data: Vec<u8>,
    configuration: Option<(Size, PixelSpecification)>,
}

impl VectorImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Layout announced by a bitmap compressor, if any.
    pub fn configuration(&self) -> Option<(Size, PixelSpecification)> {
        self.configuration
    }
}

impl ImageSink for VectorImageSink {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.data.extend_from_slice(data);
        Ok(())
    }

    fn total_bytes_written(&self) -> usize {
        self.data.len()
    }

    fn set_configuration(&mut self, size: Size, pixel_specification: PixelSpecification) {
        self.configuration = Some((size, pixel_specification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::image::{formats, specifications};

    #[test]
    fn source_reads_in_chunks() {
        let mut source = VectorImageSource::new(vec![1, 2, 3, 4, 5]);
        let mut buffer = [0u8; 2];

        assert_eq!(source.read(&mut buffer).unwrap(), 2);
        assert_eq!(source.available(), 3);
        assert_eq!(source.read(&mut buffer).unwrap(), 2);
        assert_eq!(source.read(&mut buffer).unwrap(), 1);
        assert_eq!(buffer[0], 5);
        assert_eq!(source.read(&mut buffer).unwrap(), 0);
        assert_eq!(source.total_bytes_read(), 5);
    }

    #[test]
    fn bitmap_source_exposes_specification() {
        let specification = Specification::new(
            Size::new(2, 1),
            formats::BITMAP,
            specifications::GRAY8,
        );
        let source = VectorBitmapImageSource::new(vec![0, 0], specification.clone());
        assert_eq!(source.bitmap_specification(), Some(specification));
    }

    #[test]
    fn sink_collects_writes() {
        let mut sink = VectorImageSink::new();
        sink.write(&[1, 2]).unwrap();
        sink.write(&[3]).unwrap();
        sink.set_configuration(Size::new(3, 1), specifications::GRAY8);

        assert_eq!(sink.total_bytes_written(), 3);
        assert_eq!(sink.data(), &[1, 2, 3]);
        assert_eq!(
            sink.configuration(),
            Some((Size::new(3, 1), specifications::GRAY8))
        );
    }
}
