use std::fmt;

use crate::transcode::image::format::Format;
use crate::transcode::image::geometry::Size;
use crate::transcode::image::metadata::Metadata;
use crate::transcode::image::orientation::Orientation;
use crate::transcode::image::pixel::PixelSpecification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaSamplingMode {
    S444,
    S420,
    S422,
    S411,
    S440,
}

impl ChromaSamplingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChromaSamplingMode::S444 => "444",
            ChromaSamplingMode::S420 => "420",
            ChromaSamplingMode::S422 => "422",
            ChromaSamplingMode::S411 => "411",
            ChromaSamplingMode::S440 => "440",
        }
    }
}

impl fmt::Display for ChromaSamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything known about an image besides its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    pub size: Size,
    pub format: Format,
    pub pixel_specification: PixelSpecification,
    pub orientation: Orientation,
    pub chroma_sampling_mode: Option<ChromaSamplingMode>,
    pub metadata: Metadata,
}

impl Specification {
    pub fn new(size: Size, format: Format, pixel_specification: PixelSpecification) -> Self {
        Self {
            size,
            format,
            pixel_specification,
            orientation: Orientation::Up,
            chroma_sampling_mode: None,
            metadata: Metadata::empty(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_chroma_sampling_mode(mut self, mode: ChromaSamplingMode) -> Self {
        self.chroma_sampling_mode = Some(mode);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} orientation={}",
            self.format, self.size, self.pixel_specification, self.orientation
        )
    }
}
