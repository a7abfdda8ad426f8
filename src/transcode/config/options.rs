use crate::transcode::config::configuration::Configuration;
use crate::transcode::image::{Format, Metadata, PixelSpecification, formats};
use crate::transcode::requirements::{Crop, Encode, Resize, Rotate};

/// Geometric changes the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transformations {
    pub resize: Option<Resize>,
    pub rotate: Option<Rotate>,
    pub crop: Option<Crop>,
}

impl Transformations {
    pub fn is_empty(&self) -> bool {
        self.resize.is_none() && self.rotate.is_none() && self.crop.is_none()
    }
}

/// Per-call options.
///
/// Without an encode requirement the output is a bitmap, which is how decode and
/// transform calls are expressed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    pub encode_requirement: Option<Encode>,
    pub transformations: Transformations,
    /// Extra metadata merged into the output, winning over input entries.
    pub metadata: Option<Metadata>,
    pub configuration: Configuration,
    pub output_pixel_specification_requirement: Option<PixelSpecification>,
}

impl Options {
    /// Encoded input to bitmap output.
    pub fn decode() -> Self {
        Self::default()
    }

    /// Bitmap input to encoded output.
    pub fn encode(encode: Encode) -> Self {
        Self {
            encode_requirement: Some(encode),
            ..Self::default()
        }
    }

    /// Encoded input to encoded output.
    pub fn transcode(encode: Encode) -> Self {
        Self::encode(encode)
    }

    /// Bitmap input to bitmap output.
    pub fn transform() -> Self {
        Self::default()
    }

    pub fn output_format(&self) -> Format {
        self.encode_requirement
            .map(|encode| encode.format)
            .unwrap_or(formats::BITMAP)
    }

    pub fn with_resize(mut self, resize: Resize) -> Self {
        self.transformations.resize = Some(resize);
        self
    }

    pub fn with_rotate(mut self, rotate: Rotate) -> Self {
        self.transformations.rotate = Some(rotate);
        self
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.transformations.crop = Some(crop);
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn with_output_pixel_specification(mut self, specification: PixelSpecification) -> Self {
        self.output_pixel_specification_requirement = Some(specification);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_defaults_to_bitmap() {
        assert_eq!(Options::decode().output_format(), formats::BITMAP);
        assert_eq!(
            Options::transcode(Encode::new(formats::PNG)).output_format(),
            formats::PNG
        );
    }
}
