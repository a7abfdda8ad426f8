use tracing::debug;

use crate::transcode::codecs::{FormatDetectorHandler, Repository, SpecificationDetector};
use crate::transcode::common::error::Result;
use crate::transcode::config::{Configuration, Options};
use crate::transcode::core::operation::{Codecs, Io, Operation, Parameters};
use crate::transcode::image::Specification;
use crate::transcode::io::{ImageSink, ImageSource, RewindableImageSource};

/// Turns caller options into a ready-to-run [`Operation`].
pub struct OperationBuilder {
    configuration: Configuration,
    repository: Repository,
    format_detector_handlers: Vec<FormatDetectorHandler>,
}

impl OperationBuilder {
    pub fn new(
        configuration: Configuration,
        repository: Repository,
        format_detector_handlers: Vec<FormatDetectorHandler>,
    ) -> Self {
        Self {
            configuration,
            repository,
            format_detector_handlers,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Specification of an encoded source; the source is rewound afterwards.
    pub fn detect(
        &self,
        source: &mut RewindableImageSource<'_>,
        options: &Options,
    ) -> Result<Specification> {
        SpecificationDetector::new(
            &self.repository,
            self.configuration,
            self.format_detector_handlers.clone(),
        )
        .detect(source, options)
    }

    pub fn build<'a>(
        &self,
        source: &'a mut dyn ImageSource,
        sink: &'a mut dyn ImageSink,
        input_image_specification: Specification,
        options: &Options,
    ) -> Result<Operation<'a>> {
        let output_image_format = options.output_format();
        let codecs = Codecs {
            decompressor_provider: self
                .repository
                .decompressor_provider(&input_image_specification.format)?
                .clone(),
            compressor_provider: self
                .repository
                .compressor_provider(&output_image_format)?
                .clone(),
        };
        debug!(
            input = %input_image_specification.format,
            output = %output_image_format,
            "Resolved codec providers"
        );

        let parameters = Parameters {
            input_image_specification,
            output_image_format,
            transformations: options.transformations,
            encode_requirement: options.encode_requirement,
            extra_metadata: options.metadata.clone(),
            output_pixel_specification_requirement: options
                .output_pixel_specification_requirement,
        };

        Ok(Operation {
            io: Io { source, sink },
            codecs,
            parameters,
            configuration: self.configuration.merged_with(&options.configuration),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::codecs::{BitmapCompressor, BitmapDecompressor};
    use crate::transcode::common::error::TranscodeError;
    use crate::transcode::config::SamplingMethod;
    use crate::transcode::image::{Size, formats, specifications};
    use crate::transcode::io::{VectorBitmapImageSource, VectorImageSink};
    use crate::transcode::requirements::{Encode, Resize};

    fn builder() -> OperationBuilder {
        let mut repository = Repository::new();
        repository.add_compressor_provider(BitmapCompressor::provider());
        repository.add_decompressor_provider(BitmapDecompressor::provider());
        let configuration = Configuration::builder()
            .sampling_method(SamplingMethod::Bicubic)
            .interpret_metadata(false)
            .build();
        OperationBuilder::new(configuration, repository, Vec::new())
    }

    fn bitmap() -> Specification {
        Specification::new(Size::new(4, 4), formats::BITMAP, specifications::RGB)
    }

    #[test]
    fn per_call_configuration_overrides_base() {
        let builder = builder();
        let mut source = VectorBitmapImageSource::new(vec![0; 48], bitmap());
        let mut sink = VectorImageSink::new();
        let options = Options::transform()
            .with_resize(Resize::exact(Size::new(2, 2)))
            .with_configuration(
                Configuration::builder()
                    .sampling_method(SamplingMethod::MagicKernel)
                    .build(),
            );

        let operation = builder
            .build(&mut source, &mut sink, bitmap(), &options)
            .unwrap();

        assert_eq!(
            operation.configuration.general.sampling_method(),
            SamplingMethod::MagicKernel
        );
        assert!(!operation.configuration.general.interpret_metadata());
        assert_eq!(operation.parameters.output_image_format, formats::BITMAP);
        assert_eq!(
            operation.parameters.transformations.resize,
            Some(Resize::exact(Size::new(2, 2)))
        );
        assert_eq!(operation.codecs.compressor_provider.format, formats::BITMAP);
    }

    #[test]
    fn unknown_output_format_fails() {
        let builder = builder();
        let mut source = VectorBitmapImageSource::new(vec![0; 48], bitmap());
        let mut sink = VectorImageSink::new();
        let options = Options::encode(Encode::new(formats::PNG));

        assert!(matches!(
            builder.build(&mut source, &mut sink, bitmap(), &options),
            Err(TranscodeError::CompressorNotFound(format)) if format == formats::PNG
        ));
    }

    #[test]
    fn unknown_input_format_fails() {
        let builder = builder();
        let input = Specification::new(Size::new(4, 4), formats::JPEG, specifications::RGB);
        let mut source = VectorBitmapImageSource::new(vec![0; 48], bitmap());
        let mut sink = VectorImageSink::new();

        assert!(matches!(
            builder.build(&mut source, &mut sink, input, &Options::decode()),
            Err(TranscodeError::DecompressorNotFound(format)) if format == formats::JPEG
        ));
    }
}
