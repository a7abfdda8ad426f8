use tracing::{debug, info_span};

use crate::transcode::codecs::format_detector::{FormatDetector, FormatDetectorHandler};
use crate::transcode::codecs::repository::Repository;
use crate::transcode::common::error::Result;
use crate::transcode::config::{Configuration, Options};
use crate::transcode::image::Specification;
use crate::transcode::io::RewindableImageSource;

/// Reads the specification of an encoded source without consuming it.
///
/// The format is detected first, then that format's decompressor is built just far enough
/// to parse the header. The source is rewound afterwards.
pub struct SpecificationDetector<'r> {
    repository: &'r Repository,
    configuration: Configuration,
    format_detector: FormatDetector,
}

impl<'r> SpecificationDetector<'r> {
    pub fn new(
        repository: &'r Repository,
        configuration: Configuration,
        handlers: Vec<FormatDetectorHandler>,
    ) -> Self {
        Self {
            repository,
            configuration,
            format_detector: FormatDetector::new(handlers),
        }
    }

    pub fn detect(
        &self,
        source: &mut RewindableImageSource<'_>,
        options: &Options,
    ) -> Result<Specification> {
        let _span = info_span!("detect").entered();

        let format = self.format_detector.detect(source)?;
        let provider = self.repository.decompressor_provider(&format)?;
        let configuration = self.configuration.merged_with(&options.configuration);

        source.mark();
        let specification = {
            let decompressor = provider.make(source, None, &configuration)?;
            decompressor.output_image_specification()
        };
        source.reset()?;

        debug!("Detected input specification {}", specification);
        Ok(specification)
    }
}
