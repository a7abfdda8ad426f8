use std::time::Duration;

use tracing::{debug, info, info_span, instrument};

use crate::transcode::codecs::Repository;
use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::common::timing::{StepTimings, Timer};
use crate::transcode::config::{Configuration, Options};
use crate::transcode::core::operation_builder::OperationBuilder;
use crate::transcode::core::plugin::{self, Plugin};
use crate::transcode::core::rule_matcher::RuleMatcher;
use crate::transcode::image::Specification;
use crate::transcode::io::{BitmapImageSource, ImageSink, ImageSource, RewindableImageSource};
use crate::transcode::plugins;

/// Outcome of one call.
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    pub rule_name: String,
    pub input_image_specification: Specification,
    pub output_image_specification: Specification,
    pub total_bytes_read: usize,
    pub total_bytes_written: usize,
    pub duration: Duration,
    pub timings: StepTimings,
}

/// Entry point: a frozen set of rules, codecs and format detectors plus a base
/// configuration that per-call options are merged over.
pub struct Transcoder {
    rule_matcher: RuleMatcher,
    operation_builder: OperationBuilder,
}

impl Transcoder {
    pub fn new(plugins: Vec<Plugin>, configuration: Configuration) -> Self {
        let Plugin {
            rules,
            compressor_providers,
            decompressor_providers,
            format_detector_handlers,
        } = plugin::aggregate(plugins);

        let mut repository = Repository::new();
        for provider in compressor_providers {
            repository.add_compressor_provider(provider);
        }
        for provider in decompressor_providers {
            repository.add_decompressor_provider(provider);
        }

        Self {
            rule_matcher: RuleMatcher::new(rules),
            operation_builder: OperationBuilder::new(
                configuration,
                repository,
                format_detector_handlers,
            ),
        }
    }

    /// Transcoder with every bundled plugin registered.
    pub fn with_bundled_plugins(configuration: Configuration) -> Self {
        Self::new(plugins::all(), configuration)
    }

    pub fn rule_matcher(&self) -> &RuleMatcher {
        &self.rule_matcher
    }

    pub fn repository(&self) -> &Repository {
        self.operation_builder.repository()
    }

    /// Encoded image to encoded image.
    #[instrument(skip_all, fields(output_format = %options.output_format()))]
    pub fn transcode(
        &self,
        source: &mut dyn ImageSource,
        sink: &mut dyn ImageSink,
        options: &Options,
    ) -> Result<TranscodeResult> {
        require_encode(options, true)?;
        self.run_encoded(source, sink, options)
    }

    /// Encoded image to bitmap.
    #[instrument(skip_all)]
    pub fn decode(
        &self,
        source: &mut dyn ImageSource,
        sink: &mut dyn ImageSink,
        options: &Options,
    ) -> Result<TranscodeResult> {
        require_encode(options, false)?;
        self.run_encoded(source, sink, options)
    }

    /// Bitmap to encoded image.
    #[instrument(skip_all, fields(output_format = %options.output_format()))]
    pub fn encode<S: BitmapImageSource>(
        &self,
        source: &mut S,
        sink: &mut dyn ImageSink,
        options: &Options,
    ) -> Result<TranscodeResult> {
        require_encode(options, true)?;
        let input = source.image_specification();
        self.run(source, sink, input, options, StepTimings::new())
    }

    /// Bitmap to bitmap.
    #[instrument(skip_all)]
    pub fn transform<S: BitmapImageSource>(
        &self,
        source: &mut S,
        sink: &mut dyn ImageSink,
        options: &Options,
    ) -> Result<TranscodeResult> {
        require_encode(options, false)?;
        let input = source.image_specification();
        self.run(source, sink, input, options, StepTimings::new())
    }

    fn run_encoded(
        &self,
        source: &mut dyn ImageSource,
        sink: &mut dyn ImageSink,
        options: &Options,
    ) -> Result<TranscodeResult> {
        if source.available() < 1 {
            return Err(TranscodeError::EmptyInputSource);
        }

        let mut timings = StepTimings::new();
        let mut source = RewindableImageSource::new(source);

        let timer = Timer::start("detect");
        let input = self.operation_builder.detect(&mut source, options)?;
        timings.record(timer);

        self.run(&mut source, sink, input, options, timings)
    }

    fn run(
        &self,
        source: &mut dyn ImageSource,
        sink: &mut dyn ImageSink,
        input: Specification,
        options: &Options,
        mut timings: StepTimings,
    ) -> Result<TranscodeResult> {
        info!(input = %input, "Starting transcode");

        let timer = Timer::start("build_operation");
        let mut operation = self
            .operation_builder
            .build(source, sink, input.clone(), options)?;
        timings.record(timer);

        let timer = Timer::start("match_rule");
        let rule = {
            let _span = info_span!("match_rule").entered();
            self.rule_matcher
                .find_first_matching(&operation.parameters)?
        };
        timings.record(timer);
        debug!(rule = %rule.name, "Selected rule");

        let timer = Timer::start("perform");
        let output = {
            let _span = info_span!("perform", rule = %rule.name).entered();
            rule.make_recipe().perform(&mut operation)?
        };
        timings.record(timer);

        let result = TranscodeResult {
            rule_name: rule.name.clone(),
            input_image_specification: input,
            output_image_specification: output,
            total_bytes_read: operation.io.source.total_bytes_read(),
            total_bytes_written: operation.io.sink.total_bytes_written(),
            duration: timings.total_duration(),
            timings,
        };
        result.timings.log_summary();
        info!(
            rule = %result.rule_name,
            output = %result.output_image_specification,
            bytes_read = result.total_bytes_read,
            bytes_written = result.total_bytes_written,
            "Transcode complete"
        );
        Ok(result)
    }
}

/// Encoding entry points need an encode requirement; bitmap-output ones must not have one.
fn require_encode(options: &Options, expected: bool) -> Result<()> {
    match (options.encode_requirement.is_some(), expected) {
        (true, false) => Err(TranscodeError::InvalidRequirement(
            "bitmap output does not take an encode requirement".into(),
        )),
        (false, true) => Err(TranscodeError::InvalidRequirement(
            "encoded output needs an encode requirement".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests;
