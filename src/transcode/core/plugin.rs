use tracing::debug;

use crate::transcode::codecs::{
    BitmapCompressor, BitmapDecompressor, CompressorProvider, DecompressorProvider,
    FormatDetectorHandler, default_handlers,
};
use crate::transcode::core::recipes::{BaseRecipe, CopyRecipe};
use crate::transcode::core::rule::Rule;

/// Rules, codecs and format detectors contributed as one unit.
#[derive(Clone, Default)]
pub struct Plugin {
    pub rules: Vec<Rule>,
    pub compressor_providers: Vec<CompressorProvider>,
    pub decompressor_providers: Vec<DecompressorProvider>,
    pub format_detector_handlers: Vec<FormatDetectorHandler>,
}

impl Plugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_compressor_provider(mut self, provider: CompressorProvider) -> Self {
        self.compressor_providers.push(provider);
        self
    }

    pub fn with_decompressor_provider(mut self, provider: DecompressorProvider) -> Self {
        self.decompressor_providers.push(provider);
        self
    }

    pub fn with_format_detector_handler(mut self, handler: FormatDetectorHandler) -> Self {
        self.format_detector_handlers.push(handler);
        self
    }

    /// Appends everything `other` contributes after what is already registered.
    pub fn insert(&mut self, other: Plugin) {
        self.rules.extend(other.rules);
        self.compressor_providers.extend(other.compressor_providers);
        self.decompressor_providers
            .extend(other.decompressor_providers);
        self.format_detector_handlers
            .extend(other.format_detector_handlers);
    }
}

/// The built-in plugin (copy rule, bitmap codecs, standard format detectors), followed by
/// `plugins` in order, with the catch-all base rule last.
pub fn aggregate(plugins: Vec<Plugin>) -> Plugin {
    let mut aggregate = Plugin::new()
        .with_rule(CopyRecipe::rule())
        .with_compressor_provider(BitmapCompressor::provider())
        .with_decompressor_provider(BitmapDecompressor::provider());
    aggregate.format_detector_handlers = default_handlers();

    for plugin in plugins {
        aggregate.insert(plugin);
    }
    aggregate.rules.push(BaseRecipe::rule());

    debug!(
        rules = ?aggregate.rules.iter().map(|rule| rule.name.as_str()).collect::<Vec<_>>(),
        compressors = aggregate.compressor_providers.len(),
        decompressors = aggregate.decompressor_providers.len(),
        detectors = aggregate.format_detector_handlers.len(),
        "Aggregated plugins"
    );
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::core::recipes::Recipe;
    use crate::transcode::core::operation::Operation;
    use crate::transcode::common::error::Result;
    use crate::transcode::image::Specification;

    struct NoopRecipe;

    impl Recipe for NoopRecipe {
        fn perform(&self, operation: &mut Operation<'_>) -> Result<Specification> {
            Ok(operation.parameters.input_image_specification.clone())
        }
    }

    #[test]
    fn built_ins_first_base_last() {
        let plugin = Plugin::new()
            .with_rule(Rule::new("custom", || Box::new(NoopRecipe)))
            .with_format_detector_handler(default_handlers()[0].clone());
        let aggregate = aggregate(vec![plugin]);

        let names: Vec<_> = aggregate.rules.iter().map(|rule| rule.name.as_str()).collect();
        assert_eq!(names, vec!["copy", "custom", "base"]);
        assert_eq!(
            aggregate.format_detector_handlers.len(),
            default_handlers().len() + 1
        );
        assert_eq!(aggregate.compressor_providers.len(), 1);
        assert_eq!(aggregate.decompressor_providers.len(), 1);
    }

    #[test]
    fn empty_aggregate_still_has_copy_and_base() {
        let names: Vec<_> = aggregate(Vec::new())
            .rules
            .iter()
            .map(|rule| rule.name.clone())
            .collect();
        assert_eq!(names, vec!["copy", "base"]);
    }
}
