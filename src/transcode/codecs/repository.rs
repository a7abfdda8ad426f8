use tracing::debug;

use crate::transcode::codecs::provider::{CompressorProvider, DecompressorProvider};
use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::Format;

/// Format to provider lookup.
///
/// Registering a provider for a format that already has one replaces it in place, so the
/// last registration wins while lookup order stays registration order.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    compressor_providers: Vec<CompressorProvider>,
    decompressor_providers: Vec<DecompressorProvider>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_compressor_provider(&mut self, provider: CompressorProvider) {
        match self
            .compressor_providers
            .iter_mut()
            .find(|existing| existing.format == provider.format)
        {
            Some(existing) => {
                debug!("Replacing compressor provider for {}", provider.format);
                *existing = provider;
            }
            None => self.compressor_providers.push(provider),
        }
    }

    pub fn add_decompressor_provider(&mut self, provider: DecompressorProvider) {
        match self
            .decompressor_providers
            .iter_mut()
            .find(|existing| existing.format == provider.format)
        {
            Some(existing) => {
                debug!("Replacing decompressor provider for {}", provider.format);
                *existing = provider;
            }
            None => self.decompressor_providers.push(provider),
        }
    }

    pub fn compressor_provider(&self, format: &Format) -> Result<&CompressorProvider> {
        self.compressor_providers
            .iter()
            .find(|provider| provider.format == *format)
            .ok_or(TranscodeError::CompressorNotFound(*format))
    }

    pub fn decompressor_provider(&self, format: &Format) -> Result<&DecompressorProvider> {
        self.decompressor_providers
            .iter()
            .find(|provider| provider.format == *format)
            .ok_or(TranscodeError::DecompressorNotFound(*format))
    }

    pub fn compressor_providers(&self) -> &[CompressorProvider] {
        &self.compressor_providers
    }

    pub fn decompressor_providers(&self) -> &[DecompressorProvider] {
        &self.decompressor_providers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::codecs::Compressor;
    use crate::transcode::image::{ChromaSamplingMode, Ratio, Scanline, formats};

    struct NullCompressor;

    impl Compressor for NullCompressor {
        fn write_scanline(&mut self, _scanline: Scanline) -> Result<()> {
            Ok(())
        }
    }

    fn compressor_provider(format: Format, marker: ChromaSamplingMode) -> CompressorProvider {
        CompressorProvider::new(format, |_options| Ok(Box::new(NullCompressor)))
            .with_chroma_sampling_modes(vec![marker])
    }

    fn decompressor_provider(format: Format, marker: u32) -> DecompressorProvider {
        DecompressorProvider::new(format, |_source, _ratio, _configuration| {
            Err(TranscodeError::DecompressorFailure("unused".into()))
        })
        .with_sampling_ratios(vec![Ratio::new(1, marker)])
    }

    #[test]
    fn finds_registered_format_among_many() {
        let mut repository = Repository::new();
        repository.add_compressor_provider(compressor_provider(
            formats::JPEG,
            ChromaSamplingMode::S420,
        ));
        repository.add_compressor_provider(compressor_provider(
            formats::PNG,
            ChromaSamplingMode::S444,
        ));
        repository.add_compressor_provider(compressor_provider(
            formats::WEBP,
            ChromaSamplingMode::S422,
        ));

        let provider = repository.compressor_provider(&formats::PNG).unwrap();
        assert_eq!(provider.format, formats::PNG);
        assert_eq!(
            provider.supported_chroma_sampling_modes,
            vec![ChromaSamplingMode::S444]
        );
    }

    #[test]
    fn lookup_is_independent_of_registration_order() {
        let mut repository = Repository::new();
        repository.add_decompressor_provider(decompressor_provider(formats::WEBP, 3));
        repository.add_decompressor_provider(decompressor_provider(formats::PNG, 2));
        repository.add_decompressor_provider(decompressor_provider(formats::JPEG, 1));

        let provider = repository.decompressor_provider(&formats::PNG).unwrap();
        assert_eq!(provider.supported_sampling_ratios, vec![Ratio::new(1, 2)]);
    }

    #[test]
    fn last_registration_wins_for_duplicate_format() {
        let mut repository = Repository::new();
        repository.add_compressor_provider(compressor_provider(
            formats::JPEG,
            ChromaSamplingMode::S420,
        ));
        repository.add_compressor_provider(compressor_provider(
            formats::PNG,
            ChromaSamplingMode::S444,
        ));
        repository.add_compressor_provider(compressor_provider(
            formats::JPEG,
            ChromaSamplingMode::S411,
        ));

        assert_eq!(repository.compressor_providers().len(), 2);
        let provider = repository.compressor_provider(&formats::JPEG).unwrap();
        assert_eq!(
            provider.supported_chroma_sampling_modes,
            vec![ChromaSamplingMode::S411]
        );
    }

    #[test]
    fn missing_format_names_it() {
        let repository = Repository::new();
        let err = repository.compressor_provider(&formats::GIF).unwrap_err();
        assert!(matches!(err, TranscodeError::CompressorNotFound(format) if format == formats::GIF));
        assert_eq!(err.name(), "codec_repo_compressor_not_found");

        let err = repository.decompressor_provider(&formats::HEIF).unwrap_err();
        assert!(matches!(err, TranscodeError::DecompressorNotFound(_)));
    }
}
