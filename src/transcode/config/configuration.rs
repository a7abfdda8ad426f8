//! Transcoding configuration.
//!
//! Every property is optional. An unset property reads as its default through the
//! accessor, and [`Configuration::merge`] overlays only the properties that are set, so a
//! per-call configuration can override selected values of the base configuration.
//!
//! The jpeg, png and webp properties are not read in this crate; they exist for external
//! codec plugins.

use crate::transcode::image::{ChromaSamplingMode, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMethod {
    Bicubic,
    #[default]
    MagicKernel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSamplingModeOverride {
    #[default]
    None,
    S444,
    S420,
    S422,
}

impl ChromaSamplingModeOverride {
    pub fn mode(self) -> Option<ChromaSamplingMode> {
        match self {
            ChromaSamplingModeOverride::None => None,
            ChromaSamplingModeOverride::S444 => Some(ChromaSamplingMode::S444),
            ChromaSamplingModeOverride::S420 => Some(ChromaSamplingMode::S420),
            ChromaSamplingModeOverride::S422 => Some(ChromaSamplingMode::S422),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebpImageHint {
    #[default]
    Default,
    Picture,
    Photo,
    Graph,
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

fn overlay<T: Copy>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct General {
    pub interpret_metadata: Option<bool>,
    pub propagate_chroma_sampling_mode_from_source: Option<bool>,
    pub sampling_method: Option<SamplingMethod>,
    pub chroma_sampling_mode_override: Option<ChromaSamplingModeOverride>,
    pub default_background_color: Option<Color>,
}

impl General {
    /// Whether orientation may be deferred to output metadata.
    pub fn interpret_metadata(&self) -> bool {
        self.interpret_metadata.unwrap_or(true)
    }

    pub fn propagate_chroma_sampling_mode_from_source(&self) -> bool {
        self.propagate_chroma_sampling_mode_from_source.unwrap_or(true)
    }

    pub fn sampling_method(&self) -> SamplingMethod {
        self.sampling_method.unwrap_or_default()
    }

    pub fn chroma_sampling_mode_override(&self) -> ChromaSamplingModeOverride {
        self.chroma_sampling_mode_override.unwrap_or_default()
    }

    pub fn default_background_color(&self) -> Color {
        self.default_background_color.unwrap_or_default()
    }

    fn merge(&mut self, other: &General) {
        overlay(&mut self.interpret_metadata, other.interpret_metadata);
        overlay(
            &mut self.propagate_chroma_sampling_mode_from_source,
            other.propagate_chroma_sampling_mode_from_source,
        );
        overlay(&mut self.sampling_method, other.sampling_method);
        overlay(
            &mut self.chroma_sampling_mode_override,
            other.chroma_sampling_mode_override,
        );
        overlay(
            &mut self.default_background_color,
            other.default_background_color,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Jpeg {
    pub use_trellis: Option<bool>,
    pub use_progressive: Option<bool>,
    pub use_optimize_scan: Option<bool>,
    pub use_compatible_dc_scan_opt: Option<bool>,
    pub use_psnr_quant_table: Option<bool>,
    pub propagate_sampling_mode_from_source: Option<bool>,
}

impl Jpeg {
    pub fn use_trellis(&self) -> bool {
        self.use_trellis.unwrap_or(true)
    }

    pub fn use_progressive(&self) -> bool {
        self.use_progressive.unwrap_or(true)
    }

    pub fn use_optimize_scan(&self) -> bool {
        self.use_optimize_scan.unwrap_or(false)
    }

    pub fn use_compatible_dc_scan_opt(&self) -> bool {
        self.use_compatible_dc_scan_opt.unwrap_or(false)
    }

    pub fn use_psnr_quant_table(&self) -> bool {
        self.use_psnr_quant_table.unwrap_or(false)
    }

    pub fn propagate_sampling_mode_from_source(&self) -> bool {
        self.propagate_sampling_mode_from_source.unwrap_or(true)
    }

    fn merge(&mut self, other: &Jpeg) {
        overlay(&mut self.use_trellis, other.use_trellis);
        overlay(&mut self.use_progressive, other.use_progressive);
        overlay(&mut self.use_optimize_scan, other.use_optimize_scan);
        overlay(
            &mut self.use_compatible_dc_scan_opt,
            other.use_compatible_dc_scan_opt,
        );
        overlay(&mut self.use_psnr_quant_table, other.use_psnr_quant_table);
        overlay(
            &mut self.propagate_sampling_mode_from_source,
            other.propagate_sampling_mode_from_source,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Png {
    pub use_interlacing: Option<bool>,
    pub compression_level: Option<i32>,
}

impl Png {
    pub const COMPRESSION_LEVEL_DEFAULT: i32 = -1;

    pub fn use_interlacing(&self) -> bool {
        self.use_interlacing.unwrap_or(false)
    }

    pub fn compression_level(&self) -> i32 {
        self.compression_level
            .unwrap_or(Self::COMPRESSION_LEVEL_DEFAULT)
    }

    fn merge(&mut self, other: &Png) {
        overlay(&mut self.use_interlacing, other.use_interlacing);
        overlay(&mut self.compression_level, other.compression_level);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Webp {
    pub method: Option<u8>,
    pub image_hint: Option<WebpImageHint>,
}

impl Webp {
    pub fn method(&self) -> u8 {
        self.method.unwrap_or(3)
    }

    pub fn image_hint(&self) -> WebpImageHint {
        self.image_hint.unwrap_or_default()
    }

    fn merge(&mut self, other: &Webp) {
        overlay(&mut self.method, other.method);
        overlay(&mut self.image_hint, other.image_hint);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tiff {
    pub compression: Option<TiffCompression>,
    pub use_horizontal_predictor: Option<bool>,
}

impl Tiff {
    pub fn compression(&self) -> TiffCompression {
        self.compression.unwrap_or_default()
    }

    pub fn use_horizontal_predictor(&self) -> bool {
        self.use_horizontal_predictor.unwrap_or(false)
    }

    fn merge(&mut self, other: &Tiff) {
        overlay(&mut self.compression, other.compression);
        overlay(
            &mut self.use_horizontal_predictor,
            other.use_horizontal_predictor,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Raw {
    pub demosaic: Option<bool>,
}

impl Raw {
    pub fn demosaic(&self) -> bool {
        self.demosaic.unwrap_or(true)
    }

    fn merge(&mut self, other: &Raw) {
        overlay(&mut self.demosaic, other.demosaic);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Configuration {
    pub general: General,
    pub jpeg: Jpeg,
    pub png: Png,
    pub webp: Webp,
    pub tiff: Tiff,
    pub raw: Raw,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Overlays every property set in `other`.
    pub fn merge(&mut self, other: &Configuration) {
        self.general.merge(&other.general);
        self.jpeg.merge(&other.jpeg);
        self.png.merge(&other.png);
        self.webp.merge(&other.webp);
        self.tiff.merge(&other.tiff);
        self.raw.merge(&other.raw);
    }

    /// `self` with `overrides` merged on top.
    pub fn merged_with(&self, overrides: &Configuration) -> Configuration {
        let mut configuration = *self;
        configuration.merge(overrides);
        configuration
    }
}

/// Builder for Configuration
#[derive(Default)]
pub struct ConfigurationBuilder {
    interpret_metadata: Option<bool>,
    propagate_chroma_sampling_mode_from_source: Option<bool>,
    sampling_method: Option<SamplingMethod>,
    chroma_sampling_mode_override: Option<ChromaSamplingModeOverride>,
    default_background_color: Option<Color>,
    jpeg: Option<Jpeg>,
    png: Option<Png>,
    webp: Option<Webp>,
    tiff_compression: Option<TiffCompression>,
    tiff_horizontal_predictor: Option<bool>,
    raw_demosaic: Option<bool>,
}

impl ConfigurationBuilder {
    pub fn interpret_metadata(mut self, enable: bool) -> Self {
        self.interpret_metadata = Some(enable);
        self
    }

    pub fn propagate_chroma_sampling_mode_from_source(mut self, enable: bool) -> Self {
        self.propagate_chroma_sampling_mode_from_source = Some(enable);
        self
    }

    pub fn sampling_method(mut self, method: SamplingMethod) -> Self {
        self.sampling_method = Some(method);
        self
    }

    pub fn chroma_sampling_mode_override(mut self, mode: ChromaSamplingModeOverride) -> Self {
        self.chroma_sampling_mode_override = Some(mode);
        self
    }

    pub fn default_background_color(mut self, color: Color) -> Self {
        self.default_background_color = Some(color);
        self
    }

    pub fn jpeg(mut self, jpeg: Jpeg) -> Self {
        self.jpeg = Some(jpeg);
        self
    }

    pub fn png(mut self, png: Png) -> Self {
        self.png = Some(png);
        self
    }

    pub fn webp(mut self, webp: Webp) -> Self {
        self.webp = Some(webp);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn tiff_horizontal_predictor(mut self, enable: bool) -> Self {
        self.tiff_horizontal_predictor = Some(enable);
        self
    }

    pub fn raw_demosaic(mut self, enable: bool) -> Self {
        self.raw_demosaic = Some(enable);
        self
    }

    /// Unset properties stay unset so the result can still be merged over a base.
    pub fn build(self) -> Configuration {
        Configuration {
            general: General {
                interpret_metadata: self.interpret_metadata,
                propagate_chroma_sampling_mode_from_source: self
                    .propagate_chroma_sampling_mode_from_source,
                sampling_method: self.sampling_method,
                chroma_sampling_mode_override: self.chroma_sampling_mode_override,
                default_background_color: self.default_background_color,
            },
            jpeg: self.jpeg.unwrap_or_default(),
            png: self.png.unwrap_or_default(),
            webp: self.webp.unwrap_or_default(),
            tiff: Tiff {
                compression: self.tiff_compression,
                use_horizontal_predictor: self.tiff_horizontal_predictor,
            },
            raw: Raw {
                demosaic: self.raw_demosaic,
            },
        }
    }
}
