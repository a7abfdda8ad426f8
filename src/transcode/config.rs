//! Configuration and per-call options.

pub mod configuration;
pub mod options;

pub use configuration::{
    ChromaSamplingModeOverride, Configuration, ConfigurationBuilder, General, Jpeg, Png, Raw,
    SamplingMethod, Tiff, TiffCompression, Webp, WebpImageHint,
};
pub use options::{Options, Transformations};
