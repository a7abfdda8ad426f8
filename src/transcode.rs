//! Image transcoding core.
//!
//! A [`Transcoder`] is assembled once from plugins and a base [`Configuration`]. Each call
//! detects (or is given) the input specification, picks the first rule able to serve the
//! request and runs its recipe: a byte copy, or a scanline pipeline between a decompressor
//! and a compressor.

pub mod codecs;
pub mod common;
pub mod config;
pub mod core;
pub mod image;
pub mod io;
pub mod plugins;
pub mod requirements;
pub mod transcoder;

pub use common::error::{Result, TranscodeError};
pub use config::{Configuration, Options, Transformations};
pub use self::core::plugin::Plugin;
pub use image::{Format, PixelSpecification, Size, Specification, formats, specifications};
pub use transcoder::{TranscodeResult, Transcoder};
