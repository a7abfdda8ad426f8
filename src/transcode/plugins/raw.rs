//! Camera RAW input through `rawloader`.
//!
//! Sensor values are normalised from the black/white levels to 8 bits. Mosaic sensors are
//! demosaiced with `bayer` into RGB unless the configuration asks for the bare mosaic, which
//! is then emitted as gray.

use std::io::Cursor;
use std::sync::Arc;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, warn};

use crate::transcode::codecs::{
    Decompressor, DecompressorProvider, FormatDetectorHandler, ensure_no_sampling_ratio,
};
use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::common::numeric::{checked_mul, to_u32};
use crate::transcode::config::Configuration;
use crate::transcode::core::plugin::Plugin;
use crate::transcode::image::{
    PixelSpecification, Ratio, Scanline, Size, Specification, formats, specifications,
};
use crate::transcode::io::{ImageSource, read_fully, read_to_end};

/// Little- and big-endian TIFF containers, shared by ARW, NEF, DNG and most other RAWs.
const TIFF_CONTAINER_HEADERS: [&[u8; 4]; 2] = [b"II*\0", b"MM\0*"];

/// Sensor samples as decoded, before any normalisation.
#[derive(Debug, Clone)]
pub struct SensorData {
    pub width: usize,
    pub height: usize,
    /// Components per pixel: 1 for a colour filter mosaic, 3 for linear RGB.
    pub cpp: usize,
    pub samples: Vec<u16>,
    pub black_level: u16,
    pub white_level: u16,
    pub cfa: CFA,
}

impl SensorData {
    fn decode(data: &[u8]) -> Result<Self> {
        debug!("Decoding RAW image, {} bytes", data.len());
        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|error| TranscodeError::DecompressorFailure(error.to_string()))?;
        debug!(
            "Decoded {} {}: {}x{} cpp={} cfa={}",
            decoded.make, decoded.model, decoded.width, decoded.height, decoded.cpp,
            decoded.cfa.name
        );

        // Float data is normalised to 0.0..=1.0
        let (samples, black_level, white_level) = match decoded.data {
            RawloaderImageData::Integer(values) => (
                values,
                decoded.blacklevels[0],
                decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX),
            ),
            RawloaderImageData::Float(values) => (
                values
                    .iter()
                    .map(|&value| (value.clamp(0.0, 1.0) * f32::from(u16::MAX)) as u16)
                    .collect(),
                0,
                u16::MAX,
            ),
        };

        Ok(Self {
            width: decoded.width,
            height: decoded.height,
            cpp: decoded.cpp,
            samples,
            black_level,
            white_level,
            cfa: bayer_cfa(&decoded.cfa.name),
        })
    }
}

fn bayer_cfa(name: &str) -> CFA {
    match name {
        "BGGR" => CFA::BGGR,
        "GBRG" => CFA::GBRG,
        "GRBG" => CFA::GRBG,
        "RGGB" => CFA::RGGB,
        other => {
            warn!("Unsupported colour filter '{}', assuming RGGB", other);
            CFA::RGGB
        }
    }
}

/// Maps `value` from `black..=white` onto `0..=255`.
fn normalize(value: u16, black: u16, white: u16) -> u8 {
    let range = u32::from(white.saturating_sub(black)).max(1);
    let value = u32::from(value.saturating_sub(black)).min(range);
    (value * 255 / range) as u8
}

fn demosaic(mosaic: &[u8], width: usize, height: usize, cfa: CFA) -> Result<Vec<u8>> {
    let mut rgb = vec![0u8; checked_mul(checked_mul(width, height)?, 3)?];
    let mut raster = RasterMut::new(width, height, RasterDepth::Depth8, &mut rgb);
    bayer::run_demosaic(
        &mut Cursor::new(mosaic),
        BayerDepth::Depth8,
        cfa,
        Demosaic::Linear,
        &mut raster,
    )
    .map_err(|error| TranscodeError::DecompressorFailure(format!("demosaic failed: {error:?}")))?;
    Ok(rgb)
}

/// Decodes the whole file up front and hands out rows.
pub struct RawDecompressor {
    specification: Specification,
    pixels: Vec<u8>,
    row_bytes: usize,
    next_row: u32,
}

impl RawDecompressor {
    pub fn new(
        source: &mut dyn ImageSource,
        sampling_ratio: Option<Ratio>,
        configuration: &Configuration,
    ) -> Result<Self> {
        ensure_no_sampling_ratio(sampling_ratio)?;
        let data = read_to_end(source)?;
        Self::from_sensor(SensorData::decode(&data)?, configuration.raw.demosaic())
    }

    pub fn from_sensor(sensor: SensorData, demosaic_mosaic: bool) -> Result<Self> {
        let pixel_count = checked_mul(sensor.width, sensor.height)?;
        ensure!(
            sensor.samples.len() >= checked_mul(pixel_count, sensor.cpp)?,
            "{} samples for a {}x{}x{} sensor",
            sensor.samples.len(),
            sensor.width,
            sensor.height,
            sensor.cpp
        );

        let normalized: Vec<u8> = sensor
            .samples
            .iter()
            .take(pixel_count * sensor.cpp)
            .map(|&value| normalize(value, sensor.black_level, sensor.white_level))
            .collect();

        let (pixel_specification, pixels): (PixelSpecification, Vec<u8>) = match sensor.cpp {
            1 if demosaic_mosaic => (
                specifications::RGB,
                demosaic(&normalized, sensor.width, sensor.height, sensor.cfa)?,
            ),
            1 => (specifications::GRAY8, normalized),
            3 => (specifications::RGB, normalized),
            cpp => {
                return Err(TranscodeError::DecompressorFailure(format!(
                    "{cpp} components per pixel"
                )));
            }
        };

        let size = Size::new(to_u32(sensor.width)?, to_u32(sensor.height)?);
        debug!("RAW output {} {}", size, pixel_specification);
        Ok(Self {
            specification: Specification::new(size, formats::RAW, pixel_specification),
            row_bytes: size.row_bytes(pixel_specification.bytes_per_pixel)?,
            pixels,
            next_row: 0,
        })
    }

    pub fn provider() -> DecompressorProvider {
        DecompressorProvider::new(formats::RAW, |source, sampling_ratio, configuration| {
            Ok(Box::new(RawDecompressor::new(
                source,
                sampling_ratio,
                configuration,
            )?))
        })
    }
}

impl Decompressor for RawDecompressor {
    fn source_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn output_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn read_scanline(&mut self) -> Result<Option<Scanline>> {
        if self.next_row >= self.specification.size.height {
            return Ok(None);
        }
        let start = checked_mul(self.next_row as usize, self.row_bytes)?;
        let row = self.pixels[start..start + self.row_bytes].to_vec();
        self.next_row += 1;
        Scanline::from_bytes(self.specification.pixel_specification, row)
            .map(Some)
            .ok_or_else(|| TranscodeError::DecompressorFailure("truncated RAW row".into()))
    }
}

/// Claims TIFF containers as RAW.
pub fn tiff_container_handler() -> FormatDetectorHandler {
    Arc::new(|source: &mut dyn ImageSource| {
        let mut header = [0u8; 4];
        let read = read_fully(source, &mut header)?;
        let matches = read == header.len() && TIFF_CONTAINER_HEADERS.contains(&&header);
        Ok(matches.then_some(formats::RAW))
    })
}

/// RAW input; RAW to RAW is served by the built-in copy rule.
pub fn plugin() -> Plugin {
    Plugin::new()
        .with_decompressor_provider(RawDecompressor::provider())
        .with_format_detector_handler(tiff_container_handler())
}
