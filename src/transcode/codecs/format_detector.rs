use std::sync::Arc;

use tracing::{debug, trace};

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::{Format, formats};
use crate::transcode::io::{ImageSource, RewindableImageSource, read_fully};

/// Peeks at a source and claims it for a format.
///
/// Handlers run against a rewound source; the bytes they read are replayed for the next one.
pub type FormatDetectorHandler =
    Arc<dyn Fn(&mut dyn ImageSource) -> Result<Option<Format>> + Send + Sync>;

mod headers {
    pub const JPEG: &[u8] = b"\xFF\xD8\xFF";
    pub const PNG: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A";
    pub const GIF87A: &[u8] = b"GIF87a";
    pub const GIF89A: &[u8] = b"GIF89a";
    pub const RIFF: &[u8] = b"RIFF";
    pub const RIFF_WEBP_VP8: &[u8] = b"WEBPVP8 ";
    pub const RIFF_WEBP_VP8L: &[u8] = b"WEBPVP8L";
    pub const RIFF_WEBP_VP8X: &[u8] = b"WEBPVP8X";
}

const HEIF_BRANDS: [&[u8; 4]; 6] = [b"mif1", b"msf1", b"heic", b"heix", b"hevc", b"hevx"];
const HEIF_MAX_FTYP_BOX_SIZE: u32 = 64;

/// Handler matching a fixed prefix.
pub fn simple_handler(header: &'static [u8], format: Format) -> Result<FormatDetectorHandler> {
    if header.is_empty() {
        return Err(TranscodeError::FormatDetectorEmptyHeader);
    }
    Ok(prefix_handler(header, format))
}

fn prefix_handler(header: &'static [u8], format: Format) -> FormatDetectorHandler {
    Arc::new(move |source: &mut dyn ImageSource| {
        let mut buffer = vec![0u8; header.len()];
        let read = read_fully(source, &mut buffer)?;
        Ok((read == header.len() && buffer == header).then_some(format))
    })
}

/// Handler matching `RIFF`, four size bytes, then `sub_header`.
fn riff_handler(sub_header: &'static [u8], format: Format) -> FormatDetectorHandler {
    let sub_header_offset = headers::RIFF.len() + 4;
    let total = sub_header_offset + sub_header.len();
    Arc::new(move |source: &mut dyn ImageSource| {
        let mut buffer = vec![0u8; total];
        let read = read_fully(source, &mut buffer)?;
        let matches = read == total
            && buffer.starts_with(headers::RIFF)
            && &buffer[sub_header_offset..] == sub_header;
        Ok(matches.then_some(format))
    })
}

/// Major and compatible brands of a leading ISO-BMFF `ftyp` box.
fn parse_ftyp_brands(source: &mut dyn ImageSource, max_box_size: u32) -> Option<Vec<[u8; 4]>> {
    let mut header = [0u8; 8];
    if read_fully(source, &mut header).ok()? != header.len() {
        return None;
    }
    let size = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    // 0 (to end of file) and 1 (64-bit size) are never used for ftyp in practice.
    if !(16..=max_box_size).contains(&size) || &header[4..8] != b"ftyp" {
        return None;
    }

    let mut body = vec![0u8; (size - 8) as usize];
    if read_fully(source, &mut body).ok()? != body.len() {
        return None;
    }
    if body.len() % 4 != 0 {
        return None;
    }

    // major brand, minor version, then compatible brands
    let mut brands = vec![[body[0], body[1], body[2], body[3]]];
    brands.extend(
        body[8..]
            .chunks_exact(4)
            .map(|brand| [brand[0], brand[1], brand[2], brand[3]]),
    );
    Some(brands)
}

fn heif_handler() -> FormatDetectorHandler {
    Arc::new(|source: &mut dyn ImageSource| {
        let is_heif = parse_ftyp_brands(source, HEIF_MAX_FTYP_BOX_SIZE)
            .is_some_and(|brands| brands.iter().any(|brand| HEIF_BRANDS.contains(&brand)));
        Ok(is_heif.then_some(formats::HEIF))
    })
}

/// Handlers for every format recognised out of the box, in detection order.
pub fn default_handlers() -> Vec<FormatDetectorHandler> {
    vec![
        prefix_handler(headers::JPEG, formats::JPEG),
        prefix_handler(headers::GIF87A, formats::GIF),
        prefix_handler(headers::GIF89A, formats::GIF),
        prefix_handler(headers::PNG, formats::PNG),
        riff_handler(headers::RIFF_WEBP_VP8, formats::WEBP),
        riff_handler(headers::RIFF_WEBP_VP8L, formats::WEBP),
        riff_handler(headers::RIFF_WEBP_VP8X, formats::WEBP),
        heif_handler(),
    ]
}

/// Runs handlers in order and returns the first claimed format.
#[derive(Clone, Default)]
pub struct FormatDetector {
    handlers: Vec<FormatDetectorHandler>,
}

impl FormatDetector {
    pub fn new(handlers: Vec<FormatDetectorHandler>) -> Self {
        Self { handlers }
    }

    pub fn detect(&self, source: &mut RewindableImageSource<'_>) -> Result<Format> {
        for (index, handler) in self.handlers.iter().enumerate() {
            source.mark();
            let view: &mut dyn ImageSource = &mut *source;
            let detected = handler(view);
            source.reset()?;

            if let Some(format) = detected? {
                debug!("Detected format {} (handler {})", format, index);
                return Ok(format);
            }
            trace!("Format handler {} did not match", index);
        }
        Err(TranscodeError::FormatNotDetected)
    }
}
