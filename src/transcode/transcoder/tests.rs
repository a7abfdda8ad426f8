use std::io::Cursor;

use super::*;
use crate::transcode::codecs::{
    CompressorProvider, Decompressor, DecompressorProvider, simple_handler,
};
use crate::transcode::image::{
    ChromaSamplingMode, Format, Rect, Scanline, Size, formats, specifications,
};
use crate::transcode::io::{
    FileImageSink, VectorBitmapImageSource, VectorImageSink, VectorImageSource, read_fully,
};
use crate::transcode::requirements::{Crop, Encode, EncodeMode, RelativeEdges, Resize, Rotate};

const FAKE: Format = Format::encoded("fake");

/// Header of `FAKE` then width and height bytes; only the header is ever parsed.
struct HeaderOnlyDecompressor {
    specification: Specification,
}

impl HeaderOnlyDecompressor {
    fn new(source: &mut dyn ImageSource) -> Result<Self> {
        let mut header = [0u8; 6];
        read_fully(source, &mut header)?;
        Ok(Self {
            specification: Specification::new(
                Size::new(u32::from(header[4]), u32::from(header[5])),
                FAKE,
                specifications::RGB,
            ),
        })
    }
}

impl Decompressor for HeaderOnlyDecompressor {
    fn source_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn output_image_specification(&self) -> Specification {
        self.specification.clone()
    }

    fn read_scanline(&mut self) -> Result<Option<Scanline>> {
        Ok(None)
    }
}

fn fake_plugin() -> Plugin {
    Plugin::new()
        .with_decompressor_provider(DecompressorProvider::new(
            FAKE,
            |source, _ratio, _configuration| Ok(Box::new(HeaderOnlyDecompressor::new(source)?)),
        ))
        .with_compressor_provider(CompressorProvider::new(FAKE, |_options| {
            Err(TranscodeError::CompressorFailure("fake cannot encode".into()))
        })
        .with_chroma_sampling_modes(vec![ChromaSamplingMode::S444]))
        .with_format_detector_handler(simple_handler(b"FAKE", FAKE).unwrap())
}

fn transcoder() -> Transcoder {
    let mut plugins = plugins::all();
    plugins.push(fake_plugin());
    Transcoder::new(plugins, Configuration::default())
}

fn gradient(width: u32, height: u32) -> VectorBitmapImageSource {
    let specification =
        Specification::new(Size::new(width, height), formats::BITMAP, specifications::GRAY8);
    let data = (0..width * height).map(|value| value as u8).collect();
    VectorBitmapImageSource::new(data, specification)
}

#[test]
fn transform_rotates_bitmap() {
    let mut source = gradient(3, 2);
    let mut sink = VectorImageSink::new();
    let options = Options::transform().with_rotate(Rotate::degrees(90));

    let result = transcoder()
        .transform(&mut source, &mut sink, &options)
        .unwrap();

    assert_eq!(result.rule_name, "base");
    assert_eq!(result.output_image_specification.size, Size::new(2, 3));
    assert_eq!(result.total_bytes_read, 6);
    assert_eq!(result.total_bytes_written, 6);
    assert_eq!(sink.into_data(), vec![3, 0, 4, 1, 5, 2]);
    assert!(result.timings.get_step("perform").is_some());
    assert!(result.timings.get_step("detect").is_none());
}

#[test]
fn encode_bitmap_to_tiff() {
    let mut source = gradient(4, 3);
    let mut sink = VectorImageSink::new();
    let options = Options::encode(Encode::new(formats::TIFF));

    let result = transcoder().encode(&mut source, &mut sink, &options).unwrap();
    assert_eq!(result.rule_name, "base");
    assert_eq!(result.output_image_specification.format, formats::TIFF);
    assert_eq!(
        result.output_image_specification.pixel_specification,
        specifications::GRAY8
    );

    let data = sink.into_data();
    assert_eq!(result.total_bytes_written, data.len());
    let mut decoder = ::tiff::decoder::Decoder::new(Cursor::new(data)).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (4, 3));
    let ::tiff::decoder::DecodingResult::U8(pixels) = decoder.read_image().unwrap() else {
        panic!("expected 8-bit samples");
    };
    assert_eq!(pixels, (0u8..12).collect::<Vec<_>>());
}

#[test]
fn encode_to_file_sink() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("out.tiff");
    let mut source = gradient(2, 2);
    let mut sink = FileImageSink::create(&path).unwrap();

    let result = transcoder()
        .encode(&mut source, &mut sink, &Options::encode(Encode::new(formats::TIFF)))
        .unwrap();
    let written = sink.finish().unwrap();

    assert_eq!(written, result.total_bytes_written);
    assert_eq!(std::fs::read(&path).unwrap().len(), written);
}

#[test]
fn same_format_is_copied_byte_for_byte() {
    let bytes = b"FAKE\x10\x20 and the rest of the payload".to_vec();
    let mut source = VectorImageSource::new(bytes.clone());
    let mut sink = VectorImageSink::new();

    let result = transcoder()
        .transcode(&mut source, &mut sink, &Options::transcode(Encode::new(FAKE)))
        .unwrap();

    assert_eq!(result.rule_name, "copy");
    assert_eq!(result.input_image_specification.size, Size::new(16, 32));
    assert_eq!(result.output_image_specification, result.input_image_specification);
    assert_eq!(result.total_bytes_read, bytes.len());
    assert_eq!(result.total_bytes_written, bytes.len());
    assert_eq!(sink.into_data(), bytes);
    assert!(result.timings.get_step("detect").is_some());
}

#[test]
fn explicit_mode_denies_copy() {
    let mut source = VectorImageSource::new(b"FAKE\x01\x01".to_vec());
    let mut sink = VectorImageSink::new();
    let options = Options::transcode(Encode::new(FAKE).with_mode(EncodeMode::Lossless));

    let error = transcoder()
        .transcode(&mut source, &mut sink, &options)
        .unwrap_err();
    assert!(matches!(error, TranscodeError::CompressorFailure(_)));
    assert!(sink.data().is_empty());
}

#[test]
fn empty_source_is_rejected() {
    let mut source = VectorImageSource::new(Vec::new());
    let mut sink = VectorImageSink::new();
    assert!(matches!(
        transcoder().decode(&mut source, &mut sink, &Options::decode()),
        Err(TranscodeError::EmptyInputSource)
    ));
}

#[test]
fn unknown_bytes_are_not_detected() {
    let mut source = VectorImageSource::new(b"definitely not an image".to_vec());
    let mut sink = VectorImageSink::new();
    assert!(matches!(
        transcoder().decode(&mut source, &mut sink, &Options::decode()),
        Err(TranscodeError::FormatNotDetected)
    ));
}

#[test]
fn detected_format_without_codec_fails() {
    let mut source = VectorImageSource::new(b"\x89PNG\x0D\x0A\x1A\x0Amore".to_vec());
    let mut sink = VectorImageSink::new();
    assert!(matches!(
        transcoder().decode(&mut source, &mut sink, &Options::decode()),
        Err(TranscodeError::DecompressorNotFound(format)) if format == formats::PNG
    ));
}

#[test]
fn entry_points_check_the_encode_requirement() {
    let transcoder = transcoder();
    let mut sink = VectorImageSink::new();

    let mut source = VectorImageSource::new(b"FAKE\x01\x01".to_vec());
    assert!(matches!(
        transcoder.decode(&mut source, &mut sink, &Options::encode(Encode::new(FAKE))),
        Err(TranscodeError::InvalidRequirement(_))
    ));

    let mut bitmap = gradient(1, 1);
    assert!(matches!(
        transcoder.encode(&mut bitmap, &mut sink, &Options::transform()),
        Err(TranscodeError::InvalidRequirement(_))
    ));
}

#[test]
fn crop_reaching_past_u32_max_fails_without_panicking() {
    assert!(matches!(
        Crop::rect(Rect::new(u32::MAX, 0, 10, 10), true),
        Err(TranscodeError::NumericOverflow(_))
    ));

    let transcoder = Transcoder::with_bundled_plugins(Configuration::default());
    let crop = Crop::rect(Rect::new(u32::MAX - 10, 0, 10, 10), true).unwrap();
    let options = Options::transform().with_crop(crop);
    let mut sink = VectorImageSink::new();
    let err = transcoder
        .transform(&mut gradient(4, 4), &mut sink, &options)
        .unwrap_err();
    assert!(matches!(err, TranscodeError::InvalidRequirement(_)));
}

#[test]
fn degenerate_geometry_is_reported_as_a_caller_error() {
    let transcoder = transcoder();
    let sliver = Crop::relative_to_origin(
        RelativeEdges {
            top: 0.0,
            left: 0.0,
            bottom: 1.0,
            right: 0.04,
        },
        true,
    )
    .unwrap();
    let requests = [
        Options::transform().with_resize(Resize::exact(Size::new(0, 0))),
        Options::transform().with_crop(sliver),
    ];

    for options in requests {
        let mut sink = VectorImageSink::new();
        let err = transcoder
            .transform(&mut gradient(10, 10), &mut sink, &options)
            .unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidRequirement(_)), "{err}");
        assert!(err.is_caller_error());
        assert!(!err.is_contract_violation());
    }
}

#[test]
fn bundled_plugins_are_registered() {
    let transcoder = Transcoder::with_bundled_plugins(Configuration::default());
    let repository = transcoder.repository();
    assert!(repository.compressor_provider(&formats::TIFF).is_ok());
    assert!(repository.decompressor_provider(&formats::RAW).is_ok());
    assert!(repository.compressor_provider(&formats::BITMAP).is_ok());

    let names: Vec<_> = transcoder
        .rule_matcher()
        .rules()
        .iter()
        .map(|rule| rule.name.as_str())
        .collect();
    assert_eq!(names, vec!["copy", "base"]);
}
