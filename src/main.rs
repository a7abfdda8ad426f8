use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use prism_rs::logger;
use prism_rs::transcode::config::{SamplingMethod, TiffCompression};
use prism_rs::transcode::image::Rect;
use prism_rs::transcode::io::{FileImageSink, FileImageSource, VectorBitmapImageSource};
use prism_rs::transcode::requirements::{Crop, Encode, EncodeMode, Resize, ResizeMode, Rotate};
use prism_rs::transcode::{
    Configuration, Format, Options, PixelSpecification, Size, Specification, TranscodeResult,
    Transcoder, formats, specifications,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ResizeModeArg {
    Exact,
    Smaller,
    Larger,
}

impl From<ResizeModeArg> for ResizeMode {
    fn from(mode: ResizeModeArg) -> Self {
        match mode {
            ResizeModeArg::Exact => ResizeMode::Exact,
            ResizeModeArg::Smaller => ResizeMode::ExactOrSmaller,
            ResizeModeArg::Larger => ResizeMode::ExactOrLarger,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PixelArg {
    Gray,
    Rgb,
    Rgba,
}

impl From<PixelArg> for PixelSpecification {
    fn from(pixel: PixelArg) -> Self {
        match pixel {
            PixelArg::Gray => specifications::GRAY8,
            PixelArg::Rgb => specifications::RGB,
            PixelArg::Rgba => specifications::RGBA,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TiffCompressionArg {
    None,
    Lzw,
    Deflate,
    DeflateFast,
    DeflateBest,
}

impl From<TiffCompressionArg> for TiffCompression {
    fn from(compression: TiffCompressionArg) -> Self {
        match compression {
            TiffCompressionArg::None => TiffCompression::None,
            TiffCompressionArg::Lzw => TiffCompression::Lzw,
            TiffCompressionArg::Deflate => TiffCompression::DeflateBalanced,
            TiffCompressionArg::DeflateFast => TiffCompression::DeflateFast,
            TiffCompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SamplingArg {
    MagicKernel,
    Bicubic,
}

fn parse_size(value: &str) -> Result<Size, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width = width.trim().parse().map_err(|_| format!("bad width in '{value}'"))?;
    let height = height.trim().parse().map_err(|_| format!("bad height in '{value}'"))?;
    Ok(Size::new(width, height))
}

fn parse_rect(value: &str) -> Result<Rect, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("expected x,y,w,h, got '{value}'"))?;
    match parts.as_slice() {
        &[x, y, width, height] => Ok(Rect::new(x, y, width, height)),
        _ => Err(format!("expected x,y,w,h, got '{value}'")),
    }
}

/// Transcode, resize, crop and rotate images.
#[derive(Debug, Parser)]
#[command(name = "prism", version, about)]
struct Cli {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Output format; inferred from the output extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// Treat the input as raw bitmap rows of this size
    #[arg(long, value_parser = parse_size)]
    input_size: Option<Size>,

    /// Pixel layout of a bitmap input
    #[arg(long, value_enum, default_value = "rgb", requires = "input_size")]
    input_pixel: PixelArg,

    #[arg(long, value_parser = parse_size)]
    resize: Option<Size>,

    #[arg(long, value_enum, default_value = "exact")]
    resize_mode: ResizeModeArg,

    /// Clockwise degrees, a multiple of 90
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<i32>,

    #[arg(long)]
    flip_h: bool,

    #[arg(long)]
    flip_v: bool,

    /// Rotate pixels instead of recording the orientation in metadata
    #[arg(long)]
    force_up: bool,

    /// Crop rectangle as x,y,w,h
    #[arg(long, value_parser = parse_rect)]
    crop: Option<Rect>,

    #[arg(long)]
    quality: Option<u32>,

    #[arg(long)]
    lossless: bool,

    #[arg(long, value_enum)]
    sampling: Option<SamplingArg>,

    #[arg(long, value_enum)]
    tiff_compression: Option<TiffCompressionArg>,

    /// Use the TIFF horizontal predictor
    #[arg(long)]
    tiff_predictor: bool,

    /// Emit the RAW sensor mosaic as gray instead of demosaicing it
    #[arg(long)]
    no_demosaic: bool,
}

impl Cli {
    fn output_format(&self) -> Result<Format> {
        if let Some(name) = &self.format {
            return Format::from_identifier(name)
                .with_context(|| format!("unknown output format '{name}'"));
        }
        let extension = self
            .output
            .extension()
            .and_then(|extension| extension.to_str())
            .context("output has no extension, pass --format")?;
        Format::from_extension(extension)
            .with_context(|| format!("cannot infer a format from '.{extension}'"))
    }

    fn configuration(&self) -> Configuration {
        let mut builder = Configuration::builder()
            .tiff_horizontal_predictor(self.tiff_predictor)
            .raw_demosaic(!self.no_demosaic);
        if let Some(compression) = self.tiff_compression {
            builder = builder.tiff_compression(compression.into());
        }
        if let Some(sampling) = self.sampling {
            builder = builder.sampling_method(match sampling {
                SamplingArg::MagicKernel => SamplingMethod::MagicKernel,
                SamplingArg::Bicubic => SamplingMethod::Bicubic,
            });
        }
        builder.build()
    }

    fn options(&self, output_format: Format) -> Result<Options> {
        let mut options = if output_format == formats::BITMAP {
            Options::transform()
        } else {
            let mut encode = Encode::new(output_format);
            if let Some(quality) = self.quality {
                encode = encode.with_quality(quality);
            }
            if self.lossless {
                encode = encode.with_mode(EncodeMode::Lossless);
            }
            encode.validate().context("invalid encode options")?;
            Options::encode(encode)
        };

        if let Some(size) = self.resize {
            options = options.with_resize(Resize::new(self.resize_mode.into(), size));
        }
        if self.rotate.is_some() || self.flip_h || self.flip_v || self.force_up {
            options = options.with_rotate(Rotate {
                degrees: self.rotate.unwrap_or(0),
                flip_horizontally: self.flip_h,
                flip_vertically: self.flip_v,
                force_up_orientation: self.force_up,
            });
        }
        if let Some(rect) = self.crop {
            options = options.with_crop(Crop::rect(rect, true).context("invalid crop")?);
        }
        Ok(options.with_configuration(self.configuration()))
    }
}

fn run(cli: &Cli) -> Result<TranscodeResult> {
    let output_format = cli.output_format()?;
    let options = cli.options(output_format)?;
    let transcoder = Transcoder::with_bundled_plugins(Configuration::default());
    let mut sink = FileImageSink::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let result = match cli.input_size {
        Some(size) => {
            let data = std::fs::read(&cli.input)
                .with_context(|| format!("reading {}", cli.input.display()))?;
            let specification =
                Specification::new(size, formats::BITMAP, cli.input_pixel.into());
            let mut source = VectorBitmapImageSource::new(data, specification);
            if output_format == formats::BITMAP {
                transcoder.transform(&mut source, &mut sink, &options)
            } else {
                transcoder.encode(&mut source, &mut sink, &options)
            }
        }
        None => {
            let mut source = FileImageSource::open(&cli.input)
                .with_context(|| format!("opening {}", cli.input.display()))?;
            if output_format == formats::BITMAP {
                transcoder.decode(&mut source, &mut sink, &options)
            } else {
                transcoder.transcode(&mut source, &mut sink, &options)
            }
        }
    }
    .with_context(|| format!("transcoding {}", cli.input.display()))?;

    sink.finish()
        .with_context(|| format!("writing {}", cli.output.display()))?;
    Ok(result)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init();

    info!("Starting prism...");
    let result = run(&cli)?;

    if result.output_image_specification.format == formats::BITMAP {
        info!(
            "Bitmap output is {} {}",
            result.output_image_specification.size,
            result.output_image_specification.pixel_specification
        );
    }
    info!(
        rule = %result.rule_name,
        input = %result.input_image_specification,
        output = %result.output_image_specification,
        bytes_read = result.total_bytes_read,
        bytes_written = result.total_bytes_written,
        millis = result.duration.as_secs_f64() * 1000.0,
        "Done: {} -> {}",
        cli.input.display(),
        cli.output.display()
    );
    Ok(())
}
