use std::collections::VecDeque;

use tracing::trace;

use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::common::numeric::{checked_mul, to_usize};
use crate::transcode::config::SamplingMethod;
use crate::transcode::core::proc::block::ScanlineProcessingBlock;
use crate::transcode::image::{PixelSpecification, Scanline, Size};

/// Resamples rows from the input size to the output size.
///
/// Equal sizes pass rows through. Otherwise the configured method applies: bicubic streams
/// rows as soon as their four source rows are in, magic kernel buffers the whole image.
pub struct ScalingBlock {
    specification: PixelSpecification,
    input_width: usize,
    scaler: Scaler,
}

enum Scaler {
    NoOp(VecDeque<Scanline>),
    Bicubic(BicubicScaler),
    MagicKernel(MagicKernelScaler),
}

impl ScalingBlock {
    pub fn new(
        specification: PixelSpecification,
        input_size: Size,
        output_size: Size,
        method: SamplingMethod,
    ) -> Result<Self> {
        ensure!(
            !input_size.is_empty() && !output_size.is_empty(),
            "scaling {} to {}",
            input_size,
            output_size
        );

        let geometry = Geometry::new(specification, input_size, output_size)?;
        let scaler = if input_size == output_size {
            Scaler::NoOp(VecDeque::new())
        } else {
            match method {
                SamplingMethod::Bicubic => Scaler::Bicubic(BicubicScaler::new(geometry)),
                SamplingMethod::MagicKernel => {
                    Scaler::MagicKernel(MagicKernelScaler::new(geometry))
                }
            }
        };

        Ok(Self {
            specification,
            input_width: geometry.input_width,
            scaler,
        })
    }
}

impl ScanlineProcessingBlock for ScalingBlock {
    fn consume(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(scanline.specification() == self.specification);
        ensure!(scanline.width() == self.input_width);

        match &mut self.scaler {
            Scaler::NoOp(rows) => {
                rows.push_back(scanline);
                Ok(())
            }
            Scaler::Bicubic(scaler) => scaler.consume(scanline),
            Scaler::MagicKernel(scaler) => scaler.consume(scanline),
        }
    }

    fn produce(&mut self) -> Result<Option<Scanline>> {
        match &mut self.scaler {
            Scaler::NoOp(rows) => Ok(rows.pop_front()),
            Scaler::Bicubic(scaler) => scaler.produce(),
            Scaler::MagicKernel(scaler) => scaler.produce(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Geometry {
    specification: PixelSpecification,
    components: usize,
    input_width: usize,
    input_height: usize,
    output_width: usize,
    output_height: usize,
}

impl Geometry {
    fn new(specification: PixelSpecification, input: Size, output: Size) -> Result<Self> {
        Ok(Self {
            specification,
            components: usize::from(specification.bytes_per_pixel),
            input_width: to_usize(u64::from(input.width))?,
            input_height: to_usize(u64::from(input.height))?,
            output_width: to_usize(u64::from(output.width))?,
            output_height: to_usize(u64::from(output.height))?,
        })
    }
}

fn missing_row(row: usize) -> TranscodeError {
    TranscodeError::invariant(
        format!("input row {row} already released"),
        format!("{}:{}", file!(), line!()),
    )
}

/// The four source indices around one output position and the offset between the middle two.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Taps {
    indices: [usize; 4],
    delta: f32,
}

impl Taps {
    fn new(output_index: usize, input_length: usize, output_length: usize) -> Self {
        let inverse_scale = input_length as f32 / output_length as f32;
        let middle = 0.5 * inverse_scale * (2 * output_index + 1) as f32;
        let last = input_length - 1;

        // pixel centre to logical index
        let logical = (middle - 0.5).clamp(0.0, input_length as f32);
        let i1 = (logical.floor() as usize).min(last);
        let i2 = if i1 < last { i1 + 1 } else { i1 };
        let delta = if i1 == i2 {
            0.0
        } else {
            ((logical - i1 as f32) / (i2 - i1) as f32).clamp(0.0, 1.0)
        };
        let i0 = i1.saturating_sub(1);
        let i3 = if i2 < last { i2 + 1 } else { i2 };

        Self {
            indices: [i0, i1, i2, i3],
            delta,
        }
    }
}

/// Cubic Hermite interpolation between `p1` and `p2`, evaluated with Horner's method.
fn bicubic(delta: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let b = p2 - p0;
    let c = 2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3;
    let d = 3.0 * (p1 - p2) + p3 - p0;
    p1 + 0.5 * delta * (b + delta * (c + delta * d))
}

struct BicubicScaler {
    geometry: Geometry,
    columns: Vec<Taps>,
    input: Vec<Option<Scanline>>,
    next_row_to_release: usize,
    next_output_row: usize,
}

impl BicubicScaler {
    fn new(geometry: Geometry) -> Self {
        let columns = (0..geometry.output_width)
            .map(|x| Taps::new(x, geometry.input_width, geometry.output_width))
            .collect();
        Self {
            geometry,
            columns,
            input: Vec::with_capacity(geometry.input_height),
            next_row_to_release: 0,
            next_output_row: 0,
        }
    }

    fn consume(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(
            self.input.len() < self.geometry.input_height,
            "more than {} rows fed to scaling",
            self.geometry.input_height
        );
        self.input.push(Some(scanline));
        Ok(())
    }

    fn row(&self, index: usize) -> Result<&Scanline> {
        self.input
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| missing_row(index))
    }

    fn produce(&mut self) -> Result<Option<Scanline>> {
        let geometry = self.geometry;
        if self.next_output_row == geometry.output_height {
            return Ok(None);
        }

        let rows = Taps::new(
            self.next_output_row,
            geometry.input_height,
            geometry.output_height,
        );
        let [y0, y1, y2, y3] = rows.indices;
        if y3 >= self.input.len() {
            return Ok(None);
        }

        let source = [self.row(y0)?, self.row(y1)?, self.row(y2)?, self.row(y3)?];
        let mut output = Scanline::new(geometry.specification, geometry.output_width);
        let mut horizontal = [0.0f32; 4];
        for (x, columns) in self.columns.iter().enumerate() {
            let [x0, x1, x2, x3] = columns.indices;
            for component in 0..geometry.components {
                for (value, row) in horizontal.iter_mut().zip(source) {
                    let sample = |index: usize| f32::from(row.pixel(index)[component]);
                    *value = bicubic(
                        columns.delta,
                        sample(x0),
                        sample(x1),
                        sample(x2),
                        sample(x3),
                    )
                    .clamp(0.0, 255.0);
                }
                let [p0, p1, p2, p3] = horizontal;
                output.pixel_mut(x)[component] =
                    bicubic(rows.delta, p0, p1, p2, p3).clamp(0.0, 255.0) as u8;
            }
        }

        // rows above y0 are never read again
        if y0 > self.next_row_to_release {
            for row in &mut self.input[self.next_row_to_release..y0] {
                *row = None;
            }
            self.next_row_to_release = y0;
        }

        trace!("Bicubic row {} from rows {y0}..={y3}", self.next_output_row);
        self.next_output_row += 1;
        Ok(Some(output))
    }
}

/// Magic kernel: `3/4 - x²` within half a pixel, `(|x| - 3/2)² / 2` out to one and a half.
fn magic_kernel(x: f32) -> f32 {
    let x = x.abs();
    if x <= 0.5 {
        0.75 - x * x
    } else if x <= 1.5 {
        0.5 * (x - 1.5) * (x - 1.5)
    } else {
        0.0
    }
}

/// Normalized source weights for every output position along one axis.
fn magic_kernel_weights(input_length: usize, output_length: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = output_length as f32 / input_length as f32;
    // downscaling stretches the kernel over the source pixels one output pixel covers
    let support = (1.0 / scale).max(1.0);
    let last = (input_length - 1) as isize;

    (0..output_length)
        .map(|output_index| {
            let centre = (output_index as f32 + 0.5) / scale - 0.5;
            let first = (centre - 1.5 * support).ceil() as isize;
            let end = (centre + 1.5 * support).floor() as isize;

            let mut weights: Vec<(usize, f32)> = Vec::new();
            for source in first..=end {
                let weight = magic_kernel((source as f32 - centre) / support);
                if weight <= 0.0 {
                    continue;
                }
                let index = source.clamp(0, last) as usize;
                match weights.iter_mut().find(|(existing, _)| *existing == index) {
                    Some((_, total)) => *total += weight,
                    None => weights.push((index, weight)),
                }
            }

            let sum: f32 = weights.iter().map(|(_, weight)| weight).sum();
            if sum > 0.0 {
                for (_, weight) in &mut weights {
                    *weight /= sum;
                }
            } else {
                let nearest = centre.round().clamp(0.0, last as f32) as usize;
                weights.push((nearest, 1.0));
            }
            weights
        })
        .collect()
}

/// `[-1/4, 3/2, -1/4]` applied along rows and columns with clamped edges.
fn sharpen(plane: &mut [f32], width: usize, height: usize, components: usize) {
    const SIDE: f32 = -0.25;
    const CENTRE: f32 = 1.5;

    let stride = width * components;
    let mut row = vec![0.0f32; stride];
    for y in 0..height {
        let line = &mut plane[y * stride..(y + 1) * stride];
        row.copy_from_slice(line);
        for x in 0..width {
            let left = x.saturating_sub(1);
            let right = (x + 1).min(width - 1);
            for component in 0..components {
                line[x * components + component] = SIDE * row[left * components + component]
                    + CENTRE * row[x * components + component]
                    + SIDE * row[right * components + component];
            }
        }
    }

    let mut column = vec![0.0f32; height];
    for offset in 0..stride {
        for (y, value) in column.iter_mut().enumerate() {
            *value = plane[y * stride + offset];
        }
        for y in 0..height {
            let above = y.saturating_sub(1);
            let below = (y + 1).min(height - 1);
            plane[y * stride + offset] =
                SIDE * column[above] + CENTRE * column[y] + SIDE * column[below];
        }
    }
}

struct MagicKernelScaler {
    geometry: Geometry,
    input: Vec<Scanline>,
    output: VecDeque<Scanline>,
}

impl MagicKernelScaler {
    fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            input: Vec::new(),
            output: VecDeque::new(),
        }
    }

    fn consume(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(
            self.input.len() < self.geometry.input_height,
            "more than {} rows fed to scaling",
            self.geometry.input_height
        );
        self.input.push(scanline);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let Geometry {
            specification,
            components,
            input_width,
            input_height,
            output_width,
            output_height,
        } = self.geometry;

        let horizontal_weights = magic_kernel_weights(input_width, output_width);
        let vertical_weights = magic_kernel_weights(input_height, output_height);
        let stride = checked_mul(output_width, components)?;

        let mut horizontal = vec![0.0f32; checked_mul(stride, input_height)?];
        for (y, scanline) in self.input.iter().enumerate() {
            let line = &mut horizontal[y * stride..(y + 1) * stride];
            for (x, weights) in horizontal_weights.iter().enumerate() {
                for &(source, weight) in weights {
                    let pixel = scanline.pixel(source);
                    for component in 0..components {
                        line[x * components + component] += weight * f32::from(pixel[component]);
                    }
                }
            }
        }
        self.input = Vec::new();

        let mut plane = vec![0.0f32; checked_mul(stride, output_height)?];
        for (y, weights) in vertical_weights.iter().enumerate() {
            let line = &mut plane[y * stride..(y + 1) * stride];
            for &(source, weight) in weights {
                let source_line = &horizontal[source * stride..(source + 1) * stride];
                for (value, sample) in line.iter_mut().zip(source_line) {
                    *value += weight * sample;
                }
            }
        }

        if output_width < input_width || output_height < input_height {
            sharpen(&mut plane, output_width, output_height, components);
        }

        for line in plane.chunks_exact(stride) {
            let bytes = line
                .iter()
                .map(|value| value.round().clamp(0.0, 255.0) as u8)
                .collect();
            let scanline = Scanline::from_bytes(specification, bytes).ok_or_else(|| {
                TranscodeError::invariant(
                    "resampled row is not a whole number of pixels",
                    format!("{}:{}", file!(), line!()),
                )
            })?;
            self.output.push_back(scanline);
        }
        trace!("Magic kernel produced {} rows", self.output.len());
        Ok(())
    }

    fn produce(&mut self) -> Result<Option<Scanline>> {
        if !self.input.is_empty() && self.input.len() == self.geometry.input_height {
            self.run()?;
        }
        Ok(self.output.pop_front())
    }
}
