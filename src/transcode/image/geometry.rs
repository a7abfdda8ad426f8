use std::fmt;

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::common::numeric;
use crate::transcode::image::orientation::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Up,
    Nearest,
    Down,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Up => value.ceil(),
            Rounding::Nearest => value.round(),
            Rounding::Down => value.floor(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    pub numerator: u32,
    pub denominator: u32,
}

impl Ratio {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn is_one(&self) -> bool {
        self.numerator == self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    pub fn value(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

fn scale_component(value: u32, ratio: f64, rounding: Rounding) -> Result<u32> {
    let scaled = rounding.apply(f64::from(value) * ratio);
    if scaled.is_nan() || scaled > f64::from(u32::MAX) {
        return Err(TranscodeError::NumericOverflow(format!(
            "{value} * {ratio} to u32"
        )));
    }
    if scaled < 0.0 {
        return Err(TranscodeError::NumericUnderflow(format!(
            "{value} * {ratio} to u32"
        )));
    }
    Ok(scaled as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn scaled(&self, ratio: Ratio, rounding: Rounding) -> Result<Point> {
        Ok(Point {
            x: scale_component(self.x, ratio.value(), rounding)?,
            y: scale_component(self.y, ratio.value(), rounding)?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Image dimensions in pixels.
///
/// The ordering helpers compare both dimensions at once: `a.fits_within(b)` holds only
/// when neither dimension of `a` exceeds `b`'s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn transposed(&self) -> Size {
        Size::new(self.height, self.width)
    }

    /// Size of the image once displayed in `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> Size {
        if orientation.transposes_size() {
            self.transposed()
        } else {
            *self
        }
    }

    pub fn rotated(&self, degrees: i32) -> Result<Size> {
        if degrees % 90 != 0 {
            return Err(TranscodeError::InvalidRequirement(format!(
                "rotation of {degrees} degrees is not a multiple of 90"
            )));
        }
        if degrees.rem_euclid(180) == 90 {
            Ok(self.transposed())
        } else {
            Ok(*self)
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x <= self.width && point.y <= self.height
    }

    pub fn fits_within(&self, other: &Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    pub fn covers(&self, other: &Size) -> bool {
        self.width >= other.width && self.height >= other.height
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn scaled(&self, ratio: Ratio, rounding: Rounding) -> Result<Size> {
        Ok(Size {
            width: scale_component(self.width, ratio.value(), rounding)?,
            height: scale_component(self.height, ratio.value(), rounding)?,
        })
    }

    /// Keeps the aspect ratio and shrinks until both dimensions fit in `other`.
    pub fn downscaled_to_fit(&self, other: &Size) -> Result<Size> {
        if self.fits_within(other) {
            return Ok(*self);
        }
        let factor_width = f64::from(self.width) / f64::from(other.width);
        let factor_height = f64::from(self.height) / f64::from(other.height);
        let factor = 1.0 / factor_width.max(factor_height);
        Ok(Size {
            width: scale_component(self.width, factor, Rounding::Nearest)?,
            height: scale_component(self.height, factor, Rounding::Nearest)?,
        })
    }

    /// Bytes needed for one row of `bytes_per_pixel`-sized pixels.
    pub fn row_bytes(&self, bytes_per_pixel: u8) -> Result<usize> {
        numeric::checked_mul(self.width as usize, usize::from(bytes_per_pixel))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub top_left: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            top_left: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn min_x(&self) -> u32 {
        self.top_left.x
    }

    pub fn mid_x(&self) -> u32 {
        self.top_left.x.saturating_add(self.size.width / 2)
    }

    /// Saturates at `u32::MAX`; use [`Rect::checked_bottom_right`] where the exact edge matters.
    pub fn max_x(&self) -> u32 {
        self.top_left.x.saturating_add(self.size.width)
    }

    pub fn min_y(&self) -> u32 {
        self.top_left.y
    }

    pub fn mid_y(&self) -> u32 {
        self.top_left.y.saturating_add(self.size.height / 2)
    }

    pub fn max_y(&self) -> u32 {
        self.top_left.y.saturating_add(self.size.height)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.max_x(), self.max_y())
    }

    pub fn checked_bottom_right(&self) -> Result<Point> {
        let overflow = || TranscodeError::NumericOverflow(format!("rect {self} ends past u32::MAX"));
        Ok(Point::new(
            self.top_left.x.checked_add(self.size.width).ok_or_else(overflow)?,
            self.top_left.y.checked_add(self.size.height).ok_or_else(overflow)?,
        ))
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        let out_of_bounds = self.max_x() <= other.min_x()
            || self.max_y() <= other.min_y()
            || self.min_x() >= other.max_x()
            || self.min_y() >= other.max_y();
        !self.size.is_empty() && !other.size.is_empty() && !out_of_bounds
    }

    /// Overlapping area, or the zero rect when the two do not intersect.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::default();
        }
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn scaled(&self, ratio: Ratio, rounding: Rounding) -> Result<Rect> {
        Ok(Rect {
            top_left: self.top_left.scaled(ratio, rounding)?,
            size: self.size.scaled(ratio, rounding)?,
        })
    }

    pub fn is_contained_in(&self, size: &Size) -> bool {
        self.checked_bottom_right()
            .is_ok_and(|corner| size.contains(corner))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.size, self.top_left)
    }
}
