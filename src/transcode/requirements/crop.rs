//! Crop requirements.
//!
//! A crop is expressed in one of three ways: an absolute rect, absolute edges measured from
//! the origin, or edges relative to the image size. Every flavour can be applied to a
//! concrete size, rotated along with the image by a multiple of 90 degrees, and scaled
//! when the decoder samples the image down.

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::common::numeric::f32_to_u32;
use crate::transcode::image::{Point, Ratio, Rect, Rounding, Size};
use crate::transcode::requirements::rotate::Rotate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteEdges {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl AbsoluteEdges {
    pub fn is_valid(&self) -> bool {
        self.left < self.right && self.top < self.bottom
    }

    fn fits(&self, size: &Size) -> bool {
        self.is_valid() && self.right <= size.width && self.bottom <= size.height
    }

    fn rotated(&self, degrees: i32, size: &Size) -> Option<Self> {
        let (w, h) = (size.width, size.height);
        let edges = match degrees {
            0 => *self,
            90 => Self {
                top: self.left,
                left: h.checked_sub(self.bottom)?,
                bottom: self.right,
                right: h.checked_sub(self.top)?,
            },
            180 => Self {
                top: h.checked_sub(self.bottom)?,
                left: w.checked_sub(self.right)?,
                bottom: h.checked_sub(self.top)?,
                right: w.checked_sub(self.left)?,
            },
            270 => Self {
                top: w.checked_sub(self.right)?,
                left: self.top,
                bottom: w.checked_sub(self.left)?,
                right: self.bottom,
            },
            _ => return None,
        };
        Some(edges)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeEdges {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl RelativeEdges {
    pub fn is_valid(&self) -> bool {
        let is_ratio = |value: f32| (0.0..=1.0).contains(&value);
        is_ratio(self.top)
            && is_ratio(self.left)
            && is_ratio(self.bottom)
            && is_ratio(self.right)
            && self.left < self.right
            && self.top < self.bottom
    }

    fn rotated(&self, degrees: i32) -> Option<Self> {
        let edges = match degrees {
            0 => *self,
            90 => Self {
                top: self.left,
                left: 1.0 - self.bottom,
                bottom: self.right,
                right: 1.0 - self.top,
            },
            180 => Self {
                top: 1.0 - self.bottom,
                left: 1.0 - self.right,
                bottom: 1.0 - self.top,
                right: 1.0 - self.left,
            },
            270 => Self {
                top: 1.0 - self.right,
                left: self.top,
                bottom: 1.0 - self.left,
                right: self.bottom,
            },
            _ => return None,
        };
        Some(edges)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropHandler {
    Rect(Rect),
    AbsoluteToOrigin(AbsoluteEdges),
    RelativeToOrigin(RelativeEdges),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crop {
    pub must_be_exact: bool,
    handler: CropHandler,
}

impl Crop {
    pub fn rect(rect: Rect, must_be_exact: bool) -> Result<Self> {
        if rect.size.is_empty() {
            return Err(TranscodeError::InvalidRequirement(format!(
                "crop rect {rect} is empty"
            )));
        }
        rect.checked_bottom_right()?;
        Ok(Self {
            must_be_exact,
            handler: CropHandler::Rect(rect),
        })
    }

    pub fn absolute_to_origin(edges: AbsoluteEdges, must_be_exact: bool) -> Result<Self> {
        if !edges.is_valid() {
            return Err(TranscodeError::InvalidRequirement(format!(
                "invalid absolute crop edges {edges:?}"
            )));
        }
        Ok(Self {
            must_be_exact,
            handler: CropHandler::AbsoluteToOrigin(edges),
        })
    }

    pub fn relative_to_origin(edges: RelativeEdges, must_be_exact: bool) -> Result<Self> {
        if !edges.is_valid() {
            return Err(TranscodeError::InvalidRequirement(format!(
                "invalid relative crop edges {edges:?}"
            )));
        }
        Ok(Self {
            must_be_exact,
            handler: CropHandler::RelativeToOrigin(edges),
        })
    }

    pub fn handler(&self) -> &CropHandler {
        &self.handler
    }

    /// Resolves the crop against an image of `size`.
    pub fn apply(&self, size: Size) -> Result<Rect> {
        let rect = match self.handler {
            CropHandler::Rect(rect) => rect,
            CropHandler::AbsoluteToOrigin(edges) => {
                if !edges.fits(&size) {
                    return Err(TranscodeError::InvalidRequirement(format!(
                        "crop edges {edges:?} exceed image size {size}"
                    )));
                }
                Rect::new(
                    edges.left,
                    edges.top,
                    edges.right - edges.left,
                    edges.bottom - edges.top,
                )
            }
            CropHandler::RelativeToOrigin(edges) => {
                let scale = |ratio: f32, extent: u32| f32_to_u32((ratio * extent as f32).round());
                let top_left = Point::new(
                    scale(edges.left, size.width)?,
                    scale(edges.top, size.height)?,
                );
                let bottom_right = Point::new(
                    scale(edges.right, size.width)?,
                    scale(edges.bottom, size.height)?,
                );
                Rect {
                    top_left,
                    size: Size::new(
                        bottom_right.x.saturating_sub(top_left.x),
                        bottom_right.y.saturating_sub(top_left.y),
                    ),
                }
            }
        };
        if rect.size.is_empty() {
            return Err(TranscodeError::InvalidRequirement(format!(
                "crop {rect} is empty on image size {size}"
            )));
        }
        if !rect.is_contained_in(&size) {
            return Err(TranscodeError::InvalidRequirement(format!(
                "crop {rect} exceeds image size {size}"
            )));
        }
        Ok(rect)
    }

    /// The same crop expressed on the image after it is rotated by `rotate`. `size` is the
    /// image size before rotation.
    pub fn rotated(&self, rotate: &Rotate, size: Size) -> Result<Self> {
        let cannot_rotate = || TranscodeError::CropCannotRotate(rotate.to_string());
        if rotate.flip() || rotate.force_up_orientation || !rotate.is_multiple_of_90() {
            return Err(cannot_rotate());
        }
        let degrees = rotate.sanitised_degrees();
        let handler = match self.handler {
            CropHandler::Rect(rect) => CropHandler::Rect(rotate_rect(&rect, &size, degrees)?),
            CropHandler::AbsoluteToOrigin(edges) => {
                CropHandler::AbsoluteToOrigin(edges.rotated(degrees, &size).ok_or_else(cannot_rotate)?)
            }
            CropHandler::RelativeToOrigin(edges) => {
                CropHandler::RelativeToOrigin(edges.rotated(degrees).ok_or_else(cannot_rotate)?)
            }
        };
        Ok(Self {
            must_be_exact: self.must_be_exact,
            handler,
        })
    }

    /// The crop on an image sampled down by `ratio`. Relative crops are scale invariant.
    pub fn scaled(&self, ratio: Ratio) -> Result<Self> {
        if ratio.is_zero() {
            return Err(TranscodeError::InvalidRequirement(
                "cannot scale a crop by a zero ratio".to_string(),
            ));
        }
        if ratio.is_one() {
            return Ok(*self);
        }
        let handler = match self.handler {
            CropHandler::Rect(rect) => CropHandler::Rect(rect.scaled(ratio, Rounding::Nearest)?),
            CropHandler::AbsoluteToOrigin(edges) => {
                let top_left = Point::new(edges.left, edges.top).scaled(ratio, Rounding::Down)?;
                let bottom_right =
                    Point::new(edges.right, edges.bottom).scaled(ratio, Rounding::Down)?;
                CropHandler::AbsoluteToOrigin(AbsoluteEdges {
                    top: top_left.y,
                    left: top_left.x,
                    bottom: bottom_right.y,
                    right: bottom_right.x,
                })
            }
            relative @ CropHandler::RelativeToOrigin(_) => relative,
        };
        Ok(Self {
            must_be_exact: self.must_be_exact,
            handler,
        })
    }
}

fn rotate_rect(rect: &Rect, size: &Size, degrees: i32) -> Result<Rect> {
    let underflow = || TranscodeError::NumericUnderflow(format!("rotating crop {rect} in {size}"));
    if degrees == 0 {
        return Ok(*rect);
    }
    let corner = rect.checked_bottom_right()?;
    let top_left = match degrees {
        90 => Point::new(
            size.height.checked_sub(corner.y).ok_or_else(underflow)?,
            rect.top_left.x,
        ),
        180 => Point::new(
            size.width.checked_sub(corner.x).ok_or_else(underflow)?,
            size.height.checked_sub(corner.y).ok_or_else(underflow)?,
        ),
        270 => Point::new(
            rect.top_left.y,
            size.width.checked_sub(corner.x).ok_or_else(underflow)?,
        ),
        _ => {
            return Err(TranscodeError::CropCannotRotate(format!(
                "{degrees} degrees"
            )));
        }
    };
    Ok(Rect {
        top_left,
        size: rect.size.rotated(degrees)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_crop() -> Crop {
        Crop::rect(Rect::new(1, 2, 5, 7), true).unwrap()
    }

    #[test]
    fn rect_rotation_matches_known_coordinates() {
        let size = Size::new(10, 20);
        let cases = [
            (90, Rect::new(11, 1, 7, 5)),
            (180, Rect::new(4, 11, 5, 7)),
            (270, Rect::new(2, 4, 7, 5)),
        ];
        for (degrees, expected) in cases {
            let rotated = rect_crop().rotated(&Rotate::degrees(degrees), size).unwrap();
            let rotated_size = size.rotated(degrees).unwrap();
            let rect = rotated.apply(rotated_size).unwrap();
            assert_eq!(rect, expected, "rotation by {degrees}");
            assert!(rect.is_contained_in(&rotated_size));
        }
    }

    #[test]
    fn rotation_rejects_flips_and_force_up() {
        let size = Size::new(10, 20);
        let flip = Rotate {
            flip_vertically: true,
            ..Rotate::default()
        };
        let force = Rotate {
            degrees: 90,
            force_up_orientation: true,
            ..Rotate::default()
        };
        for rotate in [flip, force, Rotate::degrees(45)] {
            assert!(matches!(
                rect_crop().rotated(&rotate, size),
                Err(TranscodeError::CropCannotRotate(_))
            ));
        }
    }

    #[test]
    fn absolute_edges_rotate_with_image() {
        let crop = Crop::absolute_to_origin(
            AbsoluteEdges {
                top: 2,
                left: 1,
                bottom: 9,
                right: 6,
            },
            false,
        )
        .unwrap();
        let size = Size::new(10, 20);
        assert_eq!(crop.apply(size).unwrap(), Rect::new(1, 2, 5, 7));
        let rotated = crop.rotated(&Rotate::degrees(90), size).unwrap();
        assert_eq!(rotated.apply(size.transposed()).unwrap(), Rect::new(11, 1, 7, 5));
    }

    #[test]
    fn relative_crop_ignores_scaling() {
        let crop = Crop::relative_to_origin(
            RelativeEdges {
                top: 0.25,
                left: 0.0,
                bottom: 0.75,
                right: 0.5,
            },
            false,
        )
        .unwrap();
        let scaled = crop.scaled(Ratio::new(1, 4)).unwrap();
        assert_eq!(scaled, crop);
        assert_eq!(crop.apply(Size::new(100, 40)).unwrap(), Rect::new(0, 10, 50, 20));
    }

    #[test]
    fn invalid_crops_are_rejected() {
        assert!(Crop::rect(Rect::new(0, 0, 0, 4), false).is_err());
        assert!(Crop::relative_to_origin(
            RelativeEdges {
                top: 0.5,
                left: 0.0,
                bottom: 0.2,
                right: 1.0
            },
            false
        )
        .is_err());
        assert!(rect_crop().apply(Size::new(4, 4)).is_err());
    }

    #[test]
    fn rects_ending_past_u32_max_are_rejected() {
        assert!(matches!(
            Crop::rect(Rect::new(u32::MAX, 0, 10, 10), true),
            Err(TranscodeError::NumericOverflow(_))
        ));
        assert!(matches!(
            Crop::rect(Rect::new(0, u32::MAX - 3, 1, 4), false),
            Err(TranscodeError::NumericOverflow(_))
        ));
        let flush = Crop::rect(Rect::new(u32::MAX - 4, 0, 4, 4), true).unwrap();
        assert!(matches!(
            flush.apply(Size::new(16, 16)),
            Err(TranscodeError::InvalidRequirement(_))
        ));
        assert!(matches!(
            rotate_rect(&Rect::new(u32::MAX, 0, 10, 10), &Size::new(8, 8), 90),
            Err(TranscodeError::NumericOverflow(_))
        ));
    }

    #[test]
    fn relative_crop_rounding_to_nothing_is_a_caller_error() {
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
        let err = sliver.apply(Size::new(10, 10)).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidRequirement(_)));
        assert!(err.is_caller_error());
        assert_eq!(sliver.apply(Size::new(100, 10)).unwrap(), Rect::new(0, 0, 4, 10));
    }

    #[test]
    fn rect_scaled_by_sampling_ratio() {
        let scaled = rect_crop().scaled(Ratio::new(1, 2)).unwrap();
        assert_eq!(scaled.apply(Size::new(5, 10)).unwrap(), Rect::new(1, 1, 3, 4));
    }
}
