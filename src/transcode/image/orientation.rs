//! EXIF orientation algebra.

use std::fmt;

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::requirements::Rotate;

/// Orientation values as stored in the EXIF orientation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum Orientation {
    #[default]
    Up = 1,
    UpMirrored = 2,
    Bottom = 3,
    BottomMirrored = 4,
    LeftMirrored = 5,
    Right = 6,
    RightMirrored = 7,
    Left = 8,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Up,
        Orientation::UpMirrored,
        Orientation::Bottom,
        Orientation::BottomMirrored,
        Orientation::LeftMirrored,
        Orientation::Right,
        Orientation::RightMirrored,
        Orientation::Left,
    ];

    pub fn from_exif_value(value: u16) -> Option<Self> {
        Self::ALL.get(usize::from(value).checked_sub(1)?).copied()
    }

    pub fn exif_value(self) -> u16 {
        self as u16
    }

    /// Whether displaying in this orientation swaps width and height.
    pub fn transposes_size(self) -> bool {
        matches!(
            self,
            Orientation::Left
                | Orientation::LeftMirrored
                | Orientation::Right
                | Orientation::RightMirrored
        )
    }

    fn rotated_90_clockwise(self) -> Self {
        match self {
            Orientation::Up => Orientation::Right,
            Orientation::Right => Orientation::Bottom,
            Orientation::Bottom => Orientation::Left,
            Orientation::Left => Orientation::Up,
            Orientation::UpMirrored => Orientation::RightMirrored,
            Orientation::RightMirrored => Orientation::BottomMirrored,
            Orientation::BottomMirrored => Orientation::LeftMirrored,
            Orientation::LeftMirrored => Orientation::UpMirrored,
        }
    }

    pub fn rotated(self, degrees: i32) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(TranscodeError::InvalidRequirement(format!(
                "cannot rotate orientation by {degrees} degrees"
            )));
        }
        let steps = degrees.rem_euclid(360) / 90;
        Ok((0..steps).fold(self, |orientation, _| orientation.rotated_90_clockwise()))
    }

    pub fn flipped_horizontally(self) -> Self {
        match self {
            Orientation::Up => Orientation::UpMirrored,
            Orientation::Right => Orientation::RightMirrored,
            Orientation::Bottom => Orientation::BottomMirrored,
            Orientation::Left => Orientation::LeftMirrored,
            Orientation::UpMirrored => Orientation::Up,
            Orientation::RightMirrored => Orientation::Right,
            Orientation::BottomMirrored => Orientation::Bottom,
            Orientation::LeftMirrored => Orientation::Left,
        }
    }

    pub fn flipped_vertically(self) -> Self {
        match self {
            Orientation::Up => Orientation::BottomMirrored,
            Orientation::Right => Orientation::LeftMirrored,
            Orientation::Bottom => Orientation::UpMirrored,
            Orientation::Left => Orientation::RightMirrored,
            Orientation::UpMirrored => Orientation::Bottom,
            Orientation::RightMirrored => Orientation::Left,
            Orientation::BottomMirrored => Orientation::Up,
            Orientation::LeftMirrored => Orientation::Right,
        }
    }

    /// Applies the rotation first, then the horizontal flip, then the vertical flip.
    pub fn rotated_and_flipped(self, rotate: &Rotate) -> Result<Self> {
        let mut result = self.rotated(rotate.degrees)?;
        if rotate.flip_horizontally {
            result = result.flipped_horizontally();
        }
        if rotate.flip_vertically {
            result = result.flipped_vertically();
        }
        Ok(result)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Up => "up",
            Orientation::UpMirrored => "up_mirrored",
            Orientation::Bottom => "bottom",
            Orientation::BottomMirrored => "bottom_mirrored",
            Orientation::LeftMirrored => "left_mirrored",
            Orientation::Right => "right",
            Orientation::RightMirrored => "right_mirrored",
            Orientation::Left => "left",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
