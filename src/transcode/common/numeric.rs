//! Checked numeric narrowing.
//!
//! Every narrowing conversion in the pipeline goes through these helpers so a value out of
//! range becomes a typed error instead of a silent truncation.

use crate::transcode::common::error::{Result, TranscodeError};

pub fn to_u32<T>(value: T) -> Result<u32>
where
    T: TryInto<u32> + Copy + std::fmt::Display + PartialOrd + Default,
{
    value.try_into().map_err(|_| {
        if value < T::default() {
            TranscodeError::NumericUnderflow(format!("{value} to u32"))
        } else {
            TranscodeError::NumericOverflow(format!("{value} to u32"))
        }
    })
}

pub fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| TranscodeError::NumericOverflow(format!("{value} to usize")))
}

/// Converts a finite, non-negative float to `u32`, failing on NaN or out-of-range values.
pub fn f32_to_u32(value: f32) -> Result<u32> {
    if value.is_nan() {
        return Err(TranscodeError::NumericOverflow("NaN to u32".to_string()));
    }
    if value < 0.0 {
        return Err(TranscodeError::NumericUnderflow(format!("{value} to u32")));
    }
    if value > u32::MAX as f32 {
        return Err(TranscodeError::NumericOverflow(format!("{value} to u32")));
    }
    Ok(value as u32)
}

/// `a * b` for pixel counts and byte lengths.
pub fn checked_mul(a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b)
        .ok_or_else(|| TranscodeError::NumericOverflow(format!("{a} * {b}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_reports_direction() {
        assert_eq!(to_u32(12_i64).unwrap(), 12);
        assert!(matches!(to_u32(-1_i64), Err(TranscodeError::NumericUnderflow(_))));
        assert!(matches!(
            to_u32(u64::MAX),
            Err(TranscodeError::NumericOverflow(_))
        ));
    }

    #[test]
    fn float_conversion_rejects_nan_and_negative() {
        assert_eq!(f32_to_u32(3.9).unwrap(), 3);
        assert!(f32_to_u32(f32::NAN).is_err());
        assert!(matches!(f32_to_u32(-0.5), Err(TranscodeError::NumericUnderflow(_))));
        assert!(matches!(f32_to_u32(1e12), Err(TranscodeError::NumericOverflow(_))));
    }
}
