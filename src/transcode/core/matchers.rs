use std::fmt;

use crate::transcode::core::operation::Parameters;
use crate::transcode::core::rule::{CropSupport, ResizeSupport, RotateSupport, Rule};
use crate::transcode::image::Format;
use crate::transcode::requirements::{Crop, EncodeMode, Resize, ResizeMode, Rotate};

/// Why a rule was rejected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    InputImageFormatUnsupported,
    OutputImageFormatUnsupported,
    EqualInputOutputImageFormatFalse,
    PassthroughDenied,
    ResizeUnsupported,
    CropUnsupported,
    RotateUnsupported,
}

impl MismatchReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InputImageFormatUnsupported => "characteristic_matcher_input_format_unsupported",
            Self::OutputImageFormatUnsupported => {
                "characteristic_matcher_output_format_unsupported"
            }
            Self::EqualInputOutputImageFormatFalse => {
                "characteristic_matcher_equal_input_output_format_false"
            }
            Self::PassthroughDenied => "characteristic_matcher_passthrough_denied",
            Self::ResizeUnsupported => "characteristic_matcher_resize_unsupported",
            Self::CropUnsupported => "characteristic_matcher_crop_unsupported",
            Self::RotateUnsupported => "characteristic_matcher_rotate_unsupported",
        }
    }
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type MatchResult = std::result::Result<(), MismatchReason>;

/// One pure check of a rule against a request.
pub trait RequirementMatcher: Send + Sync {
    fn matches(&self, rule: &Rule, parameters: &Parameters) -> MatchResult;
}

impl<F> RequirementMatcher for F
where
    F: Fn(&Rule, &Parameters) -> MatchResult + Send + Sync,
{
    fn matches(&self, rule: &Rule, parameters: &Parameters) -> MatchResult {
        self(rule, parameters)
    }
}

/// The built-in matchers in evaluation order.
pub fn all() -> Vec<Box<dyn RequirementMatcher>> {
    vec![
        Box::new(matches_allowed_input_format),
        Box::new(matches_allowed_output_format),
        Box::new(matches_equal_input_output_format),
        Box::new(matches_passthrough),
        Box::new(matches_resize),
        Box::new(matches_crop),
        Box::new(matches_rotate),
    ]
}

fn check(condition: bool, reason: MismatchReason) -> MatchResult {
    if condition { Ok(()) } else { Err(reason) }
}

fn is_allowed(allowed: &[Format], format: &Format) -> bool {
    allowed.is_empty() || allowed.contains(format)
}

pub fn matches_allowed_input_format(rule: &Rule, parameters: &Parameters) -> MatchResult {
    check(
        is_allowed(
            &rule.allowed_input_formats,
            &parameters.input_image_specification.format,
        ),
        MismatchReason::InputImageFormatUnsupported,
    )
}

pub fn matches_allowed_output_format(rule: &Rule, parameters: &Parameters) -> MatchResult {
    check(
        is_allowed(&rule.allowed_output_formats, &parameters.output_image_format),
        MismatchReason::OutputImageFormatUnsupported,
    )
}

/// Equal formats with a forced different pixel layout do not count as equal.
pub fn matches_equal_input_output_format(rule: &Rule, parameters: &Parameters) -> MatchResult {
    if !rule.requires_equal_input_output_format {
        return Ok(());
    }
    let input = &parameters.input_image_specification;
    let same_pixels = parameters
        .output_pixel_specification_requirement
        .is_none_or(|requested| requested == input.pixel_specification);
    check(
        input.format == parameters.output_image_format && same_pixels,
        MismatchReason::EqualInputOutputImageFormatFalse,
    )
}

pub fn matches_passthrough(rule: &Rule, parameters: &Parameters) -> MatchResult {
    if !rule.is_passthrough {
        return Ok(());
    }
    let forces_reencode = parameters
        .encode_requirement
        .is_some_and(|encode| encode.mode != EncodeMode::Any);
    let injects_metadata = parameters
        .extra_metadata
        .as_ref()
        .is_some_and(|metadata| !metadata.is_empty());
    check(
        !forces_reencode && !injects_metadata,
        MismatchReason::PassthroughDenied,
    )
}

fn supports_resize(support: ResizeSupport, resize: &Resize) -> bool {
    match support {
        ResizeSupport::None => false,
        ResizeSupport::Exact => true,
        ResizeSupport::ExactOrSmaller => resize.mode == ResizeMode::ExactOrSmaller,
        ResizeSupport::ExactOrLarger => resize.mode == ResizeMode::ExactOrLarger,
    }
}

pub fn matches_resize(rule: &Rule, parameters: &Parameters) -> MatchResult {
    check(
        parameters
            .transformations
            .resize
            .is_none_or(|resize| supports_resize(rule.resize_support, &resize)),
        MismatchReason::ResizeUnsupported,
    )
}

fn supports_crop(support: CropSupport, crop: &Crop) -> bool {
    match support {
        CropSupport::None => false,
        CropSupport::Exact => true,
        CropSupport::Approximate => !crop.must_be_exact,
    }
}

pub fn matches_crop(rule: &Rule, parameters: &Parameters) -> MatchResult {
    check(
        parameters
            .transformations
            .crop
            .as_ref()
            .is_none_or(|crop| supports_crop(rule.crop_support, crop)),
        MismatchReason::CropUnsupported,
    )
}

fn supports_rotate(support: RotateSupport, rotate: &Rotate) -> bool {
    let multiple_of_90 = rotate.degrees % 90 == 0;
    let multiple_of_180 = rotate.degrees % 180 == 0;
    match support {
        // force_up_orientation alone is not a no-op; it may rotate
        RotateSupport::None => rotate.is_noop(),
        RotateSupport::MultipleOf90 => {
            multiple_of_90 && !rotate.flip() && !rotate.force_up_orientation
        }
        RotateSupport::MultipleOf180 => {
            multiple_of_180 && !rotate.flip() && !rotate.force_up_orientation
        }
        RotateSupport::MultipleOf90Flip => multiple_of_90,
    }
}

pub fn matches_rotate(rule: &Rule, parameters: &Parameters) -> MatchResult {
    check(
        parameters
            .transformations
            .rotate
            .is_none_or(|rotate| supports_rotate(rule.rotate_support, &rotate)),
        MismatchReason::RotateUnsupported,
    )
}
