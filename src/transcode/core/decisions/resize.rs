use std::cmp::Ordering;

use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::{Ratio, Rounding, Size};
use crate::transcode::requirements::{Crop, Resize, ResizeMode};

/// Relative distance to the target under which an image is left unscaled when the resize
/// mode tolerates it.
pub const DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING: f32 = 0.25;

/// Quality classes of a candidate, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResizeRating {
    Optimal = 0,
    GoodWithoutScaling = 1,
    GoodWithScaling = 2,
    BadTooSmall = 3,
    Invalid = 10,
}

/// Primary class plus a secondary distance; lower is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub primary: ResizeRating,
    pub secondary: f32,
}

impl Rating {
    fn new(primary: ResizeRating, secondary: f32) -> Self {
        Self { primary, secondary }
    }

    fn is_better_than(&self, other: &Rating) -> bool {
        match self.primary.cmp(&other.primary) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.secondary < other.secondary,
        }
    }
}

/// How the input is sampled, cropped and scaled to meet the resize and crop requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDecision {
    input_size: Size,
    rating: Rating,
    sampling_ratio: Option<Ratio>,
    size_after_sampling: Option<Size>,
    crop: Option<Crop>,
    size_after_cropping: Option<Size>,
    size_after_scaling: Option<Size>,
}

impl ResizeDecision {
    fn new(input_size: Size) -> Self {
        Self {
            input_size,
            rating: Rating::new(ResizeRating::Optimal, 0.0),
            sampling_ratio: None,
            size_after_sampling: None,
            crop: None,
            size_after_cropping: None,
            size_after_scaling: None,
        }
    }

    fn rate(mut self, primary: ResizeRating, secondary: f32) -> Self {
        self.rating = Rating::new(primary, secondary);
        self
    }

    fn scaling(mut self, size_after_scaling: Size) -> Self {
        self.size_after_scaling = Some(size_after_scaling);
        self
    }

    fn cropping(mut self, crop: Crop, size_after_cropping: Size) -> Self {
        self.crop = Some(crop);
        self.size_after_cropping = Some(size_after_cropping);
        self
    }

    fn sampling(mut self, ratio: Ratio, size_after_sampling: Size) -> Self {
        self.sampling_ratio = Some(ratio);
        self.size_after_sampling = Some(size_after_sampling);
        self
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Ratio to hand to the decompressor, if sampling was chosen.
    pub fn sampling_ratio(&self) -> Option<Ratio> {
        self.sampling_ratio
    }

    /// Crop in sampled coordinates.
    pub fn crop(&self) -> Option<&Crop> {
        self.crop.as_ref()
    }

    pub fn should_crop(&self) -> bool {
        self.crop.is_some()
    }

    pub fn should_scale(&self) -> bool {
        self.size_after_scaling.is_some()
    }

    pub fn size_after_sampling(&self) -> Size {
        self.size_after_sampling.unwrap_or(self.input_size)
    }

    pub fn size_after_cropping(&self) -> Size {
        self.size_after_cropping
            .unwrap_or_else(|| self.size_after_sampling())
    }

    pub fn size_after_scaling(&self) -> Size {
        self.size_after_scaling
            .unwrap_or_else(|| self.size_after_cropping())
    }
}

fn relative_delta(actual: u32, target: u32) -> f32 {
    (1.0 - actual as f32 / target as f32).abs()
}

fn decide_scaling(
    input_size: Size,
    size_after_cropping: Size,
    resize: Option<&Resize>,
    threshold: f32,
) -> Result<ResizeDecision> {
    let decision = ResizeDecision::new(input_size);
    let Some(resize) = resize else {
        return Ok(decision.rate(ResizeRating::GoodWithoutScaling, 0.0));
    };

    let target = resize.target_size;
    if target == size_after_cropping {
        return Ok(decision.rate(ResizeRating::Optimal, 0.0));
    }

    let is_smaller = target.covers(&size_after_cropping);
    let is_larger = !is_smaller;

    let delta_width = relative_delta(size_after_cropping.width, target.width);
    let delta_height = relative_delta(size_after_cropping.height, target.height);
    let delta_min = delta_width.min(delta_height);
    let delta_max = delta_width.max(delta_height);
    let within_threshold = delta_min <= threshold;

    if is_smaller && resize.mode == ResizeMode::ExactOrSmaller && within_threshold {
        return Ok(decision.rate(ResizeRating::GoodWithoutScaling, delta_min));
    }
    if is_larger && resize.mode == ResizeMode::ExactOrLarger && within_threshold {
        return Ok(decision.rate(ResizeRating::GoodWithoutScaling, delta_min));
    }

    if is_larger {
        Ok(decision
            .scaling(size_after_cropping.downscaled_to_fit(&target)?)
            .rate(ResizeRating::GoodWithScaling, delta_max))
    } else {
        Ok(decision.rate(ResizeRating::BadTooSmall, delta_min))
    }
}

fn decide_cropping(
    input_size: Size,
    size_after_sampling: Size,
    resize: Option<&Resize>,
    crop: Option<Crop>,
    threshold: f32,
) -> Result<ResizeDecision> {
    match crop {
        None => decide_scaling(input_size, size_after_sampling, resize, threshold),
        Some(crop) => {
            let size_after_cropping = crop.apply(size_after_sampling)?.size;
            Ok(
                decide_scaling(input_size, size_after_cropping, resize, threshold)?
                    .cropping(crop, size_after_cropping),
            )
        }
    }
}

fn decide_sampling(
    input_size: Size,
    ratio: Option<Ratio>,
    crop: Option<Crop>,
    resize: Option<&Resize>,
    threshold: f32,
) -> Result<ResizeDecision> {
    let Some(ratio) = ratio else {
        return decide_cropping(input_size, input_size, resize, crop, threshold);
    };

    let Ok(size_after_sampling) = input_size.scaled(ratio, Rounding::Up) else {
        return Ok(ResizeDecision::new(input_size).rate(ResizeRating::Invalid, 0.0));
    };
    let sampled_crop = match crop {
        Some(crop) if !ratio.is_one() => Some(crop.scaled(ratio)?),
        other => other,
    };

    match decide_cropping(input_size, size_after_sampling, resize, sampled_crop, threshold) {
        Ok(decision) => Ok(decision.sampling(ratio, size_after_sampling)),
        // the crop vanished at this ratio; the full-size candidate already accepted it
        Err(TranscodeError::InvalidRequirement(_)) => {
            Ok(ResizeDecision::new(input_size).rate(ResizeRating::Invalid, 0.0))
        }
        Err(err) => Err(err),
    }
}

/// Picks the best of decoding at full size or at any supported sampling ratio.
pub fn calculate_resize_decision(
    input_size: Size,
    resize: Option<&Resize>,
    sampling_ratios: &[Ratio],
    crop: Option<&Crop>,
    threshold: f32,
) -> Result<ResizeDecision> {
    let crop = crop.copied();
    if let Some(resize) = resize {
        resize.validate()?;
    }

    if resize.is_none() {
        let decision = ResizeDecision::new(input_size);
        return match crop {
            Some(crop) => {
                let size_after_cropping = crop.apply(input_size)?.size;
                Ok(decision.cropping(crop, size_after_cropping))
            }
            None => Ok(decision),
        };
    }

    let mut best = decide_sampling(input_size, None, crop, resize, threshold)?;
    for ratio in sampling_ratios {
        // decoders never upscale
        if ratio.numerator > ratio.denominator {
            continue;
        }
        let candidate = decide_sampling(input_size, Some(*ratio), crop, resize, threshold)?;
        if candidate.rating.is_better_than(&best.rating) {
            best = candidate;
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::image::Rect;
    use crate::transcode::requirements::RelativeEdges;

    fn decide(input: Size, resize: Option<Resize>, ratios: &[Ratio]) -> ResizeDecision {
        calculate_resize_decision(
            input,
            resize.as_ref(),
            ratios,
            None,
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap()
    }

    #[test]
    fn no_requirements_is_a_noop() {
        let decision = decide(Size::new(100, 50), None, &[Ratio::new(1, 2)]);
        assert!(!decision.should_crop());
        assert!(!decision.should_scale());
        assert_eq!(decision.sampling_ratio(), None);
        assert_eq!(decision.size_after_scaling(), Size::new(100, 50));
    }

    #[test]
    fn crop_without_resize() {
        let crop = Crop::rect(Rect::new(10, 10, 20, 30), true).unwrap();
        let decision = calculate_resize_decision(
            Size::new(100, 50),
            None,
            &[],
            Some(&crop),
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap();
        assert!(decision.should_crop());
        assert!(!decision.should_scale());
        assert_eq!(decision.size_after_cropping(), Size::new(20, 30));
    }

    #[test]
    fn exact_target_is_optimal() {
        let decision = decide(Size::new(64, 64), Some(Resize::exact(Size::new(64, 64))), &[]);
        assert_eq!(decision.rating().primary, ResizeRating::Optimal);
        assert!(!decision.should_scale());
    }

    #[test]
    fn larger_input_is_downscaled_to_fit() {
        let decision = decide(
            Size::new(400, 200),
            Some(Resize::exact(Size::new(100, 100))),
            &[],
        );
        assert_eq!(decision.rating().primary, ResizeRating::GoodWithScaling);
        assert!(decision.should_scale());
        assert_eq!(decision.size_after_scaling(), Size::new(100, 50));
    }

    #[test]
    fn sampling_ratio_hitting_target_wins() {
        let decision = decide(
            Size::new(400, 200),
            Some(Resize::exact(Size::new(100, 50))),
            &[Ratio::new(1, 2), Ratio::new(1, 4), Ratio::new(2, 1)],
        );
        assert_eq!(decision.sampling_ratio(), Some(Ratio::new(1, 4)));
        assert_eq!(decision.size_after_sampling(), Size::new(100, 50));
        assert_eq!(decision.rating().primary, ResizeRating::Optimal);
        assert!(!decision.should_scale());
    }

    #[test]
    fn sampling_never_goes_below_target() {
        // 1/8 gives 50x25, too small for 120x60
        let decision = decide(
            Size::new(400, 200),
            Some(Resize::exact(Size::new(120, 60))),
            &[Ratio::new(1, 2), Ratio::new(1, 8)],
        );
        assert_eq!(decision.sampling_ratio(), Some(Ratio::new(1, 2)));
        assert_eq!(decision.size_after_scaling(), Size::new(120, 60));
    }

    #[test]
    fn exact_or_smaller_skips_small_deltas() {
        let decision = decide(
            Size::new(90, 90),
            Some(Resize::new(ResizeMode::ExactOrSmaller, Size::new(100, 100))),
            &[],
        );
        assert_eq!(decision.rating().primary, ResizeRating::GoodWithoutScaling);
        assert!(!decision.should_scale());

        let too_small = decide(
            Size::new(10, 10),
            Some(Resize::new(ResizeMode::ExactOrSmaller, Size::new(100, 100))),
            &[],
        );
        assert_eq!(too_small.rating().primary, ResizeRating::BadTooSmall);
    }

    #[test]
    fn exact_or_larger_keeps_slightly_larger_input() {
        let decision = decide(
            Size::new(110, 105),
            Some(Resize::new(ResizeMode::ExactOrLarger, Size::new(100, 100))),
            &[],
        );
        assert_eq!(decision.rating().primary, ResizeRating::GoodWithoutScaling);
        assert_eq!(decision.size_after_scaling(), Size::new(110, 105));
    }

    #[test]
    fn relative_crop_follows_sampling() {
        let crop = Crop::relative_to_origin(
            RelativeEdges {
                top: 0.0,
                left: 0.0,
                bottom: 0.5,
                right: 0.5,
            },
            true,
        )
        .unwrap();
        let resize = Resize::exact(Size::new(50, 50));
        let decision = calculate_resize_decision(
            Size::new(200, 200),
            Some(&resize),
            &[Ratio::new(1, 2)],
            Some(&crop),
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap();

        assert_eq!(decision.sampling_ratio(), Some(Ratio::new(1, 2)));
        assert_eq!(decision.size_after_sampling(), Size::new(100, 100));
        assert_eq!(decision.size_after_cropping(), Size::new(50, 50));
        assert!(!decision.should_scale());
    }

    #[test]
    fn zero_resize_target_is_rejected_up_front() {
        let resize = Resize::exact(Size::new(0, 0));
        let err = calculate_resize_decision(
            Size::new(10, 10),
            Some(&resize),
            &[Ratio::new(1, 2)],
            None,
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidRequirement(_)));
        assert!(err.is_caller_error());
    }

    #[test]
    fn crop_vanishing_under_sampling_rules_out_that_ratio() {
        let crop = Crop::rect(Rect::new(0, 0, 1, 1), true).unwrap();
        let resize = Resize::exact(Size::new(1, 1));
        let decision = calculate_resize_decision(
            Size::new(8, 8),
            Some(&resize),
            &[Ratio::new(1, 8)],
            Some(&crop),
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap();
        assert_eq!(decision.sampling_ratio(), None);
        assert_eq!(decision.size_after_cropping(), Size::new(1, 1));
        assert_eq!(decision.rating().primary, ResizeRating::Optimal);
    }

    #[test]
    fn empty_relative_crop_is_a_caller_error() {
        let crop = Crop::relative_to_origin(
            RelativeEdges {
                top: 0.0,
                left: 0.0,
                bottom: 1.0,
                right: 0.04,
            },
            true,
        )
        .unwrap();
        let err = calculate_resize_decision(
            Size::new(10, 10),
            None,
            &[],
            Some(&crop),
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )
        .unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidRequirement(_)));
    }
}
