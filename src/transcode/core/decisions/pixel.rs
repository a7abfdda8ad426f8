use crate::transcode::image::{PixelSpecification, PixelSpecificationNarrower, Specification};

/// An explicit requirement wins, then the compressor's narrower, then the input layout.
pub fn calculate_output_pixel_specification(
    input: &Specification,
    requirement: Option<PixelSpecification>,
    narrower: Option<&PixelSpecificationNarrower>,
) -> PixelSpecification {
    match (requirement, narrower) {
        (Some(requirement), _) => requirement,
        (None, Some(narrower)) => narrower(&input.pixel_specification),
        (None, None) => input.pixel_specification,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::transcode::image::{Size, formats, narrow_to_rgb_or_gray, specifications};

    #[test]
    fn precedence() {
        let input = Specification::new(Size::new(1, 1), formats::PNG, specifications::ARGB);
        let narrower: PixelSpecificationNarrower = Arc::new(narrow_to_rgb_or_gray);

        assert_eq!(
            calculate_output_pixel_specification(
                &input,
                Some(specifications::GRAY8),
                Some(&narrower)
            ),
            specifications::GRAY8
        );
        assert_eq!(
            calculate_output_pixel_specification(&input, None, Some(&narrower)),
            specifications::RGBA
        );
        assert_eq!(
            calculate_output_pixel_specification(&input, None, None),
            specifications::ARGB
        );
    }
}
