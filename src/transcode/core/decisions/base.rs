use tracing::debug;

use crate::transcode::common::error::Result;
use crate::transcode::core::decisions::{
    DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING, OrientationDecision, ResizeDecision,
    calculate_output_chroma_sampling_mode, calculate_output_metadata,
    calculate_output_pixel_specification, calculate_resize_decision,
};
use crate::transcode::core::operation::Operation;
use crate::transcode::image::Specification;

/// Every choice the base recipe needs, derived before any byte is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseDecision {
    pub resize: ResizeDecision,
    pub orientation: OrientationDecision,
    pub output_image_specification: Specification,
}

impl BaseDecision {
    pub fn calculate(operation: &Operation<'_>) -> Result<Self> {
        let parameters = &operation.parameters;
        let codecs = &operation.codecs;
        let input = &parameters.input_image_specification;
        let transformations = &parameters.transformations;

        let resize = calculate_resize_decision(
            input.size,
            transformations.resize.as_ref(),
            &codecs.decompressor_provider.supported_sampling_ratios,
            transformations.crop.as_ref(),
            DEFAULT_THRESHOLD_FOR_SKIPPING_SCALING,
        )?;
        debug!(
            sampling_ratio = ?resize.sampling_ratio(),
            should_crop = resize.should_crop(),
            should_scale = resize.should_scale(),
            size_after_scaling = %resize.size_after_scaling(),
            "Resize decision"
        );

        let orientation = OrientationDecision::calculate(
            transformations.rotate.as_ref(),
            input.orientation,
            resize.size_after_scaling(),
            &operation.configuration,
            codecs.compressor_provider.supports_setting_metadata,
        )?;
        debug!(
            pixels = %orientation.orientation,
            metadata = %orientation.metadata_orientation,
            size = %orientation.size,
            "Orientation decision"
        );

        let compressor_provider = &codecs.compressor_provider;
        let output_image_specification = Specification {
            size: orientation.size,
            format: parameters.output_image_format,
            pixel_specification: calculate_output_pixel_specification(
                input,
                parameters.output_pixel_specification_requirement,
                compressor_provider.pixel_specification_narrower.as_ref(),
            ),
            orientation: orientation.metadata_orientation,
            chroma_sampling_mode: Some(calculate_output_chroma_sampling_mode(
                input,
                &compressor_provider.supported_chroma_sampling_modes,
                &operation.configuration,
            )?),
            metadata: calculate_output_metadata(
                input,
                parameters.extra_metadata.as_ref(),
                orientation.metadata_orientation,
                compressor_provider.supports_setting_metadata,
            )?,
        };

        Ok(Self {
            resize,
            orientation,
            output_image_specification,
        })
    }
}
