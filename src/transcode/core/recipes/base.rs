use tracing::{debug, info_span, instrument};

use crate::transcode::common::error::Result;
use crate::transcode::core::decisions::BaseDecision;
use crate::transcode::core::operation::Operation;
use crate::transcode::core::proc::pump::{ScanlineConsumer, ScanlineGenerator};
use crate::transcode::core::proc::{
    CroppingBlock, RotationBlock, ScalingBlock, ScanlineConverter, ScanlineProcessingBlock,
    ScanlinePump,
};
use crate::transcode::core::recipes::Recipe;
use crate::transcode::core::rule::{CropSupport, ResizeSupport, RotateSupport, Rule};
use crate::transcode::image::{Scanline, Specification};

/// Decode, transform scanline by scanline, encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseRecipe;

impl BaseRecipe {
    pub const RULE_NAME: &'static str = "base";

    pub fn rule() -> Rule {
        Rule::new(Self::RULE_NAME, || Box::new(BaseRecipe))
            .with_crop_support(CropSupport::Exact)
            .with_resize_support(ResizeSupport::Exact)
            .with_rotate_support(RotateSupport::MultipleOf90Flip)
    }

    fn processing_blocks<'b>(
        decision: &BaseDecision,
        operation: &Operation<'_>,
    ) -> Result<Vec<Box<dyn ScanlineProcessingBlock + 'b>>> {
        let pixel_specification = operation
            .parameters
            .input_image_specification
            .pixel_specification;
        let resize = &decision.resize;
        let mut blocks: Vec<Box<dyn ScanlineProcessingBlock + 'b>> = Vec::new();

        if let Some(crop) = resize.crop() {
            let input_size = resize.size_after_sampling();
            let rect = crop.apply(input_size)?;
            debug!(%rect, %input_size, "Cropping");
            blocks.push(Box::new(CroppingBlock::new(
                pixel_specification,
                input_size,
                rect,
            )?));
        }

        if resize.should_scale() {
            let method = operation.configuration.general.sampling_method();
            debug!(
                from = %resize.size_after_cropping(),
                to = %resize.size_after_scaling(),
                ?method,
                "Scaling"
            );
            blocks.push(Box::new(ScalingBlock::new(
                pixel_specification,
                resize.size_after_cropping(),
                resize.size_after_scaling(),
                method,
            )?));
        }

        if decision.orientation.should_rotate_pixels() {
            debug!(orientation = %decision.orientation.orientation, "Rotating pixels");
            blocks.push(Box::new(RotationBlock::new(
                pixel_specification,
                resize.size_after_scaling(),
                decision.orientation.orientation,
            )?));
        }

        Ok(blocks)
    }
}

impl Recipe for BaseRecipe {
    #[instrument(
        name = "base_recipe",
        skip_all,
        fields(
            input = %operation.parameters.input_image_specification,
            output_format = %operation.parameters.output_image_format,
        )
    )]
    fn perform(&self, operation: &mut Operation<'_>) -> Result<Specification> {
        let decision = BaseDecision::calculate(operation)?;
        let blocks = Self::processing_blocks(&decision, operation)?;
        let converter = ScanlineConverter::new(
            operation
                .parameters
                .input_image_specification
                .pixel_specification,
            decision.output_image_specification.pixel_specification,
            operation.configuration.general.default_background_color(),
        )?;

        let (mut decompressor, mut compressor) = operation.make_codecs(
            decision.resize.sampling_ratio(),
            decision.output_image_specification.clone(),
        )?;
        let num_input_scanlines = decompressor.output_image_specification().size.height;

        {
            let _span = info_span!("pump", rows = num_input_scanlines).entered();
            let generator: ScanlineGenerator<'_> =
                Box::new(|| -> Result<Option<Scanline>> { decompressor.read_scanline() });
            let consumer: ScanlineConsumer<'_> = Box::new(|scanline: Scanline| -> Result<()> {
                compressor.write_scanline(converter.convert(scanline)?)
            });
            ScanlinePump::new(generator, blocks, consumer, num_input_scanlines).pump_all()?;
        }

        compressor.finish()?;
        Ok(decision.output_image_specification)
    }
}
