//! Pixel layouts.

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorModel {
    pub identifier: &'static str,
    pub number_of_color_components: u8,
    pub supports_extra_alpha_channel: bool,
}

pub mod color_models {
    use super::ColorModel;

    pub const GRAY: ColorModel = ColorModel {
        identifier: "gray",
        number_of_color_components: 1,
        supports_extra_alpha_channel: true,
    };
    pub const RGB: ColorModel = ColorModel {
        identifier: "rgb",
        number_of_color_components: 3,
        supports_extra_alpha_channel: true,
    };
    pub const CMYK: ColorModel = ColorModel {
        identifier: "cmyk",
        number_of_color_components: 4,
        supports_extra_alpha_channel: false,
    };
    pub const YCBCR: ColorModel = ColorModel {
        identifier: "ycbcr",
        number_of_color_components: 3,
        supports_extra_alpha_channel: false,
    };
    pub const YCBCRK: ColorModel = ColorModel {
        identifier: "ycbcrk",
        number_of_color_components: 4,
        supports_extra_alpha_channel: false,
    };
    pub const UNKNOWN: ColorModel = ColorModel {
        identifier: "unknown",
        number_of_color_components: 0,
        supports_extra_alpha_channel: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaInfo {
    #[default]
    None,
    First,
    Last,
    SkipFirst,
    SkipLast,
    PremultipliedFirst,
    PremultipliedLast,
}

impl AlphaInfo {
    pub fn is_first(self) -> bool {
        matches!(
            self,
            AlphaInfo::First | AlphaInfo::SkipFirst | AlphaInfo::PremultipliedFirst
        )
    }

    pub fn is_last(self) -> bool {
        matches!(
            self,
            AlphaInfo::Last | AlphaInfo::SkipLast | AlphaInfo::PremultipliedLast
        )
    }

    pub fn is_premultiplied(self) -> bool {
        matches!(
            self,
            AlphaInfo::PremultipliedFirst | AlphaInfo::PremultipliedLast
        )
    }

    /// False for `None` and the padding-only `Skip*` variants.
    pub fn should_interpret_alpha_value(self) -> bool {
        matches!(
            self,
            AlphaInfo::First
                | AlphaInfo::Last
                | AlphaInfo::PremultipliedFirst
                | AlphaInfo::PremultipliedLast
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentsOrder {
    #[default]
    Natural,
    Reversed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelSpecification {
    pub color_model: ColorModel,
    pub bytes_per_pixel: u8,
    pub alpha_info: AlphaInfo,
    pub components_order: ComponentsOrder,
}

impl PixelSpecification {
    pub const fn new(
        color_model: ColorModel,
        bytes_per_pixel: u8,
        alpha_info: AlphaInfo,
        components_order: ComponentsOrder,
    ) -> Self {
        Self {
            color_model,
            bytes_per_pixel,
            alpha_info,
            components_order,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.color_model.supports_extra_alpha_channel && self.alpha_info != AlphaInfo::None
    }

    pub fn number_of_components(&self) -> u8 {
        let color = self.color_model.number_of_color_components;
        if self.has_alpha() { color + 1 } else { color }
    }

    /// Whether the alpha (or padding) byte is stored before the colour components.
    pub fn is_alpha_leading_component(&self) -> bool {
        (self.alpha_info.is_first() && self.components_order == ComponentsOrder::Natural)
            || (self.alpha_info.is_last() && self.components_order == ComponentsOrder::Reversed)
    }
}

impl fmt::Display for PixelSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}B/{:?}/{:?}",
            self.color_model.identifier,
            self.bytes_per_pixel,
            self.alpha_info,
            self.components_order
        )
    }
}

pub mod specifications {
    use super::color_models::{GRAY, RGB as RGB_MODEL, YCBCR as YCBCR_MODEL};
    use super::{AlphaInfo, ComponentsOrder, PixelSpecification};

    pub const GRAY8: PixelSpecification =
        PixelSpecification::new(GRAY, 1, AlphaInfo::None, ComponentsOrder::Natural);
    pub const GRAY_A: PixelSpecification =
        PixelSpecification::new(GRAY, 2, AlphaInfo::Last, ComponentsOrder::Natural);
    pub const A_GRAY: PixelSpecification =
        PixelSpecification::new(GRAY, 2, AlphaInfo::First, ComponentsOrder::Natural);
    pub const RGB: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 3, AlphaInfo::None, ComponentsOrder::Natural);
    pub const RGBA: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::Last, ComponentsOrder::Natural);
    pub const RGBX: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::SkipLast, ComponentsOrder::Natural);
    pub const ARGB: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::First, ComponentsOrder::Natural);
    pub const XRGB: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::SkipFirst, ComponentsOrder::Natural);
    pub const BGR: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 3, AlphaInfo::None, ComponentsOrder::Reversed);
    pub const BGRA: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::First, ComponentsOrder::Reversed);
    pub const BGRX: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::SkipFirst, ComponentsOrder::Reversed);
    pub const ABGR: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::Last, ComponentsOrder::Reversed);
    pub const XBGR: PixelSpecification =
        PixelSpecification::new(RGB_MODEL, 4, AlphaInfo::SkipLast, ComponentsOrder::Reversed);
    pub const YCBCR: PixelSpecification =
        PixelSpecification::new(YCBCR_MODEL, 3, AlphaInfo::None, ComponentsOrder::Natural);
}

/// Maps an input pixel specification to the closest one a compressor accepts.
pub type PixelSpecificationNarrower =
    Arc<dyn Fn(&PixelSpecification) -> PixelSpecification + Send + Sync>;

/// Narrows anything to 8-bit gray, RGB or RGBA.
pub fn narrow_to_rgb_or_gray(input: &PixelSpecification) -> PixelSpecification {
    let keeps_alpha = input.alpha_info.should_interpret_alpha_value();
    match (input.color_model == color_models::GRAY, keeps_alpha) {
        (true, false) => specifications::GRAY8,
        (_, true) => specifications::RGBA,
        (false, false) => specifications::RGB,
    }
}
