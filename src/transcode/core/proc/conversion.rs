use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::image::{
    Color, ComponentsOrder, PixelSpecification, Scanline, color_models,
};

const FULL_ALPHA: u8 = 255;

/// Component positions inside one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Gray {
        gray: usize,
        alpha: usize,
        has_alpha: bool,
    },
    Rgb {
        red: usize,
        green: usize,
        blue: usize,
        alpha: usize,
        has_alpha: bool,
    },
}

impl Layout {
    /// `None` for colour models other than gray and RGB.
    fn of(specification: &PixelSpecification) -> Result<Option<Self>> {
        if specification.alpha_info.is_premultiplied() {
            return Err(TranscodeError::UnsupportedPremultipliedAlpha);
        }
        let has_alpha = specification.alpha_info.should_interpret_alpha_value();
        let leading_alpha = specification.is_alpha_leading_component();

        if specification.color_model == color_models::GRAY {
            let (gray, alpha) = if leading_alpha { (1, 0) } else { (0, 1) };
            return Ok(Some(Layout::Gray {
                gray,
                alpha,
                has_alpha,
            }));
        }

        if specification.color_model == color_models::RGB {
            let (mut red, green, mut blue, mut alpha) = (0, 1, 2, 3);
            if specification.components_order == ComponentsOrder::Reversed {
                std::mem::swap(&mut red, &mut blue);
            }
            let shift = usize::from(leading_alpha);
            if leading_alpha {
                alpha = 0;
            }
            return Ok(Some(Layout::Rgb {
                red: red + shift,
                green: green + shift,
                blue: blue + shift,
                alpha,
                has_alpha,
            }));
        }

        Ok(None)
    }

    fn has_alpha(&self) -> bool {
        match *self {
            Layout::Gray { has_alpha, .. } | Layout::Rgb { has_alpha, .. } => has_alpha,
        }
    }

    fn alpha(&self) -> usize {
        match *self {
            Layout::Gray { alpha, .. } | Layout::Rgb { alpha, .. } => alpha,
        }
    }
}

/// Converts rows between pixel specifications.
///
/// Gray and RGB layouts convert into each other with any component order and alpha
/// placement. Dropping alpha blends over `background`.
#[derive(Debug, Clone)]
pub struct ScanlineConverter {
    input: PixelSpecification,
    output: PixelSpecification,
    background: Color,
    layouts: Option<(Layout, Layout)>,
}

impl ScanlineConverter {
    pub fn new(
        input: PixelSpecification,
        output: PixelSpecification,
        background: Color,
    ) -> Result<Self> {
        let layouts = if input == output {
            None
        } else {
            let unsupported = || TranscodeError::ScanlineConversionUnsupported {
                from: input.to_string(),
                to: output.to_string(),
            };
            let input_layout = Layout::of(&input)?.ok_or_else(unsupported)?;
            let output_layout = Layout::of(&output)?.ok_or_else(unsupported)?;
            Some((input_layout, output_layout))
        };

        Ok(Self {
            input,
            output,
            background,
            layouts,
        })
    }

    pub fn is_identity(&self) -> bool {
        self.layouts.is_none()
    }

    pub fn convert(&self, scanline: Scanline) -> Result<Scanline> {
        ensure!(
            scanline.specification() == self.input,
            "converter expects {} but got {}",
            self.input,
            scanline.specification()
        );
        let Some((input_layout, output_layout)) = self.layouts else {
            return Ok(scanline);
        };

        let mut output = Scanline::new(self.output, scanline.width());
        for index in 0..scanline.width() {
            let pixel = scanline.pixel(index);
            let target = output.pixel_mut(index);
            self.convert_pixel(input_layout, pixel, output_layout, target);

            if output_layout.has_alpha() {
                target[output_layout.alpha()] = if input_layout.has_alpha() {
                    pixel[input_layout.alpha()]
                } else {
                    FULL_ALPHA
                };
            }
        }
        Ok(output)
    }

    fn convert_pixel(&self, input: Layout, pixel: &[u8], output: Layout, target: &mut [u8]) {
        let blend = input.has_alpha() && !output.has_alpha();
        let alpha = if input.has_alpha() {
            pixel[input.alpha()]
        } else {
            FULL_ALPHA
        };
        let component = |index: usize, background: u8| -> u8 {
            let value = pixel[index];
            if !blend || alpha == FULL_ALPHA {
                value
            } else if alpha == 0 {
                background
            } else {
                let alpha = f32::from(alpha) / f32::from(FULL_ALPHA);
                (alpha * f32::from(value) + (1.0 - alpha) * f32::from(background)) as u8
            }
        };

        let background = self.background;
        match (input, output) {
            (
                Layout::Rgb {
                    red, green, blue, ..
                },
                Layout::Rgb {
                    red: out_red,
                    green: out_green,
                    blue: out_blue,
                    ..
                },
            ) => {
                target[out_red] = component(red, background.red);
                target[out_green] = component(green, background.green);
                target[out_blue] = component(blue, background.blue);
            }
            (
                Layout::Rgb {
                    red, green, blue, ..
                },
                Layout::Gray { gray, .. },
            ) => {
                let sum = u16::from(component(red, background.red))
                    + u16::from(component(green, background.green))
                    + u16::from(component(blue, background.blue));
                target[gray] = (sum / 3) as u8;
            }
            (
                Layout::Gray { gray, .. },
                Layout::Rgb {
                    red, green, blue, ..
                },
            ) => {
                let value = component(gray, background.gray());
                target[red] = value;
                target[green] = value;
                target[blue] = value;
            }
            (Layout::Gray { gray, .. }, Layout::Gray { gray: out_gray, .. }) => {
                target[out_gray] = component(gray, background.gray());
            }
        }
    }
}
