use std::collections::VecDeque;

use crate::transcode::common::error::{Result, ensure};
use crate::transcode::common::numeric::to_usize;
use crate::transcode::core::proc::block::ScanlineProcessingBlock;
use crate::transcode::image::{PixelSpecification, Rect, Scanline, Size};

/// Keeps the rows and columns inside `crop`.
pub struct CroppingBlock {
    specification: PixelSpecification,
    input_size: Size,
    crop: Rect,
    next_input_row: u32,
    output: VecDeque<Scanline>,
}

impl CroppingBlock {
    pub fn new(specification: PixelSpecification, input_size: Size, crop: Rect) -> Result<Self> {
        ensure!(!input_size.is_empty(), "cropping an empty image");
        ensure!(!crop.size.is_empty(), "empty crop rect {}", crop);
        ensure!(
            input_size.contains(crop.bottom_right()),
            "crop rect {} outside of {}",
            crop,
            input_size
        );

        Ok(Self {
            specification,
            input_size,
            crop,
            next_input_row: 0,
            output: VecDeque::new(),
        })
    }
}

impl ScanlineProcessingBlock for CroppingBlock {
    fn consume(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(scanline.specification() == self.specification);
        ensure!(scanline.width() == to_usize(u64::from(self.input_size.width))?);
        ensure!(
            self.next_input_row < self.input_size.height,
            "more than {} rows fed to crop",
            self.input_size.height
        );

        let row = self.next_input_row;
        self.next_input_row += 1;
        if row < self.crop.min_y() || row >= self.crop.max_y() {
            return Ok(());
        }

        if self.crop.size.width == self.input_size.width {
            self.output.push_back(scanline);
            return Ok(());
        }

        let width = to_usize(u64::from(self.crop.size.width))?;
        let offset = to_usize(u64::from(self.crop.min_x()))?;
        let mut cropped = Scanline::new(self.specification, width);
        for index in 0..width {
            scanline.copy_pixel_to(offset + index, &mut cropped, index);
        }
        self.output.push_back(cropped);
        Ok(())
    }

    fn produce(&mut self) -> Result<Option<Scanline>> {
        Ok(self.output.pop_front())
    }
}
