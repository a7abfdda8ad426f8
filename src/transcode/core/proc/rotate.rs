use crate::transcode::common::error::{Result, ensure};
use crate::transcode::common::numeric::to_usize;
use crate::transcode::core::proc::block::ScanlineProcessingBlock;
use crate::transcode::image::{Orientation, PixelSpecification, Scanline, Size};

/// Applies an orientation to the pixels.
///
/// Transposing orientations read whole columns, so every orientation buffers the complete
/// input before emitting its first row.
pub struct RotationBlock {
    specification: PixelSpecification,
    orientation: Orientation,
    input_width: usize,
    input_height: usize,
    output_width: usize,
    output_height: usize,
    input: Vec<Scanline>,
    next_output_row: usize,
}

impl RotationBlock {
    pub fn new(
        specification: PixelSpecification,
        input_size: Size,
        orientation: Orientation,
    ) -> Result<Self> {
        ensure!(
            orientation != Orientation::Up,
            "rotation block built for the identity orientation"
        );
        let output_size = input_size.oriented(orientation);

        Ok(Self {
            specification,
            orientation,
            input_width: to_usize(u64::from(input_size.width))?,
            input_height: to_usize(u64::from(input_size.height))?,
            output_width: to_usize(u64::from(output_size.width))?,
            output_height: to_usize(u64::from(output_size.height))?,
            input: Vec::new(),
            next_output_row: 0,
        })
    }

    /// Source row and pixel feeding pixel `index` of output row `row`.
    fn source_of(&self, row: usize, index: usize) -> (usize, usize) {
        let (width, height) = (self.input_width, self.input_height);
        match self.orientation {
            Orientation::Up => (row, index),
            Orientation::UpMirrored => (row, width - index - 1),
            Orientation::Right => (height - index - 1, row),
            Orientation::RightMirrored => (height - index - 1, width - row - 1),
            Orientation::Bottom => (height - row - 1, width - index - 1),
            Orientation::BottomMirrored => (height - row - 1, index),
            Orientation::Left => (index, width - row - 1),
            Orientation::LeftMirrored => (index, row),
        }
    }
}

impl ScanlineProcessingBlock for RotationBlock {
    fn consume(&mut self, scanline: Scanline) -> Result<()> {
        ensure!(scanline.specification() == self.specification);
        ensure!(scanline.width() == self.input_width);
        ensure!(
            self.input.len() < self.input_height,
            "more than {} rows fed to rotation",
            self.input_height
        );
        ensure!(self.next_output_row == 0, "row fed after rotation started emitting");

        self.input.push(scanline);
        Ok(())
    }

    fn produce(&mut self) -> Result<Option<Scanline>> {
        if self.input.len() < self.input_height || self.next_output_row >= self.output_height {
            return Ok(None);
        }

        let row = self.next_output_row;
        let mut output = Scanline::new(self.specification, self.output_width);
        for index in 0..self.output_width {
            let (source_row, source_index) = self.source_of(row, index);
            self.input[source_row].copy_pixel_to(source_index, &mut output, index);
        }

        self.next_output_row += 1;
        if self.next_output_row == self.output_height {
            self.input = Vec::new();
        }
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::image::specifications;

    fn run(orientation: Orientation, rows: &[Vec<u8>]) -> Vec<Vec<u8>> {
        let size = Size::new(rows[0].len() as u32, rows.len() as u32);
        let mut block = RotationBlock::new(specifications::GRAY8, size, orientation).unwrap();
        let mut output = Vec::new();
        for row in rows {
            block
                .consume(Scanline::from_bytes(specifications::GRAY8, row.clone()).unwrap())
                .unwrap();
            while let Some(scanline) = block.produce().unwrap() {
                output.push(scanline.into_bytes());
            }
        }
        output
    }

    /// 3x2 gray image with distinct pixel values.
    ///
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    fn image() -> Vec<Vec<u8>> {
        vec![vec![1, 2, 3], vec![4, 5, 6]]
    }

    #[test]
    fn every_orientation() {
        let cases: [(Orientation, Vec<Vec<u8>>); 7] = [
            (Orientation::UpMirrored, vec![vec![3, 2, 1], vec![6, 5, 4]]),
            (Orientation::Right, vec![vec![4, 1], vec![5, 2], vec![6, 3]]),
            (Orientation::RightMirrored, vec![vec![6, 3], vec![5, 2], vec![4, 1]]),
            (Orientation::Bottom, vec![vec![6, 5, 4], vec![3, 2, 1]]),
            (Orientation::BottomMirrored, vec![vec![4, 5, 6], vec![1, 2, 3]]),
            (Orientation::Left, vec![vec![3, 6], vec![2, 5], vec![1, 4]]),
            (Orientation::LeftMirrored, vec![vec![1, 4], vec![2, 5], vec![3, 6]]),
        ];

        for (orientation, expected) in cases {
            assert_eq!(run(orientation, &image()), expected, "{orientation}");
        }
    }

    #[test]
    fn four_quarter_turns_restore_the_image() {
        let mut rows = image();
        for _ in 0..4 {
            rows = run(Orientation::Right, &rows);
        }
        assert_eq!(rows, image());
    }

    #[test]
    fn nothing_is_emitted_before_the_last_row() {
        let mut block =
            RotationBlock::new(specifications::GRAY8, Size::new(3, 2), Orientation::Right).unwrap();
        block
            .consume(Scanline::from_bytes(specifications::GRAY8, vec![1, 2, 3]).unwrap())
            .unwrap();
        assert!(block.produce().unwrap().is_none());
    }

    #[test]
    fn identity_is_rejected() {
        assert!(RotationBlock::new(specifications::GRAY8, Size::new(1, 1), Orientation::Up).is_err());
    }
}
