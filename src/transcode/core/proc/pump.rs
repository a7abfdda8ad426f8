use tracing::trace;

use crate::transcode::common::error::{Result, TranscodeError, ensure};
use crate::transcode::core::proc::block::ScanlineProcessingBlock;
use crate::transcode::image::Scanline;

pub type ScanlineGenerator<'a> = Box<dyn FnMut() -> Result<Option<Scanline>> + 'a>;
pub type ScanlineConsumer<'a> = Box<dyn FnMut(Scanline) -> Result<()> + 'a>;

/// Drives scanlines from a generator through the blocks into a consumer.
pub struct ScanlinePump<'a> {
    generator: ScanlineGenerator<'a>,
    blocks: Vec<Box<dyn ScanlineProcessingBlock + 'a>>,
    consumer: ScanlineConsumer<'a>,
    num_input_scanlines: u32,
}

impl<'a> ScanlinePump<'a> {
    pub fn new(
        generator: ScanlineGenerator<'a>,
        blocks: Vec<Box<dyn ScanlineProcessingBlock + 'a>>,
        consumer: ScanlineConsumer<'a>,
        num_input_scanlines: u32,
    ) -> Self {
        Self {
            generator,
            blocks,
            consumer,
            num_input_scanlines,
        }
    }

    /// Pulls exactly `num_input_scanlines` rows.
    ///
    /// After each pull the block chain is re-run without new input for as long as any block
    /// emits, so buffering blocks drain as soon as they have what they need.
    pub fn pump_all(mut self) -> Result<()> {
        let mut consumed = 0usize;
        for row in 0..self.num_input_scanlines {
            let mut scanline = Some((self.generator)()?.ok_or_else(|| {
                TranscodeError::DecompressorFailure(format!(
                    "image ended after {row} of {} scanlines",
                    self.num_input_scanlines
                ))
            })?);

            loop {
                let mut change = false;
                for block in &mut self.blocks {
                    if let Some(input) = scanline.take() {
                        block.consume(input)?;
                    }
                    scanline = block.produce()?;
                    change |= scanline.is_some();
                }

                if let Some(output) = scanline.take() {
                    (self.consumer)(output)?;
                    consumed += 1;
                }

                if !change {
                    break;
                }
            }
        }

        ensure!(
            blocks_drained(&mut self.blocks)?,
            "blocks still hold scanlines after the last row"
        );
        trace!(
            "Pumped {} input rows into {consumed} output rows",
            self.num_input_scanlines
        );
        Ok(())
    }
}

fn blocks_drained(blocks: &mut [Box<dyn ScanlineProcessingBlock + '_>]) -> Result<bool> {
    for block in blocks {
        if block.produce()?.is_some() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::transcode::core::proc::{CroppingBlock, RotationBlock};
    use crate::transcode::image::{Orientation, Rect, Size, specifications};

    fn generator(rows: Vec<Vec<u8>>) -> ScanlineGenerator<'static> {
        let mut rows = rows.into_iter();
        Box::new(move || -> Result<Option<Scanline>> {
            Ok(rows
                .next()
                .map(|row| Scanline::from_bytes(specifications::GRAY8, row).unwrap()))
        })
    }

    fn collector() -> (ScanlineConsumer<'static>, Rc<RefCell<Vec<Vec<u8>>>>) {
        let output = Rc::new(RefCell::new(Vec::new()));
        let sink = output.clone();
        let consumer: ScanlineConsumer<'static> = Box::new(move |scanline: Scanline| -> Result<()> {
            sink.borrow_mut().push(scanline.into_bytes());
            Ok(())
        });
        (consumer, output)
    }

    fn image() -> Vec<Vec<u8>> {
        vec![vec![1, 2, 3], vec![4, 5, 6]]
    }

    #[test]
    fn no_blocks_forwards_every_row() {
        let (consumer, output) = collector();
        ScanlinePump::new(generator(image()), Vec::new(), consumer, 2)
            .pump_all()
            .unwrap();
        assert_eq!(*output.borrow(), image());
    }

    #[test]
    fn buffering_block_drains_after_last_pull() {
        let (consumer, output) = collector();
        let rotation =
            RotationBlock::new(specifications::GRAY8, Size::new(3, 2), Orientation::Right)
                .unwrap();
        ScanlinePump::new(generator(image()), vec![Box::new(rotation)], consumer, 2)
            .pump_all()
            .unwrap();

        assert_eq!(*output.borrow(), vec![vec![4, 1], vec![5, 2], vec![6, 3]]);
    }

    #[test]
    fn chained_blocks() {
        let (consumer, output) = collector();
        let crop = CroppingBlock::new(specifications::GRAY8, Size::new(3, 2), Rect::new(1, 0, 2, 2))
            .unwrap();
        let rotation =
            RotationBlock::new(specifications::GRAY8, Size::new(2, 2), Orientation::Bottom)
                .unwrap();
        ScanlinePump::new(
            generator(image()),
            vec![Box::new(crop), Box::new(rotation)],
            consumer,
            2,
        )
        .pump_all()
        .unwrap();

        assert_eq!(*output.borrow(), vec![vec![6, 5], vec![3, 2]]);
    }

    #[test]
    fn four_quarter_turns_through_the_pump_restore_the_image() {
        let (consumer, output) = collector();
        let mut size = Size::new(3, 2);
        let mut blocks: Vec<Box<dyn ScanlineProcessingBlock>> = Vec::new();
        for _ in 0..4 {
            blocks.push(Box::new(
                RotationBlock::new(specifications::GRAY8, size, Orientation::Right).unwrap(),
            ));
            size = size.transposed();
        }
        ScanlinePump::new(generator(image()), blocks, consumer, 2)
            .pump_all()
            .unwrap();

        assert_eq!(*output.borrow(), image());
    }

    #[test]
    fn stops_pulling_after_the_requested_rows() {
        let pulls = Rc::new(RefCell::new(0));
        let counter = pulls.clone();
        let generator: ScanlineGenerator<'static> = Box::new(move || -> Result<Option<Scanline>> {
            *counter.borrow_mut() += 1;
            Ok(Some(Scanline::new(specifications::GRAY8, 1)))
        });
        let (consumer, output) = collector();

        ScanlinePump::new(generator, Vec::new(), consumer, 3)
            .pump_all()
            .unwrap();
        assert_eq!(*pulls.borrow(), 3);
        assert_eq!(output.borrow().len(), 3);
    }

    #[test]
    fn short_input_is_an_error() {
        let (consumer, _output) = collector();
        let result = ScanlinePump::new(generator(image()), Vec::new(), consumer, 3).pump_all();
        assert!(matches!(result, Err(TranscodeError::DecompressorFailure(_))));
    }
}
