use crate::transcode::common::error::Result;
use crate::transcode::image::Scanline;

/// One stage of the scanline pipeline.
///
/// `produce` returning `None` means nothing is ready yet, not that the block is drained.
/// A block may hold any number of consumed scanlines before emitting.
pub trait ScanlineProcessingBlock {
    fn consume(&mut self, scanline: Scanline) -> Result<()>;

    fn produce(&mut self) -> Result<Option<Scanline>>;
}
