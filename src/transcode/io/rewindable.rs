use crate::transcode::common::error::{Result, ensure};
use crate::transcode::image::Specification;
use crate::transcode::io::source::ImageSource;

/// Wraps a source so readers can peek with `mark` / `reset`.
///
/// While a mark is active every byte read from the inner source is kept. `reset` replays
/// those bytes before reading further from the inner source.
pub struct RewindableImageSource<'a> {
    inner: &'a mut dyn ImageSource,
    buffer: Vec<u8>,
    /// Bytes at the end of `buffer` not yet replayed.
    offset: usize,
    mark_active: bool,
}

impl<'a> RewindableImageSource<'a> {
    pub fn new(inner: &'a mut dyn ImageSource) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            offset: 0,
            mark_active: false,
        }
    }

    /// Bytes before the read head can no longer be replayed once a new mark is set.
    pub fn mark(&mut self) {
        let replay_start = self.buffer.len() - self.offset;
        self.buffer.drain(..replay_start);
        self.mark_active = true;
    }

    pub fn reset(&mut self) -> Result<()> {
        ensure!(self.mark_active, "reset without an active mark");
        self.mark_active = false;
        self.offset = self.buffer.len();
        Ok(())
    }
}

impl ImageSource for RewindableImageSource<'_> {
    fn read(&mut self, destination: &mut [u8]) -> Result<usize> {
        let mut copied = 0;

        if self.offset > 0 {
            let start = self.buffer.len() - self.offset;
            let count = destination.len().min(self.offset);
            destination[..count].copy_from_slice(&self.buffer[start..start + count]);
            self.offset -= count;
            copied = count;
        }

        if copied == destination.len() {
            return Ok(copied);
        }

        let inner_read = self.inner.read(&mut destination[copied..])?;
        if self.mark_active {
            self.buffer
                .extend_from_slice(&destination[copied..copied + inner_read]);
        } else if !self.buffer.is_empty() {
            self.buffer.clear();
        }
        Ok(copied + inner_read)
    }

    fn total_bytes_read(&self) -> usize {
        self.inner.total_bytes_read()
    }

    fn available(&self) -> usize {
        self.inner.available() + self.offset
    }

    fn bitmap_specification(&self) -> Option<Specification> {
        self.inner.bitmap_specification()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::io::VectorImageSource;

    #[test]
    fn reset_replays_marked_bytes() {
        let mut inner = VectorImageSource::new((0u8..10).collect());
        let mut source = RewindableImageSource::new(&mut inner);

        source.mark();
        let mut head = [0u8; 4];
        assert_eq!(source.read(&mut head).unwrap(), 4);
        assert_eq!(head, [0, 1, 2, 3]);
        source.reset().unwrap();
        assert_eq!(source.available(), 10);

        let mut all = [0u8; 16];
        assert_eq!(source.read(&mut all).unwrap(), 10);
        assert_eq!(&all[..10], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn nested_marks_keep_unreplayed_bytes() {
        let mut inner = VectorImageSource::new((0u8..8).collect());
        let mut source = RewindableImageSource::new(&mut inner);

        source.mark();
        let mut buffer = [0u8; 3];
        source.read(&mut buffer).unwrap();
        source.reset().unwrap();

        source.mark();
        let mut one = [0u8; 1];
        source.read(&mut one).unwrap();
        assert_eq!(one, [0]);
        source.reset().unwrap();

        let mut rest = [0u8; 8];
        assert_eq!(source.read(&mut rest).unwrap(), 8);
        assert_eq!(rest, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn mark_after_partial_replay_starts_at_read_head() {
        let mut inner = VectorImageSource::new((0u8..6).collect());
        let mut source = RewindableImageSource::new(&mut inner);

        source.mark();
        let mut buffer = [0u8; 3];
        source.read(&mut buffer).unwrap();
        source.reset().unwrap();

        let mut one = [0u8; 1];
        source.read(&mut one).unwrap();
        assert_eq!(one, [0]);

        source.mark();
        source.read(&mut one).unwrap();
        assert_eq!(one, [1]);
        source.reset().unwrap();

        let mut rest = [0u8; 8];
        assert_eq!(source.read(&mut rest).unwrap(), 5);
        assert_eq!(&rest[..5], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn reset_without_mark_fails() {
        let mut inner = VectorImageSource::new(vec![1]);
        let mut source = RewindableImageSource::new(&mut inner);
        assert!(source.reset().is_err());
    }
}
