use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::transcode::common::error::Result;
use crate::transcode::io::sink::ImageSink;
use crate::transcode::io::source::ImageSource;

pub struct FileImageSource {
    reader: BufReader<File>,
    length: usize,
    total_bytes_read: usize,
}

impl FileImageSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let length = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
        debug!("Opened {} ({} bytes)", path.display(), length);
        Ok(Self {
            reader: BufReader::new(file),
            length,
            total_bytes_read: 0,
        })
    }
}

impl ImageSource for FileImageSource {
    fn read(&mut self, destination: &mut [u8]) -> Result<usize> {
        let read = self.reader.read(destination)?;
        self.total_bytes_read += read;
        Ok(read)
    }

    fn total_bytes_read(&self) -> usize {
        self.total_bytes_read
    }

    fn available(&self) -> usize {
        self.length.saturating_sub(self.total_bytes_read)
    }
}

pub struct FileImageSink {
    writer: BufWriter<File>,
    total_bytes_written: usize,
}

impl FileImageSink {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            total_bytes_written: 0,
        })
    }

    /// Flushes buffered bytes to disk.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.total_bytes_written)
    }
}

impl ImageSink for FileImageSink {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.total_bytes_written += data.len();
        Ok(())
    }

    fn total_bytes_written(&self) -> usize {
        self.total_bytes_written
    }
}
