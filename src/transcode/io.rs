pub mod file;
pub mod rewindable;
pub mod sink;
pub mod source;
pub mod vector;

pub use file::{FileImageSink, FileImageSource};
pub use rewindable::RewindableImageSource;
pub use sink::ImageSink;
pub use source::{BitmapImageSource, ImageSource, read_fully, read_to_end};
pub use vector::{VectorBitmapImageSource, VectorImageSink, VectorImageSource};
