//! What the caller asks for: encoding, resizing, rotating and cropping.

pub mod crop;
pub mod encode;
pub mod resize;
pub mod rotate;

pub use crop::{AbsoluteEdges, Crop, CropHandler, RelativeEdges};
pub use encode::{Encode, EncodeMode};
pub use resize::{Resize, ResizeMode};
pub use rotate::Rotate;
