//! Streaming scanline processing: blocks, pixel conversion and the pump driving them.

pub mod block;
pub mod conversion;
pub mod crop;
pub mod pump;
pub mod rotate;
pub mod scale;

pub use block::ScanlineProcessingBlock;
pub use conversion::ScanlineConverter;
pub use crop::CroppingBlock;
pub use pump::ScanlinePump;
pub use rotate::RotationBlock;
pub use scale::ScalingBlock;
