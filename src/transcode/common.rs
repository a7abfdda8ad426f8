//! Shared utilities: the error taxonomy, checked numerics and step timings.

pub mod error;
pub mod numeric;
pub mod timing;

pub use error::{Result, TranscodeError};
pub use timing::{StepTiming, StepTimings, Timer};
