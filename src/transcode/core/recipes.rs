//! Executable strategies behind rules.

pub mod base;
pub mod copy;

pub use base::BaseRecipe;
pub use copy::{CopyRecipe, DEFAULT_BUFFER_SIZE};

use crate::transcode::common::error::Result;
use crate::transcode::core::operation::Operation;
use crate::transcode::image::Specification;

/// Carries out one operation and returns the specification of the image written.
pub trait Recipe: Send + Sync {
    fn perform(&self, operation: &mut Operation<'_>) -> Result<Specification>;
}
