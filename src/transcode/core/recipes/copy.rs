use tracing::debug;

use crate::transcode::common::error::Result;
use crate::transcode::core::operation::Operation;
use crate::transcode::core::recipes::Recipe;
use crate::transcode::core::rule::Rule;
use crate::transcode::image::Specification;

pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Streams the encoded input to the sink untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyRecipe;

impl CopyRecipe {
    pub const RULE_NAME: &'static str = "copy";

    pub fn rule() -> Rule {
        Rule::new(Self::RULE_NAME, || Box::new(CopyRecipe))
            .requiring_equal_formats()
            .passthrough()
    }
}

impl Recipe for CopyRecipe {
    fn perform(&self, operation: &mut Operation<'_>) -> Result<Specification> {
        let mut buffer = [0u8; DEFAULT_BUFFER_SIZE];
        let mut copied = 0usize;
        loop {
            let read = operation.io.source.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            operation.io.sink.write(&buffer[..read])?;
            copied += read;
        }

        debug!("Copied {copied} bytes");
        Ok(operation.parameters.input_image_specification.clone())
    }
}
