use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeMode {
    #[default]
    Exact,
    ExactOrSmaller,
    ExactOrLarger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub mode: ResizeMode,
    pub target_size: Size,
}

impl Resize {
    pub fn new(mode: ResizeMode, target_size: Size) -> Self {
        Self { mode, target_size }
    }

    pub fn exact(target_size: Size) -> Self {
        Self::new(ResizeMode::Exact, target_size)
    }

    /// Rejects a target with a zero width or height.
    pub fn validate(&self) -> Result<()> {
        if self.target_size.is_empty() {
            return Err(TranscodeError::InvalidRequirement(format!(
                "resize target {} is empty",
                self.target_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_targets_are_caller_errors() {
        for target in [Size::new(0, 0), Size::new(0, 10), Size::new(10, 0)] {
            let err = Resize::exact(target).validate().unwrap_err();
            assert!(matches!(err, TranscodeError::InvalidRequirement(_)));
            assert!(err.is_caller_error());
        }
        assert!(Resize::new(ResizeMode::ExactOrSmaller, Size::new(1, 1)).validate().is_ok());
    }
}
