use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::config::Configuration;
use crate::transcode::image::{ChromaSamplingMode, Specification};

/// Override, else the propagated source mode, else the compressor's first supported mode.
pub fn calculate_output_chroma_sampling_mode(
    input: &Specification,
    supported: &[ChromaSamplingMode],
    configuration: &Configuration,
) -> Result<ChromaSamplingMode> {
    let override_mode = configuration.general.chroma_sampling_mode_override();
    if let Some(mode) = override_mode.mode() {
        if !supported.contains(&mode) {
            return Err(TranscodeError::ChromaSamplingModeOverrideUnsupported(
                mode.to_string(),
            ));
        }
        return Ok(mode);
    }

    if let Some(source_mode) = input.chroma_sampling_mode
        && configuration.general.propagate_chroma_sampling_mode_from_source()
        && supported.contains(&source_mode)
    {
        return Ok(source_mode);
    }

    supported
        .first()
        .copied()
        .ok_or(TranscodeError::NoSupportedChromaSamplingMode)
}
