use crate::transcode::common::error::{Result, TranscodeError};
use crate::transcode::image::{Metadata, Orientation, Specification};

/// Input metadata plus extra entries, stamped with the final metadata orientation.
///
/// A compressor without metadata support gets empty metadata and must not be left with an
/// orientation to store.
pub fn calculate_output_metadata(
    input: &Specification,
    extra: Option<&Metadata>,
    metadata_orientation: Orientation,
    compressor_supports_setting_metadata: bool,
) -> Result<Metadata> {
    if !compressor_supports_setting_metadata {
        if metadata_orientation != Orientation::Up {
            return Err(TranscodeError::MetadataWithoutCapability(format!(
                "orientation {metadata_orientation} left to metadata"
            )));
        }
        return Ok(Metadata::empty());
    }

    let mut metadata = input.metadata.clone();
    if let Some(extra) = extra {
        metadata.merge(extra);
    }
    metadata
        .entries
        .set_orientation(Some(metadata_orientation));
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcode::image::{Entry, Size, formats, specifications};

    fn input_with_maker(maker: &str) -> Specification {
        let mut metadata = Metadata::empty();
        metadata.entries.tiff.insert(0x010f, Entry::ascii(0x010f, maker).unwrap());
        metadata.entries.set_orientation(Some(Orientation::Left));
        Specification::new(Size::new(4, 4), formats::JPEG, specifications::RGB)
            .with_metadata(metadata)
    }

    #[test]
    fn merges_extra_and_stamps_orientation() {
        let mut extra = Metadata::empty();
        extra.entries.tiff.insert(0x010f, Entry::ascii(0x010f, "override").unwrap());
        extra.entries.exif.insert(0x9003, Entry::ascii(0x9003, "2021").unwrap());

        let metadata =
            calculate_output_metadata(&input_with_maker("camera"), Some(&extra), Orientation::Right, true)
                .unwrap();
        assert_eq!(metadata.entries.orientation(), Some(Orientation::Right));
        assert_eq!(metadata.entries.tiff[&0x010f], Entry::ascii(0x010f, "override").unwrap());
        assert!(metadata.entries.exif.contains_key(&0x9003));
    }

    #[test]
    fn no_capability_yields_empty_metadata() {
        let metadata =
            calculate_output_metadata(&input_with_maker("camera"), None, Orientation::Up, false)
                .unwrap();
        assert!(metadata.is_empty());
    }

    #[test]
    fn no_capability_cannot_defer_orientation() {
        let err =
            calculate_output_metadata(&input_with_maker("camera"), None, Orientation::Left, false)
                .unwrap_err();
        assert!(matches!(err, TranscodeError::MetadataWithoutCapability(_)));
        assert!(err.is_contract_violation());
    }
}
