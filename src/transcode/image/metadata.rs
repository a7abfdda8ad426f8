//! Image metadata: EXIF-style tag maps and an ICC profile.
//!
//! Byte-level EXIF parsing belongs to the codecs; this module only models the entries a
//! codec hands over and the orientation tag the decision engine rewrites.

use std::collections::BTreeMap;

use crate::transcode::common::error::Result;
use crate::transcode::common::numeric::to_u32;
use crate::transcode::image::orientation::Orientation;

pub const ORIENTATION_TAG: u16 = 0x0112;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    Undefined = 7,
    SLong = 8,
    SRational = 10,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub tag: u16,
    pub entry_type: EntryType,
    pub count: u32,
    /// Value bytes, little endian.
    pub value: Vec<u8>,
}

impl Entry {
    pub fn short(tag: u16, value: u16) -> Self {
        Self {
            tag,
            entry_type: EntryType::Short,
            count: 1,
            value: value.to_le_bytes().to_vec(),
        }
    }

    /// NUL-terminated text; fails when the byte count does not fit the entry's `u32` count.
    pub fn ascii(tag: u16, text: &str) -> Result<Self> {
        let mut value = text.as_bytes().to_vec();
        value.push(0);
        Ok(Self {
            tag,
            entry_type: EntryType::Ascii,
            count: to_u32(value.len())?,
            value,
        })
    }

    pub fn as_short(&self) -> Option<u16> {
        match (self.entry_type, self.value.as_slice()) {
            (EntryType::Short, [lo, hi, ..]) => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }
}

pub type TagMap = BTreeMap<u16, Entry>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entries {
    pub tiff: TagMap,
    pub exif: TagMap,
    pub gps: TagMap,
}

impl Entries {
    pub fn is_empty(&self) -> bool {
        self.tiff.is_empty() && self.exif.is_empty() && self.gps.is_empty()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.tiff
            .get(&ORIENTATION_TAG)
            .and_then(Entry::as_short)
            .and_then(Orientation::from_exif_value)
    }

    pub fn set_orientation(&mut self, orientation: Option<Orientation>) {
        match orientation {
            Some(orientation) => {
                self.tiff.insert(
                    ORIENTATION_TAG,
                    Entry::short(ORIENTATION_TAG, orientation.exif_value()),
                );
            }
            None => {
                self.tiff.remove(&ORIENTATION_TAG);
            }
        }
    }

    /// Entries of `other` replace ours on conflicting tags.
    pub fn merge(&mut self, other: &Entries) {
        for (target, source) in [
            (&mut self.tiff, &other.tiff),
            (&mut self.exif, &other.exif),
            (&mut self.gps, &other.gps),
        ] {
            target.extend(source.iter().map(|(tag, entry)| (*tag, entry.clone())));
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IccProfile {
    pub data: Vec<u8>,
}

impl IccProfile {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub entries: Entries,
    pub icc_profile: IccProfile,
}

impl Metadata {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.icc_profile.is_empty()
    }

    /// Overlays `other`: its entries win, and a non-empty profile replaces ours.
    pub fn merge(&mut self, other: &Metadata) {
        self.entries.merge(&other.entries);
        if !other.icc_profile.is_empty() {
            self.icc_profile = other.icc_profile.clone();
        }
    }
}
