//! Codec plugins shipped with the crate.

pub mod raw;
pub mod tiff;

use crate::transcode::core::plugin::Plugin;

/// Every bundled plugin, in registration order.
pub fn all() -> Vec<Plugin> {
    vec![tiff::plugin(), raw::plugin()]
}
