//! Helpers for partial-update (PUT) payloads.
//!
//! A nullable field in an update body has three states: absent (leave as is),
//! `null` (clear it) and a value (set it). Those map onto `Option<Option<T>>`
//! with [`double_option`] as the field's deserializer.

use serde::{Deserialize, Deserializer};

/// Deserializes a present field (including `null`) as `Some(..)`.
///
/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
