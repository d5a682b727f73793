//! Fields: the key-value attributes on records and references.

use std::collections::BTreeMap;

use super::Value;

/// A map of field names to scalar values.
///
/// Ordered so that traversal, logging and exports are deterministic.
pub type Fields = BTreeMap<String, Value>;

/// Build a `Fields` map from `(name, value)` pairs.
pub fn fields<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
