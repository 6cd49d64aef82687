use crate::collection::Document;
use crate::common::{Value, RESERVED_FIELDS};

/// Deep merges `patch` into `target`.
///
/// Nested documents merge recursively; arrays and scalars in the patch
/// overwrite the target value wholesale.
pub fn deep_merge(target: &mut Document, patch: &Document) {
    for (key, patch_value) in patch.iter() {
        match (target.get_mut_top_level(key), patch_value) {
            (Some(Value::Document(existing)), Value::Document(nested_patch)) => {
                deep_merge(existing, nested_patch);
            }
            _ => target.put_top_level(key, patch_value.clone()),
        }
    }
}

/// Returns a copy of `document` without the reserved bookkeeping fields.
pub fn strip_reserved_fields(document: &Document) -> Document {
    document
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
