use uuid::Uuid;

/// Generates a new document id.
#[inline]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new revision id.
#[inline]
pub fn generate_revision_id() -> String {
    Uuid::new_v4().simple().to_string()
}
