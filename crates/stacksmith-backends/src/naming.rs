//! Random identifier generation

use uuid::Uuid;

/// Fixed tag carried by every generated identifier
pub const ID_PREFIX: &str = "stacksmith";

/// Produce a collision-resistant identifier: `stacksmith-{kind}-{uuid}`
///
/// `kind` distinguishes what the identifier names (stack, key, ...).
pub fn generate_id(kind: &str) -> String {
    format!("{}-{}-{}", ID_PREFIX, kind, Uuid::new_v4().simple())
}
