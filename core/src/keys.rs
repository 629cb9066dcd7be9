//! Storage key layout.
//!
//! ```text
//! flavour-flip-shopping-list-<user>             shopping list document (JSON)
//! recipe-<user>-<recipe>-ingredient-<index>     "true" while checked, absent otherwise
//! ```

use crate::identity::Identity;

const DOCUMENT_PREFIX: &str = "flavour-flip-shopping-list-";

#[must_use]
pub fn document_key(user: &Identity) -> String {
    format!("{DOCUMENT_PREFIX}{user}")
}

#[must_use]
pub fn flag_key(user: &Identity, recipe_id: &str, index: usize) -> String {
    format!("recipe-{user}-{recipe_id}-ingredient-{index}")
}
