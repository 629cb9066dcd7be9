use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::identity::Identity;
use crate::keys::document_key;
use crate::models::ShoppingList;
use crate::store::KeyValueStore;

/// How the stored document was found when it was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Stored,
    Missing,
    /// The stored value could not be parsed and was treated as empty.
    Corrupt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub list: ShoppingList,
    pub status: DocumentStatus,
}

/// Load `user`'s shopping list document as stored, without refreshing check state.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, user: &Identity) -> Result<LoadedDocument> {
    let key = document_key(user);
    let Some(raw) = store.get(&key)?.filter(|raw| !raw.is_empty()) else {
        return Ok(LoadedDocument {
            list: ShoppingList::new(),
            status: DocumentStatus::Missing,
        });
    };

    match serde_json::from_str::<ShoppingList>(&raw) {
        Ok(list) => Ok(LoadedDocument {
            list,
            status: DocumentStatus::Stored,
        }),
        Err(e) => {
            warn!(key = %key, error = %e, "shopping list document is unreadable, treating as empty");
            Ok(LoadedDocument {
                list: ShoppingList::new(),
                status: DocumentStatus::Corrupt,
            })
        }
    }
}

/// Overwrite `user`'s document with `list`.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    user: &Identity,
    list: &ShoppingList,
) -> Result<()> {
    let json = serde_json::to_string(list).context("Failed to serialize shopping list")?;
    store.set(&document_key(user), &json)
}
