use anyhow::Result;

use crate::identity::Identity;
use crate::keys::flag_key;
use crate::store::KeyValueStore;

const CHECKED: &str = "true";

/// Whether the ingredient at `index` of `recipe_id` is checked off.
pub fn get_flag<S: KeyValueStore + ?Sized>(
    store: &S,
    user: &Identity,
    recipe_id: &str,
    index: usize,
) -> Result<bool> {
    let value = store.get(&flag_key(user, recipe_id, index))?;
    Ok(value.as_deref() == Some(CHECKED))
}

/// Store a check flag. Unchecking deletes the key, so only checked
/// ingredients occupy storage.
pub fn put_flag<S: KeyValueStore + ?Sized>(
    store: &mut S,
    user: &Identity,
    recipe_id: &str,
    index: usize,
    checked: bool,
) -> Result<()> {
    let key = flag_key(user, recipe_id, index);
    if checked {
        store.set(&key, CHECKED)
    } else {
        store.remove(&key).map(|_| ())
    }
}

pub fn clear_flag<S: KeyValueStore + ?Sized>(
    store: &mut S,
    user: &Identity,
    recipe_id: &str,
    index: usize,
) -> Result<()> {
    store.remove(&flag_key(user, recipe_id, index))?;
    Ok(())
}
