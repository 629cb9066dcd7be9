mod check;
mod helpers;
mod list;
mod recipe;
mod whoami;

use anyhow::Result;

use flavour_core::identity::Identity;
use flavour_core::service::ShoppingListService;
use flavour_core::store::KeyValueStore;

pub(crate) use check::{cmd_set_checked, cmd_status};
pub(crate) use helpers::json_error;
pub(crate) use list::{cmd_count, cmd_list};
pub(crate) use recipe::{cmd_add, cmd_clear_checked, cmd_import, cmd_remove};
pub(crate) use whoami::cmd_whoami;

/// Look up the display name of an ingredient currently on the list.
pub(super) fn ingredient_name<S: KeyValueStore>(
    svc: &ShoppingListService<S>,
    user: &Identity,
    recipe_id: &str,
    index: usize,
) -> Result<Option<String>> {
    let list = svc.get_shopping_list_items(user)?;
    Ok(list
        .get(recipe_id)
        .and_then(|recipe| recipe.ingredients.iter().find(|ing| ing.index == index))
        .map(|ing| ing.name.clone()))
}
