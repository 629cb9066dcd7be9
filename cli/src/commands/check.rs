use anyhow::Result;

use flavour_core::identity::Identity;
use flavour_core::service::ShoppingListService;
use flavour_core::store::KeyValueStore;

use super::ingredient_name;

pub(crate) fn cmd_set_checked<S: KeyValueStore>(
    svc: &mut ShoppingListService<S>,
    user: &Identity,
    recipe_id: &str,
    index: usize,
    checked: bool,
    json: bool,
) -> Result<()> {
    let name = ingredient_name(&*svc, user, recipe_id, index)?;
    if name.is_none() {
        eprintln!("Note: {recipe_id} #{index} is not on the shopping list; storing the flag anyway");
    }

    svc.set_ingredient_check_state(user, recipe_id, index, checked)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "recipe_id": recipe_id, "index": index, "checked": checked })
        );
    } else {
        let verb = if checked { "Checked" } else { "Unchecked" };
        let label = name.unwrap_or_else(|| format!("#{index}"));
        println!("{verb} {label} ({recipe_id})");
    }
    Ok(())
}

pub(crate) fn cmd_status<S: KeyValueStore>(
    svc: &ShoppingListService<S>,
    user: &Identity,
    recipe_id: &str,
    index: usize,
    json: bool,
) -> Result<()> {
    let checked = svc.get_ingredient_check_state(user, recipe_id, index)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "recipe_id": recipe_id, "index": index, "checked": checked })
        );
    } else {
        let label = ingredient_name(svc, user, recipe_id, index)?
            .unwrap_or_else(|| format!("#{index}"));
        let state = if checked { "checked" } else { "not checked" };
        println!("{label} ({recipe_id}): {state}");
    }
    Ok(())
}
