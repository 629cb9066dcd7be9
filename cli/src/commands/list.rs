use anyhow::Result;

use flavour_core::identity::Identity;
use flavour_core::models::count_ingredients;
use flavour_core::service::ShoppingListService;
use flavour_core::store::KeyValueStore;

use super::helpers::print_shopping_list;

pub(crate) fn cmd_list<S: KeyValueStore>(
    svc: &ShoppingListService<S>,
    user: &Identity,
    unchecked: bool,
    json: bool,
) -> Result<()> {
    let list = if unchecked {
        svc.get_unchecked_ingredients(user)?
    } else {
        svc.get_shopping_list_items(user)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.is_empty() {
        if unchecked {
            println!("Nothing left to buy.");
        } else {
            println!("Shopping list is empty. Add a recipe with: flavour add <id> <title> <ingredient>...");
        }
        return Ok(());
    }

    print_shopping_list(&list);
    let recipes = list.len();
    let items = count_ingredients(&list);
    println!("{items} ingredient(s) across {recipes} recipe(s)");
    Ok(())
}

pub(crate) fn cmd_count<S: KeyValueStore>(
    svc: &ShoppingListService<S>,
    user: &Identity,
    json: bool,
) -> Result<()> {
    let count = svc.get_unchecked_count(user)?;
    if json {
        println!("{}", serde_json::json!({ "unchecked": count }));
    } else {
        println!("{count}");
    }
    Ok(())
}
