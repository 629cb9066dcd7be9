use anyhow::{Context, Result, bail};
use std::path::Path;

use flavour_core::identity::Identity;
use flavour_core::models::{IngredientInput, RecipeEntry, ShoppingList};
use flavour_core::service::ShoppingListService;
use flavour_core::store::KeyValueStore;

use super::helpers::slugify;

pub(crate) fn cmd_add<S: KeyValueStore>(
    svc: &mut ShoppingListService<S>,
    user: &Identity,
    recipe_id: &str,
    title: &str,
    ingredients: &[String],
    json: bool,
) -> Result<()> {
    if recipe_id.trim().is_empty() {
        bail!("Recipe id must not be empty");
    }
    let inputs: Vec<IngredientInput> = ingredients
        .iter()
        .map(|name| IngredientInput::named(name.trim()))
        .collect();
    if inputs.iter().any(|ing| ing.name.is_empty()) {
        bail!("Ingredient names must not be empty");
    }

    let entry = svc.add_recipe_to_shopping_list(user, recipe_id, title, &inputs)?;
    print_added(recipe_id, entry, json)
}

pub(crate) fn cmd_import<S: KeyValueStore>(
    svc: &mut ShoppingListService<S>,
    user: &Identity,
    file: &Path,
    id_override: Option<String>,
    title_override: Option<String>,
    json: bool,
) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let (metadata_title, ingredients) = parse_cook(&input)?;

    let title = title_override
        .or(metadata_title)
        .or_else(|| file.file_stem().and_then(|s| s.to_str()).map(String::from))
        .context("Could not determine recipe title. Use --title to specify one")?;
    let recipe_id = id_override.unwrap_or_else(|| slugify(&title));
    if recipe_id.is_empty() {
        bail!("Could not derive a recipe id from '{title}'. Use --id to specify one");
    }

    if ingredients.is_empty() {
        bail!("No ingredients found in recipe");
    }

    let entry = svc.add_recipe_to_shopping_list(user, &recipe_id, &title, &ingredients)?;
    print_added(&recipe_id, entry, json)
}

pub(crate) fn cmd_remove<S: KeyValueStore>(
    svc: &mut ShoppingListService<S>,
    user: &Identity,
    recipe_id: &str,
    json: bool,
) -> Result<()> {
    let removed = svc.remove_recipe_from_shopping_list(user, recipe_id)?;
    if json {
        println!(
            "{}",
            serde_json::json!({ "recipe_id": recipe_id, "removed": removed })
        );
    } else if removed {
        println!("Removed {recipe_id} from the shopping list");
    } else {
        println!("{recipe_id} was not on the shopping list");
    }
    Ok(())
}

pub(crate) fn cmd_clear_checked<S: KeyValueStore>(
    svc: &mut ShoppingListService<S>,
    user: &Identity,
    json: bool,
) -> Result<()> {
    let summary = svc.clear_checked_items(user)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let cleared = summary.ingredients_cleared;
        let finished = summary.recipes_removed;
        println!("Cleared {cleared} checked ingredient(s), {finished} recipe(s) finished");
    }
    Ok(())
}

fn print_added(recipe_id: &str, entry: RecipeEntry, json: bool) -> Result<()> {
    if json {
        let mut list = ShoppingList::new();
        list.insert(recipe_id.to_string(), entry);
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let title = &entry.title;
    let count = entry.ingredients.len();
    println!("Added {title} ({recipe_id}) with {count} ingredient(s)");
    let already = entry.ingredients.iter().filter(|ing| ing.checked).count();
    if already > 0 {
        println!("  {already} already checked off");
    }
    Ok(())
}

/// Parse a Cooklang recipe into its metadata title and one shopping entry per
/// ingredient, with quantities folded into the display line.
fn parse_cook(input: &str) -> Result<(Option<String>, Vec<IngredientInput>)> {
    let (recipe_data, _report) = cooklang::parse(input)
        .into_result()
        .map_err(|e| anyhow::anyhow!("Failed to parse Cooklang file: {e}"))?;

    let title = recipe_data.metadata.title().map(String::from);

    let converter = cooklang::Converter::default();
    let grouped = recipe_data.group_ingredients(&converter);
    let ingredients = grouped
        .iter()
        .map(|gi| cooklang_ingredient_to_input(gi))
        .collect();

    Ok((title, ingredients))
}

fn cooklang_ingredient_to_input(
    gi: &cooklang::ingredient_list::GroupedIngredient<'_>,
) -> IngredientInput {
    let name = gi.ingredient.display_name().to_string();
    let amounts: Vec<String> = gi
        .quantity
        .iter()
        .map(|qty: &cooklang::Quantity| {
            let value = match qty.value() {
                cooklang::Value::Number(n) => format_amount(n.value()),
                cooklang::Value::Range { start, end } => {
                    format!("{}-{}", format_amount(start.value()), format_amount(end.value()))
                }
                cooklang::Value::Text(t) => t.clone(),
            };
            match qty.unit() {
                Some(unit) => format!("{value} {unit}"),
                None => value,
            }
        })
        .collect();

    let original = (!amounts.is_empty()).then(|| format!("{} {name}", amounts.join(" + ")));
    IngredientInput { name, original }
}

fn format_amount(n: f64) -> String {
    let s = format!("{n:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavour_core::store::MemoryStore;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(2.0), "2");
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(0.5), "0.5");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_parse_cook_ingredients() {
        let (_, ingredients) =
            parse_cook("Season with @salt{1%tsp} and @black pepper{}.\n").unwrap();

        let salt = ingredients.iter().find(|i| i.name == "salt").unwrap();
        assert_eq!(salt.display_name(), "1 tsp salt");

        let pepper = ingredients
            .iter()
            .find(|i| i.name == "black pepper")
            .unwrap();
        assert_eq!(pepper.display_name(), "black pepper");
    }

    #[test]
    fn test_import_cook_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tomato Soup.cook");
        std::fs::write(&path, "Simmer @tomatoes{4} with @garlic{2%cloves}.\n").unwrap();

        let mut svc = ShoppingListService::new(MemoryStore::new());
        let user = Identity::guest();
        cmd_import(&mut svc, &user, &path, None, None, true).unwrap();

        let items = svc.get_shopping_list_items(&user).unwrap();
        let recipe = &items["tomato-soup"];
        assert_eq!(recipe.title, "Tomato Soup");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].index, 0);
        assert_eq!(recipe.ingredients[1].index, 1);
    }

    #[test]
    fn test_add_rejects_blank_ingredient() {
        let mut svc = ShoppingListService::new(MemoryStore::new());
        let user = Identity::guest();
        let err = cmd_add(&mut svc, &user, "r1", "Soup", &["salt".into(), "  ".into()], true)
            .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert!(svc.get_shopping_list_items(&user).unwrap().is_empty());
    }

    #[test]
    fn test_add_then_remove() {
        let mut svc = ShoppingListService::new(MemoryStore::new());
        let user = Identity::guest();
        cmd_add(&mut svc, &user, "r1", "Soup", &["salt".into(), "pepper".into()], true).unwrap();
        assert_eq!(svc.get_unchecked_count(&user).unwrap(), 2);

        cmd_remove(&mut svc, &user, "r1", true).unwrap();
        assert!(svc.get_shopping_list_items(&user).unwrap().is_empty());
    }
}
