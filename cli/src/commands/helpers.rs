use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use flavour_core::models::ShoppingList;

pub(crate) fn print_shopping_list(list: &ShoppingList) {
    #[derive(Tabled)]
    struct IngredientRow {
        #[tabled(rename = "Recipe")]
        recipe_id: String,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "#")]
        index: usize,
        #[tabled(rename = "Ingredient")]
        name: String,
        #[tabled(rename = "Got")]
        checked: &'static str,
    }

    let rows: Vec<IngredientRow> = list
        .iter()
        .flat_map(|(recipe_id, recipe)| {
            recipe.ingredients.iter().map(move |ing| IngredientRow {
                recipe_id: truncate(recipe_id, 16),
                title: truncate(&recipe.title, 30),
                index: ing.index,
                name: truncate(&ing.name, 40),
                checked: if ing.checked { "x" } else { "" },
            })
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Turn a recipe title into a storage-friendly recipe id.
pub(crate) fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
