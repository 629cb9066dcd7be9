use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ingredient line on the shopping list.
///
/// `index` is the ingredient's position in its recipe's ingredient list at the
/// time the recipe was added. It addresses the ingredient's check flag and never
/// changes, even after other ingredients are cleared away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub checked: bool,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
}

/// The per-user shopping list document: recipe id to recipe entry.
pub type ShoppingList = BTreeMap<String, RecipeEntry>;

/// An ingredient as handed in by the caller when a recipe is added.
///
/// `original` is the full ingredient line as written in the recipe
/// (e.g. "2 cups flour, sifted") and wins over `name` when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl IngredientInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            original: None,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.original.as_deref() {
            Some(original) if !original.is_empty() => original,
            _ => &self.name,
        }
    }
}

/// What a clear-checked pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearSummary {
    pub ingredients_cleared: usize,
    pub recipes_removed: usize,
}

#[must_use]
pub fn count_ingredients(list: &ShoppingList) -> usize {
    list.values().map(|recipe| recipe.ingredients.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_original() {
        let ing = IngredientInput {
            name: "flour".to_string(),
            original: Some("2 cups flour, sifted".to_string()),
        };
        assert_eq!(ing.display_name(), "2 cups flour, sifted");
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        assert_eq!(IngredientInput::named("salt").display_name(), "salt");

        let empty_original = IngredientInput {
            name: "salt".to_string(),
            original: Some(String::new()),
        };
        assert_eq!(empty_original.display_name(), "salt");
    }

    #[test]
    fn test_document_json_shape() {
        let mut list = ShoppingList::new();
        list.insert(
            "r1".to_string(),
            RecipeEntry {
                title: "Soup".to_string(),
                ingredients: vec![IngredientEntry {
                    name: "salt".to_string(),
                    checked: false,
                    index: 0,
                }],
            },
        );

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "r1": {
                    "title": "Soup",
                    "ingredients": [{ "name": "salt", "checked": false, "index": 0 }]
                }
            })
        );
    }

    #[test]
    fn test_document_missing_checked_defaults_false() {
        let list: ShoppingList = serde_json::from_str(
            r#"{"r1":{"title":"Soup","ingredients":[{"name":"salt","index":3}]}}"#,
        )
        .unwrap();
        let ing = &list["r1"].ingredients[0];
        assert!(!ing.checked);
        assert_eq!(ing.index, 3);
    }

    #[test]
    fn test_document_missing_title_and_name_default_empty() {
        let list: ShoppingList =
            serde_json::from_str(r#"{"r2":{"ingredients":[{"checked":true,"index":0}]}}"#).unwrap();
        let recipe = &list["r2"];
        assert_eq!(recipe.title, "");
        assert_eq!(recipe.ingredients[0].name, "");
        assert!(recipe.ingredients[0].checked);
    }

    #[test]
    fn test_count_ingredients() {
        let mut list = ShoppingList::new();
        assert_eq!(count_ingredients(&list), 0);

        for (id, n) in [("a", 2), ("b", 3)] {
            list.insert(
                id.to_string(),
                RecipeEntry {
                    title: id.to_string(),
                    ingredients: (0..n)
                        .map(|index| IngredientEntry {
                            name: format!("ing{index}"),
                            checked: false,
                            index,
                        })
                        .collect(),
                },
            );
        }
        assert_eq!(count_ingredients(&list), 5);
    }
}
