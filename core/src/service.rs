use anyhow::Result;
use tracing::debug;

use crate::document::{self, LoadedDocument};
use crate::flags;
use crate::identity::{self, Identity, ResolvedIdentity};
use crate::models::{
    ClearSummary, IngredientEntry, IngredientInput, RecipeEntry, ShoppingList, count_ingredients,
};
use crate::store::KeyValueStore;

/// Shopping list operations over a key-value store.
///
/// Check flags are the source of truth for whether an ingredient is checked;
/// the document's `checked` fields are a cache that every operation refreshes
/// from the flags before reading or writing it.
///
/// Mutating operations take `&mut self`, so a load-modify-save cycle can never
/// interleave with another write through the same service. Hosts that share one
/// service between threads should wrap it in a `Mutex`.
pub struct ShoppingListService<S> {
    store: S,
}

impl<S: KeyValueStore> ShoppingListService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn resolve_identity(&self) -> Result<ResolvedIdentity> {
        identity::resolve_identity(&self.store)
    }

    // --- Check flags ---

    pub fn get_ingredient_check_state(
        &self,
        user: &Identity,
        recipe_id: &str,
        index: usize,
    ) -> Result<bool> {
        flags::get_flag(&self.store, user, recipe_id, index)
    }

    /// Check or uncheck one ingredient, then bring the stored document in line.
    pub fn set_ingredient_check_state(
        &mut self,
        user: &Identity,
        recipe_id: &str,
        index: usize,
        checked: bool,
    ) -> Result<()> {
        debug!(%user, recipe_id, index, checked, "set ingredient check state");
        flags::put_flag(&mut self.store, user, recipe_id, index, checked)?;
        self.refresh_shopping_list(user)
    }

    // --- Document ---

    /// The document exactly as stored, with how it was found. A corrupt
    /// document comes back empty with `DocumentStatus::Corrupt`.
    pub fn get_shopping_list_document(&self, user: &Identity) -> Result<LoadedDocument> {
        document::load(&self.store, user)
    }

    /// The document exactly as stored. `checked` fields may be stale.
    pub fn get_shopping_list_data(&self, user: &Identity) -> Result<ShoppingList> {
        Ok(self.get_shopping_list_document(user)?.list)
    }

    pub fn save_shopping_list_data(&mut self, user: &Identity, list: &ShoppingList) -> Result<()> {
        document::save(&mut self.store, user, list)
    }

    /// Re-read every ingredient's check flag and save the refreshed document.
    pub fn refresh_shopping_list(&mut self, user: &Identity) -> Result<()> {
        let list = self.load_refreshed(user)?;
        self.save_shopping_list_data(user, &list)
    }

    fn load_refreshed(&self, user: &Identity) -> Result<ShoppingList> {
        let mut list = self.get_shopping_list_data(user)?;
        for (recipe_id, recipe) in &mut list {
            for ing in &mut recipe.ingredients {
                ing.checked = flags::get_flag(&self.store, user, recipe_id, ing.index)?;
            }
        }
        Ok(list)
    }

    // --- Recipes ---

    /// Put a recipe's ingredients on the list, replacing any previous entry for
    /// `recipe_id`. Flags still set at matching positions carry over.
    pub fn add_recipe_to_shopping_list(
        &mut self,
        user: &Identity,
        recipe_id: &str,
        title: &str,
        ingredients: &[IngredientInput],
    ) -> Result<RecipeEntry> {
        debug!(%user, recipe_id, count = ingredients.len(), "add recipe to shopping list");
        let mut list = self.load_refreshed(user)?;

        let ingredients = ingredients
            .iter()
            .enumerate()
            .map(|(index, ing)| {
                Ok(IngredientEntry {
                    name: ing.display_name().to_string(),
                    checked: flags::get_flag(&self.store, user, recipe_id, index)?,
                    index,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let entry = RecipeEntry {
            title: title.to_string(),
            ingredients,
        };
        list.insert(recipe_id.to_string(), entry.clone());
        self.save_shopping_list_data(user, &list)?;
        Ok(entry)
    }

    /// Every recipe with at least one ingredient, check state refreshed.
    pub fn get_shopping_list_items(&self, user: &Identity) -> Result<ShoppingList> {
        let mut list = self.load_refreshed(user)?;
        list.retain(|_, recipe| !recipe.ingredients.is_empty());
        Ok(list)
    }

    /// Only the unchecked ingredients; recipes with nothing left to buy are omitted.
    pub fn get_unchecked_ingredients(&self, user: &Identity) -> Result<ShoppingList> {
        let mut list = self.load_refreshed(user)?;
        for recipe in list.values_mut() {
            recipe.ingredients.retain(|ing| !ing.checked);
        }
        list.retain(|_, recipe| !recipe.ingredients.is_empty());
        Ok(list)
    }

    pub fn get_unchecked_count(&self, user: &Identity) -> Result<usize> {
        Ok(count_ingredients(&self.get_unchecked_ingredients(user)?))
    }

    /// Drop a recipe and all of its check flags. Returns `false` if the recipe
    /// was not on the list.
    pub fn remove_recipe_from_shopping_list(
        &mut self,
        user: &Identity,
        recipe_id: &str,
    ) -> Result<bool> {
        debug!(%user, recipe_id, "remove recipe from shopping list");
        let mut list = self.load_refreshed(user)?;

        let removed = list.remove(recipe_id);
        if let Some(recipe) = &removed {
            for ing in &recipe.ingredients {
                flags::clear_flag(&mut self.store, user, recipe_id, ing.index)?;
            }
        }

        self.save_shopping_list_data(user, &list)?;
        Ok(removed.is_some())
    }

    /// Remove every checked ingredient (and its flag) from the list, dropping
    /// recipes left empty.
    pub fn clear_checked_items(&mut self, user: &Identity) -> Result<ClearSummary> {
        let mut list = self.load_refreshed(user)?;
        let mut summary = ClearSummary::default();

        for (recipe_id, recipe) in &mut list {
            for ing in recipe.ingredients.iter().filter(|ing| ing.checked) {
                flags::clear_flag(&mut self.store, user, recipe_id, ing.index)?;
                summary.ingredients_cleared += 1;
            }
            recipe.ingredients.retain(|ing| !ing.checked);
        }

        let before = list.len();
        list.retain(|_, recipe| !recipe.ingredients.is_empty());
        summary.recipes_removed = before - list.len();

        debug!(
            %user,
            ingredients = summary.ingredients_cleared,
            recipes = summary.recipes_removed,
            "cleared checked items"
        );
        self.save_shopping_list_data(user, &list)?;
        Ok(summary)
    }
}
