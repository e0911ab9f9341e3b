//! Filters over in-memory recipe collections.
//!
//! Everything here accepts owned or borrowed records (`Vec<Recipe>`,
//! `&[Recipe]`, `Vec<&Recipe>`) and keeps the input order.

use std::borrow::Borrow;

use crate::recipe::Recipe;

/// How an ingredient is compared against a recipe's food names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FoodMatch {
    /// ingredient is contained in the food name
    #[default]
    Substring,
    Exact,
}

impl FoodMatch {
    fn matches(self, food: &str, ingredient: &str) -> bool {
        match self {
            FoodMatch::Substring => food.contains(ingredient),
            FoodMatch::Exact => food == ingredient,
        }
    }
}

fn filter<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
    mut pred: impl FnMut(&Recipe) -> bool,
) -> Vec<R> {
    recipes.into_iter().filter(|r| pred(r.borrow())).collect()
}

/// `Some(true)` if the recipe uses `ingredient`, `None` if its ingredient
/// list is malformed
fn uses(recipe: &Recipe, ingredient: &str, mode: FoodMatch) -> Option<bool> {
    match recipe.ingredient_names() {
        Ok(names) => Some(names.iter().any(|food| mode.matches(food, ingredient))),
        Err(err) => {
            tracing::warn!("skipping recipe: {err}");
            None
        },
    }
}

pub fn with_ingredient<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
    ingredient: &str, mode: FoodMatch,
) -> Vec<R> {
    filter(recipes, |r| uses(r, ingredient, mode) == Some(true))
}

pub fn without_ingredient<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
    ingredient: &str, mode: FoodMatch,
) -> Vec<R> {
    filter(recipes, |r| uses(r, ingredient, mode) == Some(false))
}

pub fn with_category_slug<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>, slug: &str,
) -> Vec<R> {
    filter(recipes, |r| r.has_category(slug))
}

pub fn without_category_slug<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>, slug: &str,
) -> Vec<R> {
    filter(recipes, |r| !r.has_category(slug))
}

/// First ingredient has no unit. Only the first entry is checked, see
/// [`without_ingredient_units`] for the full scan.
pub fn with_undefined_ingredients<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, |r| r.ingredients().first().is_some_and(|i| !i.has_unit()))
}

pub fn with_disable_amount_set<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, Recipe::amount_disabled)
}

const MIXED_DRINKS: &str = "mixed drinks";

/// No tags, and not filed under the "mixed drinks" category (by name).
pub fn with_no_tags<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, |r| {
        r.tags().is_empty() && !r.category_refs().iter().any(|c| {
            c.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(MIXED_DRINKS))
        })
    })
}

pub fn non_drink_without_tags<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    let untagged = with_no_tags(recipes);
    without_category_slug(without_category_slug(untagged, "mixed-drink"), "drink")
}

pub fn without_ingredient_names<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, |r| r.ingredient_names().is_err())
}

pub fn without_ingredient_units<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, |r| r.ingredients().iter().any(|i| !i.has_unit()))
}

pub fn with_zero_servings<R: Borrow<Recipe>>(
    recipes: impl IntoIterator<Item = R>,
) -> Vec<R> {
    filter(recipes, Recipe::has_zero_servings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn recipe(value: Value) -> Recipe {
        Recipe::from_json(value).unwrap()
    }

    fn with_foods(slug: &str, foods: &[&str]) -> Recipe {
        let ingredients: Vec<_> = foods.iter()
            .map(|f| json!({ "food": { "name": f }, "unit": { "name": "cup" } }))
            .collect();
        recipe(json!({ "slug": slug, "recipeIngredient": ingredients }))
    }

    fn in_category(slug: &str, category: &str) -> Recipe {
        recipe(json!({
            "slug": slug,
            "recipeCategory": [{ "name": category, "slug": category }],
        }))
    }

    fn slugs(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.slug().to_string()).collect()
    }

    #[test]
    fn mojito_has_lime() {
        let r = recipe(json!({
            "slug": "lime-mojito",
            "recipeIngredient": [
                { "food": { "name": "lime" } },
                { "food": { "name": "mint" } },
            ],
        }));

        assert_eq!(with_ingredient(vec![r.clone()], "lime", FoodMatch::Substring), vec![r.clone()]);
        assert!(without_ingredient(vec![r], "lime", FoodMatch::Substring).is_empty());
    }

    #[test]
    fn substring_vs_exact() {
        let rs = [with_foods("pie", &["key lime juice", "sugar"])];

        assert_eq!(with_ingredient(&rs, "lime", FoodMatch::Substring).len(), 1);
        assert!(with_ingredient(&rs, "lime", FoodMatch::Exact).is_empty());
        assert_eq!(with_ingredient(&rs, "key lime juice", FoodMatch::Exact).len(), 1);
    }

    #[test]
    fn recipe_is_listed_once_per_match() {
        let rs = [with_foods("salsa", &["lime", "lime zest"])];
        assert_eq!(with_ingredient(&rs, "lime", FoodMatch::Substring).len(), 1);
    }

    #[test]
    fn with_and_without_partition_well_formed_data() {
        let rs = vec![
            with_foods("a", &["butter", "sugar"]),
            with_foods("b", &["salted butter"]),
            with_foods("c", &["olive oil"]),
            with_foods("d", &[]),
        ];

        for mode in [FoodMatch::Substring, FoodMatch::Exact] {
            let with = slugs(&with_ingredient(&rs, "butter", mode));
            let without = slugs(&without_ingredient(&rs, "butter", mode));
            assert!(with.iter().all(|s| !without.contains(s)));
            assert_eq!(with.len() + without.len(), rs.len());
        }
    }

    #[test]
    fn malformed_ingredients_are_skipped() {
        let rs = vec![
            with_foods("ok", &["flour"]),
            recipe(json!({
                "slug": "header",
                "recipeIngredient": [{ "food": null, "note": "Dough" }, { "food": { "name": "flour" } }],
            })),
        ];

        assert_eq!(slugs(&with_ingredient(&rs, "flour", FoodMatch::Substring)), vec!["ok"]);
        assert!(without_ingredient(&rs, "flour", FoodMatch::Substring).is_empty());
    }

    #[test]
    fn category_filters_partition() {
        let rs = vec![
            in_category("mojito", "mixed-drink"),
            recipe(json!({ "slug": "soup" })),
            in_category("lemonade", "drink"),
        ];

        let with = with_category_slug(&rs, "mixed-drink");
        let without = without_category_slug(&rs, "mixed-drink");
        assert_eq!(slugs(&with), vec!["mojito"]);
        assert_eq!(slugs(&without), vec!["soup", "lemonade"]);
    }

    #[test]
    fn without_mixed_drink_keeps_plain_recipe() {
        let rs = vec![in_category("mojito", "mixed-drink"), recipe(json!({ "slug": "soup" }))];
        assert_eq!(slugs(&without_category_slug(&rs, "mixed-drink")), vec!["soup"]);
    }

    #[test]
    fn no_tags_ignores_mixed_drinks_by_name() {
        let rs = vec![
            recipe(json!({ "slug": "soup", "tags": [] })),
            recipe(json!({ "slug": "tagged", "tags": [{ "slug": "quick", "name": "Quick" }] })),
            recipe(json!({
                "slug": "daiquiri",
                "recipeCategory": [{ "name": "Mixed Drinks", "slug": "mixed-drinks" }],
            })),
        ];
        assert_eq!(slugs(&with_no_tags(&rs)), vec!["soup"]);
    }

    #[test]
    fn non_drinks_without_tags() {
        let rs = vec![
            in_category("mojito", "mixed-drink"),
            in_category("lemonade", "drink"),
            in_category("stew", "dinner"),
            recipe(json!({
                "slug": "salad",
                "tags": [{ "slug": "vegan", "name": "Vegan" }],
            })),
        ];
        assert_eq!(slugs(&non_drink_without_tags(&rs)), vec!["stew"]);
    }

    #[test]
    fn unit_anomalies() {
        let rs = vec![
            recipe(json!({
                "slug": "first-undefined",
                "recipeIngredient": [
                    { "food": { "name": "egg" }, "unit": null },
                    { "food": { "name": "milk" }, "unit": { "name": "cup" } },
                ],
            })),
            recipe(json!({
                "slug": "second-undefined",
                "recipeIngredient": [
                    { "food": { "name": "milk" }, "unit": { "name": "cup" } },
                    { "food": { "name": "egg" }, "unit": null },
                ],
            })),
            with_foods("fine", &["flour"]),
            recipe(json!({ "slug": "empty" })),
        ];

        assert_eq!(slugs(&with_undefined_ingredients(&rs)), vec!["first-undefined"]);
        assert_eq!(
            slugs(&without_ingredient_units(&rs)),
            vec!["first-undefined", "second-undefined"],
        );
    }

    #[test]
    fn missing_names() {
        let rs = vec![
            with_foods("fine", &["flour"]),
            recipe(json!({ "slug": "nameless", "recipeIngredient": [{ "food": {} }] })),
            recipe(json!({ "slug": "foodless", "recipeIngredient": [{ "note": "to serve" }] })),
        ];
        assert_eq!(slugs(&without_ingredient_names(&rs)), vec!["nameless", "foodless"]);
    }

    #[test]
    fn disabled_amount_and_zero_servings() {
        let rs = vec![
            recipe(json!({ "slug": "a", "settings": { "disableAmount": true }, "recipeServings": 0 })),
            recipe(json!({ "slug": "b", "settings": { "disableAmount": false }, "recipeServings": 2 })),
            recipe(json!({ "slug": "c" })),
        ];
        assert_eq!(slugs(&with_disable_amount_set(&rs)), vec!["a"]);
        assert_eq!(slugs(&with_zero_servings(&rs)), vec!["a"]);
    }
}
