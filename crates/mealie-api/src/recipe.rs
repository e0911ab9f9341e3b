use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::client::{MealieClient, MealieError};

/// Full (or summary) mealie recipe document.
///
/// Only the fields this crate reads are typed, everything else is kept in
/// `extra` so a PUT of [`Recipe::to_json`] replaces the document without
/// dropping server data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutrition: Option<Nutrition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipe_servings: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    recipe_ingredient: Vec<Ingredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    recipe_category: Vec<Reference>,
    #[serde(default, deserialize_with = "null_as_default")]
    tags: Vec<Reference>,
    #[serde(default, deserialize_with = "null_as_default")]
    tools: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<RecipeSettings>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    calories: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saturated_fat_content: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSettings {
    #[serde(default)]
    disable_amount: bool,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// One `recipeIngredient` entry. A missing `food` usually means the entry is
/// a section header rather than an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default)]
    food: Option<Relation>,
    #[serde(default)]
    unit: Option<Relation>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// `food` / `unit` relation of an ingredient. Anything that is not an object
/// is kept as is, so one odd entry does not fail the whole recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation {
    Named(Named),
    Malformed(Value),
}

impl Relation {
    fn name(&self) -> Option<&str> {
        match self {
            Relation::Named(n) => n.name.as_deref(),
            Relation::Malformed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// category, tag or tool reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum NutritionError {
    #[error("recipe {slug} has no {field}")]
    Missing { slug: String, field: &'static str },
    #[error("recipe {slug} has non-numeric {field}: '{value}'")]
    NotNumeric {
        slug: String,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("recipe {slug} has an ingredient without a food name (entry {index})")]
pub struct MalformedIngredients {
    pub slug: String,
    pub index: usize,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// mealie stores nutrition as strings, older exports sometimes have numbers
fn nutrient_value(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

impl Ingredient {
    pub fn food_name(&self) -> Option<&str> {
        self.food.as_ref().and_then(Relation::name)
    }

    pub fn has_unit(&self) -> bool {
        matches!(self.unit, Some(Relation::Named(_)))
    }
}

impl Recipe {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub async fn fetch(client: &MealieClient, slug: &str) -> Result<Self, MealieError> {
        client.recipe(slug).await
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Raw top level field of the local document.
    pub fn field(&self, key: &str) -> Option<Value> {
        match self.to_json() {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }

    pub fn slug(&self) -> &str { &self.slug }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn has_description(&self) -> bool {
        !self.description().is_empty()
    }

    pub fn recipe_calories(&self) -> Result<f64, NutritionError> {
        self.nutrient("calories", |n| n.calories.as_ref())
    }

    pub fn calories(&self) -> Result<f64, NutritionError> {
        self.recipe_calories()
    }

    pub fn saturated_fat(&self) -> Result<f64, NutritionError> {
        self.nutrient("saturatedFatContent", |n| n.saturated_fat_content.as_ref())
    }

    fn nutrient(
        &self, field: &'static str,
        get: impl FnOnce(&Nutrition) -> Option<&Value>,
    ) -> Result<f64, NutritionError> {
        let value = match self.nutrition.as_ref().and_then(get) {
            None | Some(Value::Null) => {
                return Err(NutritionError::Missing { slug: self.slug.clone(), field })
            },
            Some(value) => value,
        };
        nutrient_value(value).ok_or_else(|| NutritionError::NotNumeric {
            slug: self.slug.clone(),
            field,
            value: match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        })
    }

    /// Serving count, 1 if the recipe does not specify one.
    pub fn servings(&self) -> f64 {
        let servings = self.recipe_servings.unwrap_or(1.0);
        if servings == 0.0 {
            tracing::warn!("problem with recipe, zero servings: {}", self.slug);
        }
        servings
    }

    pub fn has_zero_servings(&self) -> bool {
        self.recipe_servings == Some(0.0)
    }

    /// Calories per serving. Zero servings yield `f64::INFINITY`.
    pub fn calorie_density(&self) -> Result<f64, NutritionError> {
        Ok(self.per_serving(self.recipe_calories()?))
    }

    pub fn saturated_fat_per_serving(&self) -> Result<f64, NutritionError> {
        Ok(self.per_serving(self.saturated_fat()?))
    }

    fn per_serving(&self, total: f64) -> f64 {
        let servings = self.servings();
        if servings == 0.0 { f64::INFINITY } else { total / servings }
    }

    pub fn ingredients(&self) -> &[Ingredient] { &self.recipe_ingredient }

    /// Food names in ingredient order. Fails if any entry has no food name.
    pub fn ingredient_names(&self) -> Result<Vec<&str>, MalformedIngredients> {
        self.recipe_ingredient.iter().enumerate()
            .map(|(index, i)| i.food_name().ok_or_else(|| MalformedIngredients {
                slug: self.slug.clone(),
                index,
            }))
        .collect()
    }

    pub fn category_refs(&self) -> &[Reference] { &self.recipe_category }

    pub fn categories(&self) -> Vec<&str> { slugs(&self.recipe_category) }

    pub fn tags(&self) -> Vec<&str> { slugs(&self.tags) }

    pub fn tools(&self) -> Vec<&str> { slugs(&self.tools) }

    pub fn has_category(&self, slug: &str) -> bool {
        self.recipe_category.iter().any(|c| c.slug == slug)
    }

    /// cocktails and other drinks are left out of the nutrition reports
    pub fn is_drink(&self) -> bool {
        self.has_category("drink") || self.has_category("mixed-drink")
    }

    pub fn amount_disabled(&self) -> bool {
        self.settings.as_ref().is_some_and(|s| s.disable_amount)
    }

    pub fn url(&self, client: &MealieClient) -> String {
        client.recipe_url(&self.slug)
    }

    /// Sets `key` on the full document and PUTs it to the server. The local
    /// record is replaced by the server's response, or left untouched if the
    /// request fails.
    pub async fn update_field(
        &mut self, client: &MealieClient,
        key: &str, value: impl Into<Value>,
    ) -> Result<&Self, MealieError> {
        if key == "slug" {
            return Err(MealieError::ImmutableField(key.to_string()));
        }

        let mut doc = self.to_json()?;
        if let Value::Object(map) = &mut doc {
            map.insert(key.to_string(), value.into());
        }

        let confirmed: Recipe = client
            .update(&format!("recipes/{}", self.slug), &doc)
        .await?;
        tracing::info!("updated {key} of {}", self.slug);

        *self = confirmed;
        Ok(self)
    }

    pub async fn set_description(
        &mut self, client: &MealieClient, description: &str,
    ) -> Result<&Self, MealieError> {
        self.update_field(client, "description", description).await
    }
}

fn slugs(refs: &[Reference]) -> Vec<&str> {
    refs.iter().map(|r| r.slug.as_str()).collect()
}
