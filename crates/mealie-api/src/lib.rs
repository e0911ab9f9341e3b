pub mod client;
pub mod completion;
pub mod config;
pub mod describe;
pub mod query;
pub mod raw;
pub mod recipe;
pub mod report;

pub use client::{MealieClient, MealieError};
pub use completion::{Completer, CompletionConfig, CompletionError, OpenAiClient};
pub use config::{ConfigError, CredentialPaths, Credentials};
pub use describe::{Commit, DescribeError, DescriptionOutcome};
pub use query::FoodMatch;
pub use recipe::{Ingredient, MalformedIngredients, NutritionError, Recipe, Reference};
