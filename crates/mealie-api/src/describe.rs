//! Recipe descriptions written by a language model.

use serde_json::Value;

use crate::{
    client::{MealieClient, MealieError},
    completion::{Completer, CompletionError},
    recipe::Recipe,
};

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that summarizes recipes concisely.";

/// Whether a generated description is written back to mealie.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// only print the description
    #[default]
    DryRun,
    Persist,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionOutcome {
    /// recipe already has a description
    Skipped,
    DryRun(String),
    Committed(String),
    Unparsable { content: String, error: String },
    MissingSlug { content: String },
}

#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    #[error(transparent)]
    Mealie(#[from] MealieError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("could not encode recipe: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn description_prompt(recipe: &Recipe) -> Result<String, serde_json::Error> {
    let slug = recipe.slug();
    let doc = recipe.to_json()?;
    Ok(format!(r#"Please parse the json Mealie recipe attached and return a concise, appealing description of it.
Return a json object mapping the slug to the description.

Format your response exactly like:
{{
  "{slug}": "Your one- or two-sentence description here."
}}

recipe: {doc}
"#))
}

fn extract(slug: &str, content: &str) -> Result<String, DescriptionOutcome> {
    let unparsable = |error: String| DescriptionOutcome::Unparsable {
        content: content.to_string(),
        error,
    };

    let map = match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(unparsable("expected a json object".to_string())),
        Err(err) => return Err(unparsable(err.to_string())),
    };

    map.get(slug)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
    .ok_or_else(|| DescriptionOutcome::MissingSlug { content: content.to_string() })
}

/// Asks the model for a description of `recipe`. Nothing is written unless
/// `commit` is [`Commit::Persist`] and the response has a description for
/// the recipe's slug.
pub async fn describe(
    recipe: &mut Recipe,
    completer: &dyn Completer,
    client: &MealieClient,
    commit: Commit,
) -> Result<DescriptionOutcome, DescribeError> {
    if recipe.has_description() {
        tracing::debug!("{} already has a description", recipe.slug());
        return Ok(DescriptionOutcome::Skipped);
    }

    let prompt = description_prompt(recipe)?;
    let content = completer.complete(SYSTEM_PROMPT, &prompt).await?;

    let description = match extract(recipe.slug(), &content) {
        Ok(v) => v,
        Err(outcome) => {
            match &outcome {
                DescriptionOutcome::Unparsable { content, error } =>
                    tracing::warn!("Failed to parse OpenAI response:\n{content}\nError: {error}"),
                DescriptionOutcome::MissingSlug { content } =>
                    tracing::warn!("Slug '{}' not found in response: {content}", recipe.slug()),
                _ => {},
            }
            return Ok(outcome);
        },
    };

    Ok(match commit {
        Commit::DryRun => {
            println!("{description}");
            DescriptionOutcome::DryRun(description)
        },
        Commit::Persist => {
            recipe.set_description(client, &description).await?;
            DescriptionOutcome::Committed(description)
        },
    })
}

/// Runs [`describe`] for every recipe without a description, one at a time.
pub async fn set_descriptions(
    client: &MealieClient,
    completer: &dyn Completer,
    commit: Commit,
) -> Result<Vec<(String, DescriptionOutcome)>, DescribeError> {
    let mut missing: Vec<_> = client.full_recipes().await?
        .into_iter()
        .filter(|r| !r.has_description())
    .collect();

    for r in &missing {
        println!("{}", r.url(client));
    }

    let mut outcomes = Vec::with_capacity(missing.len());
    for r in &mut missing {
        let outcome = describe(r, completer, client, commit).await?;
        outcomes.push((r.slug().to_string(), outcome));
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_embeds_slug_and_recipe() {
        let r = Recipe::from_json(json!({
            "slug": "sushi-rice",
            "recipeIngredient": [{ "food": { "name": "rice vinegar" } }],
        })).unwrap();

        let prompt = description_prompt(&r).unwrap();
        assert!(prompt.contains(r#""sushi-rice": "Your one- or two-sentence description here.""#));
        assert!(prompt.contains("rice vinegar"));
    }

    #[test]
    fn extracts_description_for_slug() {
        assert_eq!(extract("my-slug", r#"{"my-slug": "desc"}"#), Ok("desc".to_string()));
    }

    #[test]
    fn non_json_is_unparsable() {
        let out = extract("my-slug", "Sure! Here is a description.").unwrap_err();
        assert!(matches!(out, DescriptionOutcome::Unparsable { ref content, .. }
            if content == "Sure! Here is a description."));

        assert!(matches!(
            extract("my-slug", r#"["desc"]"#),
            Err(DescriptionOutcome::Unparsable { .. }),
        ));
    }

    #[test]
    fn other_slug_is_missing() {
        assert_eq!(
            extract("my-slug", r#"{"other": "desc"}"#),
            Err(DescriptionOutcome::MissingSlug { content: r#"{"other": "desc"}"#.into() }),
        );
        assert!(matches!(
            extract("my-slug", r#"{"my-slug": 3}"#),
            Err(DescriptionOutcome::MissingSlug { .. }),
        ));
    }
}
