use mealie_api::{
    describe::set_descriptions, query, report, Commit, Credentials,
    DescriptionOutcome, FoodMatch, MealieClient, OpenAiClient, Recipe,
};

use crate::config::{Config, IngredientFilter, Task};

fn print_slugs(label: &str, recipes: &[Recipe]) {
    tracing::info!("{label}: {} recipes", recipes.len());
    for r in recipes {
        println!("{}", r.slug());
    }
}

pub async fn run(
    task: &Task, config: &Config,
    credentials: &Credentials, client: &MealieClient,
) -> anyhow::Result<()> {
    tracing::info!("running task {task:?}");

    match task {
        Task::Slugs => {
            for slug in client.slugs().await? {
                println!("{slug}");
            }
        },
        Task::CalorieDensity =>
            report::print_calorie_density_sorted(&client.full_recipes().await?)?,
        Task::SatFat =>
            report::print_sat_fat_per_serving_sorted(&client.full_recipes().await?)?,
        Task::NonDrinkWithoutTags => print_slugs(
            "non-drinks without tags",
            &client.recipes_non_drink_wo_tags(None).await?,
        ),
        Task::UndefinedUnits => print_slugs(
            "first ingredient without unit",
            &client.recipes_w_undefined_ingredients(None).await?,
        ),
        Task::DisabledAmount => print_slugs(
            "ingredient amounts disabled",
            &client.recipes_w_disableamount_set(None).await?,
        ),
        Task::MissingIngredientNames => print_slugs(
            "ingredients without names",
            &client.recipes_without_ingredient_names(None).await?,
        ),
        Task::MissingIngredientUnits => print_slugs(
            "ingredients without units",
            &client.recipes_without_ingredient_units(None).await?,
        ),
        Task::ZeroServings => print_slugs(
            "zero servings",
            &client.recipes_w_zero_servings(None).await?,
        ),
        Task::Ingredients(filter) => {
            let recipes = filter_ingredients(client.full_recipes().await?, filter);
            print_slugs("ingredient filter", &recipes);
        },
        Task::Descriptions => {
            let llm = OpenAiClient::new(credentials, config.completion.clone())?;
            let commit = if config.commit_descriptions { Commit::Persist } else { Commit::DryRun };

            let outcomes = set_descriptions(client, &llm, commit).await?;
            let written = outcomes.iter()
                .filter(|(_, o)| matches!(o, DescriptionOutcome::Committed(_)))
            .count();
            tracing::info!("generated descriptions for {} recipes ({written} written)", outcomes.len());
        },
    }

    Ok(())
}

fn filter_ingredients(mut recipes: Vec<Recipe>, filter: &IngredientFilter) -> Vec<Recipe> {
    let mode = if filter.exact { FoodMatch::Exact } else { FoodMatch::Substring };
    for ingredient in &filter.without {
        recipes = query::without_ingredient(recipes, ingredient, mode);
    }
    for ingredient in &filter.with {
        recipes = query::with_ingredient(recipes, ingredient, mode);
    }
    recipes
}
