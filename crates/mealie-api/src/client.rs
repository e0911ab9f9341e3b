use std::time::Duration;

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::Credentials,
    query::{self, FoodMatch},
    raw::{ListQuery, RecipePage},
    recipe::Recipe,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum MealieError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("Failed to connect to Mealie API: {0}")]
    Status(StatusCode),
    #[error("invalid recipe json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("field '{0}' cannot be changed")]
    ImmutableField(String),
}

/// Authenticated access to the mealie REST API.
#[derive(Clone)]
pub struct MealieClient {
    http: reqwest::Client,
    api_base: String,
    site_base: String,
    token: String,
}

impl MealieClient {
    pub fn new(credentials: &Credentials) -> Result<Self, MealieError> {
        Self::with_api_base(credentials, credentials.api_base())
    }

    /// Like [`MealieClient::new`] but talks to `api_base` instead of
    /// `https://{domain}/api/`.
    pub fn with_api_base(
        credentials: &Credentials,
        api_base: impl Into<String>,
    ) -> Result<Self, MealieError> {
        let mut api_base = api_base.into();
        if !api_base.ends_with('/') { api_base.push('/') }

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
        .build()?;

        Ok(Self {
            http,
            api_base,
            site_base: credentials.recipe_url(""),
            token: credentials.mealie_key().to_string(),
        })
    }

    pub fn recipe_url(&self, slug: &str) -> String {
        format!("{}{slug}", self.site_base)
    }

    /// GET `{api_base}{path}`, anything but 200 is an error
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, MealieError> {
        self.fetch_query(path, None::<&()>).await
    }

    async fn fetch_query<T, Q>(
        &self, path: &str, query: Option<&Q>,
    ) -> Result<T, MealieError>
    where T: DeserializeOwned, Q: Serialize + ?Sized
    {
        let url = format!("{}{path}", self.api_base);
        tracing::debug!("GET {url}");

        let mut req = self.http.get(&url).bearer_auth(&self.token);
        if let Some(query) = query {
            req = req.query(query);
        }
        read_json(req.send().await?).await
    }

    /// PUT `body` as json to `{api_base}{path}`
    pub async fn update<T, B>(&self, path: &str, body: &B) -> Result<T, MealieError>
    where T: DeserializeOwned, B: Serialize + ?Sized
    {
        let url = format!("{}{path}", self.api_base);
        tracing::debug!("PUT {url}");

        let res = self.http.put(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send().await?;
        read_json(res).await
    }

    /// Summary records of every recipe in one call.
    pub async fn base_recipes(&self) -> Result<Vec<Recipe>, MealieError> {
        let page: RecipePage = self.fetch_query("recipes", Some(&ListQuery::all())).await?;
        let recipes: Vec<Recipe> = page.items.into_iter()
            .filter_map(|item| decode_or_skip(item, "recipe list"))
        .collect();
        tracing::info!("fetched {} base recipes", recipes.len());
        Ok(recipes)
    }

    pub async fn slugs(&self) -> Result<Vec<String>, MealieError> {
        Ok(self.base_recipes().await?
            .into_iter()
            .map(|r| r.slug().to_string())
        .collect())
    }

    pub async fn recipe(&self, slug: &str) -> Result<Recipe, MealieError> {
        self.fetch(&format!("recipes/{slug}")).await
    }

    /// Every recipe with full detail, fetched one by one.
    pub async fn full_recipes(&self) -> Result<Vec<Recipe>, MealieError> {
        let slugs = self.slugs().await?;
        let mut recipes = Vec::with_capacity(slugs.len());
        for slug in &slugs {
            let doc: Value = self.fetch(&format!("recipes/{slug}")).await?;
            recipes.extend(decode_or_skip(doc, slug));
        }
        tracing::info!("fetched {} full recipes", recipes.len());
        Ok(recipes)
    }

    pub async fn recipes(&self) -> Result<Vec<Recipe>, MealieError> {
        self.full_recipes().await
    }

    async fn or_base(&self, recipes: Option<Vec<Recipe>>) -> Result<Vec<Recipe>, MealieError> {
        match recipes {
            Some(v) => Ok(v),
            None => self.base_recipes().await,
        }
    }

    async fn or_full(&self, recipes: Option<Vec<Recipe>>) -> Result<Vec<Recipe>, MealieError> {
        match recipes {
            Some(v) => Ok(v),
            None => self.full_recipes().await,
        }
    }

    pub async fn recipes_with(
        &self, ingredient: &str, mode: FoodMatch,
        recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_ingredient(self.or_full(recipes).await?, ingredient, mode))
    }

    pub async fn recipes_without(
        &self, ingredient: &str, mode: FoodMatch,
        recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::without_ingredient(self.or_full(recipes).await?, ingredient, mode))
    }

    pub async fn recipes_w_category_slug(
        &self, slug: &str, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_category_slug(self.or_base(recipes).await?, slug))
    }

    pub async fn recipes_wo_category_slug(
        &self, slug: &str, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::without_category_slug(self.or_base(recipes).await?, slug))
    }

    pub async fn recipes_w_undefined_ingredients(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_undefined_ingredients(self.or_full(recipes).await?))
    }

    pub async fn recipes_w_disableamount_set(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_disable_amount_set(self.or_full(recipes).await?))
    }

    pub async fn recipes_w_no_tags(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_no_tags(self.or_base(recipes).await?))
    }

    pub async fn recipes_non_drink_wo_tags(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::non_drink_without_tags(self.or_base(recipes).await?))
    }

    pub async fn recipes_without_ingredient_names(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::without_ingredient_names(self.or_full(recipes).await?))
    }

    pub async fn recipes_without_ingredient_units(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::without_ingredient_units(self.or_full(recipes).await?))
    }

    pub async fn recipes_w_zero_servings(
        &self, recipes: Option<Vec<Recipe>>,
    ) -> Result<Vec<Recipe>, MealieError> {
        Ok(query::with_zero_servings(self.or_full(recipes).await?))
    }
}

async fn read_json<T: DeserializeOwned>(res: reqwest::Response) -> Result<T, MealieError> {
    let status = res.status();
    if status != StatusCode::OK {
        tracing::warn!("Failed to connect to Mealie API: {status}");
        return Err(MealieError::Status(status));
    }
    let body = res.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn decode_or_skip(doc: Value, source: &str) -> Option<Recipe> {
    Recipe::from_json(doc)
        .inspect_err(|err| tracing::warn!("skipping unreadable recipe ({source}): {err}"))
    .ok()
}
