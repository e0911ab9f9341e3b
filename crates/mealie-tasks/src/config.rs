use mealie_api::{CompletionConfig, CredentialPaths};
use tokio::fs;

pub async fn read() -> anyhow::Result<Config> {
    let config_path = "mealie.toml";

    let canon = tokio::fs::canonicalize(".").await?;
    tracing::info!("try reading config file {config_path} at {canon:?}");

    let config = if fs::try_exists(config_path).await? {
        tracing::info!("found config");

        let config = fs::read_to_string(config_path).await?;
        let config = toml::from_str(&config)?;
        tracing::info!("read config");
        config
    } else {
        tracing::info!("config does not exist, using default config");
        Config::default()
    };

    tracing::info!("using config: {config:#?}");
    Ok(config)
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: CredentialPaths,
    pub completion: CompletionConfig,
    pub tasks: Vec<Task>,
    /// write generated descriptions back instead of printing them
    pub commit_descriptions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: CredentialPaths::default(),
            completion: CompletionConfig::default(),
            tasks: vec![Task::CalorieDensity],
            commit_descriptions: false,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    Slugs,
    CalorieDensity,
    SatFat,
    NonDrinkWithoutTags,
    UndefinedUnits,
    DisabledAmount,
    MissingIngredientNames,
    MissingIngredientUnits,
    ZeroServings,
    Descriptions,
    /// e.g. `{ ingredients = { with = ["butter"], without = ["sugar"] } }`
    Ingredients(IngredientFilter),
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct IngredientFilter {
    pub with: Vec<String>,
    pub without: Vec<String>,
    pub exact: bool,
}
