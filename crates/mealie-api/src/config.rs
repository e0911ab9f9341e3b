use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?} is empty")]
    Empty { path: PathBuf },
}

/// Where the four credential files live.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct CredentialPaths {
    pub mealie_key: PathBuf,
    pub openai_key: PathBuf,
    pub domain: PathBuf,
    pub group: PathBuf,
}

impl Default for CredentialPaths {
    fn default() -> Self {
        Self {
            mealie_key: "mealie.key".into(),
            openai_key: "openai.key".into(),
            domain: "domain.txt".into(),
            group: "group.txt".into(),
        }
    }
}

impl CredentialPaths {
    /// same file names, relative to `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let d = Self::default();
        Self {
            mealie_key: dir.join(d.mealie_key),
            openai_key: dir.join(d.openai_key),
            domain: dir.join(d.domain),
            group: dir.join(d.group),
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    mealie_key: String,
    openai_key: String,
    domain: String,
    group: String,
}

impl Credentials {
    pub fn load(paths: &CredentialPaths) -> Result<Self, ConfigError> {
        let creds = Self {
            mealie_key: read_value(&paths.mealie_key)?,
            openai_key: read_value(&paths.openai_key)?,
            domain: read_value(&paths.domain)?,
            group: read_value(&paths.group)?,
        };
        tracing::info!("loaded credentials for {}", creds.domain);
        Ok(creds)
    }

    pub fn new(
        mealie_key: impl Into<String>, openai_key: impl Into<String>,
        domain: impl Into<String>, group: impl Into<String>,
    ) -> Self {
        Self {
            mealie_key: mealie_key.into(),
            openai_key: openai_key.into(),
            domain: domain.into(),
            group: group.into(),
        }
    }

    pub fn mealie_key(&self) -> &str { &self.mealie_key }
    pub fn openai_key(&self) -> &str { &self.openai_key }

    pub fn api_base(&self) -> String {
        format!("https://{}/api/", self.domain)
    }

    pub fn recipe_url(&self, slug: &str) -> String {
        format!("https://{}/g/{}/r/{slug}", self.domain, self.group)
    }
}

// keep the keys out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("mealie_key", &"<redacted>")
            .field("openai_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("group", &self.group)
        .finish()
    }
}

fn read_value(path: &Path) -> Result<String, ConfigError> {
    let value = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { path: path.to_owned() });
    }
    Ok(value.to_string())
}
