
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Clone)]
pub struct ListQuery {
    #[serde(rename = "perPage")]
    per_page: i64,
}

impl ListQuery {
    /// `perPage=-1` disables pagination on the mealie side
    pub fn all() -> Self {
        Self { per_page: -1 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    /// left untyped so one bad record can be dropped on its own
    pub items: Vec<Value>,
    pub page: Option<u32>,
    pub per_page: Option<i64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}
