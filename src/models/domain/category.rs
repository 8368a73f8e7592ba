use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// `#rrggbb`
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: &str, description: &str, color: &str) -> Self {
        let now = Utc::now();
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Category names are compared without regard to case.
    pub fn same_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}
