use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::FieldErrors,
    models::domain::question::Difficulty,
    pipeline::{Facet, Filterable, SortKey, SortValue, Sortable},
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    /// Ordered; the quiz references these questions but does not own them.
    pub question_ids: Vec<String>,
    /// Minutes.
    pub time_limit: u32,
    pub passing_score: u8,
    pub difficulty: Difficulty,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(title: &str, category: &str, question_ids: Vec<String>) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            question_ids,
            time_limit: 30,
            passing_score: 70,
            difficulty: Difficulty::Medium,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.is_active {
            "active"
        } else {
            "inactive"
        }
    }

    pub fn references(&self, question_id: &str) -> bool {
        self.question_ids.iter().any(|id| id == question_id)
    }

    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.add("title", "Title is required");
        }
        if self.category.trim().is_empty() {
            errors.add("category", "Category is required");
        }
        if self.time_limit == 0 {
            errors.add("time_limit", "Time limit must be greater than zero");
        }
        if self.passing_score > 100 {
            errors.add("passing_score", "Passing score must be between 0 and 100");
        }
        errors
    }
}

impl Filterable for Quiz {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.category]
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Category => Some(Cow::Borrowed(&self.category)),
            Facet::Difficulty => Some(Cow::Borrowed(self.difficulty.as_str())),
            Facet::Status => Some(Cow::Borrowed(self.status())),
            Facet::Type | Facet::Role => None,
        }
    }
}

impl Sortable for Quiz {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Date => Some(SortValue::Date(self.created_at)),
            SortKey::Name => Some(SortValue::Text(self.title.clone())),
            SortKey::Score => Some(SortValue::Number(f64::from(self.passing_score))),
        }
    }
}
