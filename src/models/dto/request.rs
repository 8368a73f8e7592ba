use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::AppResult,
    models::domain::{Answer, AnswerKey, Difficulty, Role},
    pipeline::{Facet, FilterConfig, ListQuery, SortDirection, SortKey, SortSpec},
};

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9a-fA-F]{6}$").expect("HEX_COLOR_REGEX is a valid regex pattern")
});

/// Query string shared by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,

    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<usize>,
}

impl ListParams {
    pub fn filters(&self) -> FilterConfig {
        let mut filters = FilterConfig::new();
        if let Some(search) = &self.search {
            filters.set_search(search);
        }
        let facets = [
            (Facet::Category, &self.category),
            (Facet::Difficulty, &self.difficulty),
            (Facet::Type, &self.question_type),
            (Facet::Role, &self.role),
            (Facet::Status, &self.status),
        ];
        for (facet, value) in facets {
            if let Some(value) = value {
                filters.set_facet(facet, value);
            }
        }
        filters
    }

    pub fn sort_spec(&self, default: SortSpec) -> AppResult<SortSpec> {
        let key = match &self.sort {
            Some(sort) => sort.parse::<SortKey>()?,
            None => default.key,
        };
        let direction = match &self.order {
            Some(order) => order.parse::<SortDirection>()?,
            None => default.direction,
        };
        Ok(SortSpec::new(key, direction))
    }

    pub fn into_query(self, default_page_size: usize, default_sort: SortSpec) -> AppResult<ListQuery> {
        self.validate()?;
        Ok(ListQuery::new(
            self.filters(),
            self.sort_spec(default_sort)?,
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    pub text: String,
    #[serde(flatten)]
    pub answer_key: AnswerKey,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
}

/// Missing fields fall back to the quiz defaults in settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub question_ids: Vec<String>,
    pub time_limit: Option<u32>,
    pub passing_score: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 500, message = "Description is too long"))]
    pub description: String,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "Color must look like #1a2b3c"))]
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub role: Role,

    pub is_active: Option<bool>,
    pub department: Option<String>,
    pub student_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitResultRequest {
    #[validate(length(min = 1, message = "Quiz is required"))]
    pub quiz_id: String,

    #[validate(length(min = 1, message = "Student is required"))]
    pub student_id: String,

    #[serde(default)]
    pub answers: BTreeMap<usize, Answer>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManualGradeRequest {
    pub question_index: usize,

    #[validate(range(min = 0.0, max = 100.0, message = "Points must be between 0 and 100"))]
    pub points: f64,

    #[validate(length(max = 2000, message = "Feedback is too long"))]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// `question`, `quiz` or `user`; empty or `all` for every kind.
    pub kind: Option<String>,

    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,

    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<usize>,
}
