use std::{borrow::Cow, collections::BTreeMap};

use serde::Serialize;

use crate::{
    models::domain::{Category, QuestionType, QuizResult},
    pipeline::{Facet, Filterable, SortKey, SortValue, Sortable},
};

/// A category with its derived question count.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    #[serde(flatten)]
    pub category: Category,
    pub question_count: usize,
}

/// A result joined with the names the results table shows.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    #[serde(flatten)]
    pub result: QuizResult,
    /// `None` once the quiz has been deleted.
    pub quiz_title: Option<String>,
    pub student_name: Option<String>,
}

impl Filterable for ResultRow {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = self.result.search_fields();
        fields.extend(self.quiz_title.as_deref());
        fields.extend(self.student_name.as_deref());
        fields
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        self.result.facet_value(facet)
    }
}

impl Sortable for ResultRow {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Name => Some(SortValue::Text(
                self.student_name
                    .clone()
                    .unwrap_or_else(|| self.result.student_id.clone()),
            )),
            _ => self.result.sort_value(key),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Question,
    Quiz,
    User,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Question => "question",
            SearchKind::Quiz => "quiz",
            SearchKind::User => "user",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub kind: SearchKind,
    pub id: String,
    pub title: String,
    /// Display only; never searched.
    pub subtitle: String,
    /// The source record's own search fields.
    #[serde(skip)]
    pub search_text: Vec<String>,
}

impl SearchHit {
    pub fn new<R: Filterable>(
        kind: SearchKind,
        record: &R,
        id: String,
        title: String,
        subtitle: String,
    ) -> Self {
        let search_text = record
            .search_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            kind,
            id,
            title,
            subtitle,
            search_text,
        }
    }
}

impl Filterable for SearchHit {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.search_text.iter().map(String::as_str));
        fields
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Type => Some(Cow::Borrowed(self.kind.as_str())),
            _ => None,
        }
    }
}

impl Sortable for SearchHit {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Name => Some(SortValue::Text(self.title.clone())),
            SortKey::Date | SortKey::Score => None,
        }
    }
}

/// A view of one quiz the learner is about to take: no answer keys, and
/// ordering items and matching pools already shuffled.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSheet {
    pub quiz_id: String,
    pub title: String,
    pub time_limit: u32,
    pub questions: Vec<AttemptQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptQuestion {
    pub index: usize,
    pub question_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Ordering items in their initial (shuffled) order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub left_items: Vec<String>,
    /// Matching pool in display order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub right_items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuizStats {
    pub quiz_id: String,
    pub title: String,
    pub attempts: usize,
    pub average_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_questions: usize,
    pub total_quizzes: usize,
    pub active_quizzes: usize,
    pub total_categories: usize,
    pub total_users: usize,
    pub users_by_role: BTreeMap<String, usize>,
    pub questions_by_difficulty: BTreeMap<String, usize>,
    pub questions_by_type: BTreeMap<String, usize>,
    pub total_results: usize,
    pub pending_grading: usize,
    pub average_score: Option<f64>,
    pub pass_rate: Option<f64>,
    pub quizzes: Vec<QuizStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
