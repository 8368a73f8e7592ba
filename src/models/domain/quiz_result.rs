use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt,
    str::FromStr,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::AppError,
    pipeline::{Facet, Filterable, SortKey, SortValue, Sortable},
};

/// A learner's answer to one question, shaped like the question's answer key.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    Choice(usize),
    Choices(Vec<usize>),
    Text(String),
    /// left -> right
    Pairs(BTreeMap<String, String>),
    Order(Vec<String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingStatus {
    NeedsGrading,
    PartiallyGraded,
    Graded,
    Passed,
    Failed,
}

impl GradingStatus {
    pub const ALL: [GradingStatus; 5] = [
        GradingStatus::NeedsGrading,
        GradingStatus::PartiallyGraded,
        GradingStatus::Graded,
        GradingStatus::Passed,
        GradingStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradingStatus::NeedsGrading => "needs_grading",
            GradingStatus::PartiallyGraded => "partially_graded",
            GradingStatus::Graded => "graded",
            GradingStatus::Passed => "passed",
            GradingStatus::Failed => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GradingStatus::NeedsGrading | GradingStatus::PartiallyGraded)
    }
}

impl fmt::Display for GradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradingStatus::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown grading status '{s}'")))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizResult {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    /// 0-100; `None` while long answers wait for a teacher.
    pub score: Option<f64>,
    /// Keyed by the question's position in the quiz.
    pub answers: BTreeMap<usize, Answer>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub feedback: BTreeMap<usize, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub manual_scores: BTreeMap<usize, f64>,
    pub status: GradingStatus,
}

impl QuizResult {
    pub fn new(quiz_id: &str, student_id: &str, answers: BTreeMap<usize, Answer>) -> Self {
        let now = Utc::now();
        QuizResult {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            student_id: student_id.to_string(),
            score: None,
            answers,
            started_at: now,
            completed_at: now,
            feedback: BTreeMap::new(),
            manual_scores: BTreeMap::new(),
            status: GradingStatus::NeedsGrading,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.score.is_none()
    }
}

impl Filterable for QuizResult {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.quiz_id, &self.student_id]
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Status => Some(Cow::Borrowed(self.status.as_str())),
            Facet::Category | Facet::Difficulty | Facet::Type | Facet::Role => None,
        }
    }
}

impl Sortable for QuizResult {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Date => Some(SortValue::Date(self.completed_at)),
            SortKey::Score => self.score.map(SortValue::Number),
            SortKey::Name => Some(SortValue::Text(self.student_id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_round_trip_with_integer_keys() {
        let mut answers = BTreeMap::new();
        answers.insert(0, Answer::Choice(2));
        answers.insert(3, Answer::Order(vec!["b".into(), "a".into()]));
        let result = QuizResult::new("quiz-1", "student-1", answers);

        let json = serde_json::to_string(&result).expect("result should serialize");
        let parsed: QuizResult = serde_json::from_str(&json).expect("result should deserialize");

        assert_eq!(parsed.answers.get(&3), Some(&Answer::Order(vec!["b".into(), "a".into()])));
        assert!(parsed.is_pending());
        assert_eq!(parsed.status, GradingStatus::NeedsGrading);
    }

    #[test]
    fn pending_result_has_no_score_sort_value() {
        let mut result = QuizResult::new("quiz-1", "student-1", BTreeMap::new());
        assert!(result.sort_value(SortKey::Score).is_none());

        result.score = Some(55.0);
        assert_eq!(result.sort_value(SortKey::Score), Some(SortValue::Number(55.0)));
    }

    #[test]
    fn grading_status_parses_snake_case() {
        assert_eq!(
            "partially_graded".parse::<GradingStatus>().unwrap(),
            GradingStatus::PartiallyGraded
        );
        assert!(GradingStatus::NeedsGrading.is_pending());
        assert!(!GradingStatus::Passed.is_pending());
    }
}
