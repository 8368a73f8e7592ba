use std::{borrow::Cow, collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, FieldErrors},
    pipeline::{Facet, Filterable, SortKey, SortValue, Sortable},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultiChoice,
    FillBlank,
    LongAnswer,
    Matching,
    Ordering,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::SingleChoice,
        QuestionType::MultiChoice,
        QuestionType::FillBlank,
        QuestionType::LongAnswer,
        QuestionType::Matching,
        QuestionType::Ordering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single-choice",
            QuestionType::MultiChoice => "multi-choice",
            QuestionType::FillBlank => "fill-blank",
            QuestionType::LongAnswer => "long-answer",
            QuestionType::Matching => "matching",
            QuestionType::Ordering => "ordering",
        }
    }

    /// Long answers are the only type a teacher has to grade by hand.
    pub fn needs_manual_grading(&self) -> bool {
        matches!(self, QuestionType::LongAnswer)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown question type '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

impl MatchPair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// The answer key for a question. Its variant *is* the question type, so a
/// question can never carry a key for a different type.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnswerKey {
    SingleChoice {
        options: Vec<String>,
        correct_option: usize,
    },
    MultiChoice {
        options: Vec<String>,
        correct_options: Vec<usize>,
    },
    FillBlank {
        correct_answer: String,
    },
    LongAnswer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sample_answer: Option<String>,
    },
    Matching {
        pairs: Vec<MatchPair>,
    },
    Ordering {
        correct_order: Vec<String>,
    },
}

impl AnswerKey {
    pub fn question_type(&self) -> QuestionType {
        match self {
            AnswerKey::SingleChoice { .. } => QuestionType::SingleChoice,
            AnswerKey::MultiChoice { .. } => QuestionType::MultiChoice,
            AnswerKey::FillBlank { .. } => QuestionType::FillBlank,
            AnswerKey::LongAnswer { .. } => QuestionType::LongAnswer,
            AnswerKey::Matching { .. } => QuestionType::Matching,
            AnswerKey::Ordering { .. } => QuestionType::Ordering,
        }
    }

    fn check(&self, errors: &mut FieldErrors) {
        match self {
            AnswerKey::SingleChoice {
                options,
                correct_option,
            } => {
                check_options(options, errors);
                if *correct_option >= options.len() {
                    errors.add("correct_option", "Select the correct option");
                }
            }
            AnswerKey::MultiChoice {
                options,
                correct_options,
            } => {
                check_options(options, errors);
                let unique: HashSet<_> = correct_options.iter().collect();
                if correct_options.is_empty() {
                    errors.add("correct_options", "Select at least one correct option");
                } else if unique.len() != correct_options.len()
                    || correct_options.iter().any(|i| *i >= options.len())
                {
                    errors.add("correct_options", "Correct options must be distinct existing options");
                }
            }
            AnswerKey::FillBlank { correct_answer } => {
                if correct_answer.trim().is_empty() {
                    errors.add("correct_answer", "Correct answer is required");
                }
            }
            AnswerKey::LongAnswer { .. } => {}
            AnswerKey::Matching { pairs } => {
                if pairs.len() < 2 {
                    errors.add("pairs", "At least two pairs are required");
                }
                let lefts: HashSet<_> = pairs.iter().map(|p| p.left.trim()).collect();
                let rights: HashSet<_> = pairs.iter().map(|p| p.right.trim()).collect();
                if pairs
                    .iter()
                    .any(|p| p.left.trim().is_empty() || p.right.trim().is_empty())
                {
                    errors.add("pairs", "Every pair needs both sides filled in");
                } else if lefts.len() != pairs.len() || rights.len() != pairs.len() {
                    errors.add("pairs", "Pair items must be unique");
                }
            }
            AnswerKey::Ordering { correct_order } => {
                if correct_order.len() < 2 {
                    errors.add("correct_order", "At least two items are required");
                }
                let unique: HashSet<_> = correct_order.iter().map(|s| s.trim()).collect();
                if correct_order.iter().any(|s| s.trim().is_empty()) {
                    errors.add("correct_order", "Items cannot be empty");
                } else if unique.len() != correct_order.len() {
                    errors.add("correct_order", "Items must be unique");
                }
            }
        }
    }
}

fn check_options(options: &[String], errors: &mut FieldErrors) {
    if options.len() < 2 {
        errors.add("options", "At least two options are required");
    } else if options.iter().any(|o| o.trim().is_empty()) {
        errors.add("options", "Options cannot be empty");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub answer_key: AnswerKey,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(text: &str, answer_key: AnswerKey, category: &str, difficulty: Difficulty) -> Self {
        let now = Utc::now();
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            answer_key,
            category: category.to_string(),
            difficulty,
            explanation: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.answer_key.question_type()
    }

    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.text.trim().is_empty() {
            errors.add("text", "Question text is required");
        }
        if self.category.trim().is_empty() {
            errors.add("category", "Category is required");
        }
        self.answer_key.check(&mut errors);
        errors
    }
}

impl Filterable for Question {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.text, &self.category]
    }

    fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
        match facet {
            Facet::Category => Some(Cow::Borrowed(&self.category)),
            Facet::Difficulty => Some(Cow::Borrowed(self.difficulty.as_str())),
            Facet::Type => Some(Cow::Borrowed(self.question_type().as_str())),
            Facet::Role | Facet::Status => None,
        }
    }
}

impl Sortable for Question {
    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Date => Some(SortValue::Date(self.created_at)),
            SortKey::Name => Some(SortValue::Text(self.text.clone())),
            SortKey::Score => None,
        }
    }
}
