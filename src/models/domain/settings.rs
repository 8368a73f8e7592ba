use serde::{Deserialize, Serialize};

use crate::errors::FieldErrors;

/// Application settings. Every key is known up front and has a default, so a
/// partial document fills in the rest and a misspelled key is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub general: GeneralSettings,
    pub quiz_defaults: QuizDefaults,
    pub grading: GradingSettings,
    pub notifications: NotificationSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralSettings {
    pub site_name: String,
    pub default_page_size: usize,
    pub timezone: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            site_name: "Quiz Dashboard".to_string(),
            default_page_size: 10,
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizDefaults {
    pub time_limit: u32,
    pub passing_score: u8,
    pub shuffle_questions: bool,
    pub allow_retakes: bool,
    pub max_attempts: u32,
}

impl Default for QuizDefaults {
    fn default() -> Self {
        Self {
            time_limit: 30,
            passing_score: 70,
            shuffle_questions: true,
            allow_retakes: true,
            max_attempts: 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingSettings {
    pub auto_grade: bool,
    pub show_correct_answers: bool,
    pub show_explanations: bool,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            auto_grade: true,
            show_correct_answers: true,
            show_explanations: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationSettings {
    pub email_on_submission: bool,
    pub email_on_grading: bool,
}

impl Settings {
    pub const MAX_PAGE_SIZE: usize = 100;

    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.general.site_name.trim().is_empty() {
            errors.add("general.site_name", "Site name is required");
        }
        if !(1..=Self::MAX_PAGE_SIZE).contains(&self.general.default_page_size) {
            errors.add(
                "general.default_page_size",
                format!("Page size must be between 1 and {}", Self::MAX_PAGE_SIZE),
            );
        }
        if self.quiz_defaults.time_limit == 0 {
            errors.add("quiz_defaults.time_limit", "Time limit must be greater than zero");
        }
        if self.quiz_defaults.passing_score > 100 {
            errors.add(
                "quiz_defaults.passing_score",
                "Passing score must be between 0 and 100",
            );
        }
        if self.quiz_defaults.max_attempts == 0 {
            errors.add("quiz_defaults.max_attempts", "Allow at least one attempt");
        }
        errors
    }
}
