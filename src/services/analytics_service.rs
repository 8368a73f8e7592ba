use std::{collections::BTreeMap, sync::Arc};

use crate::{
    errors::AppResult,
    models::{
        domain::{Category, GradingStatus, Question, Quiz, QuizResult, User},
        dto::response::{DashboardStats, QuizStats},
    },
    repositories::Repository,
    services::load_all,
};

pub struct AnalyticsService {
    questions: Arc<dyn Repository<Question>>,
    quizzes: Arc<dyn Repository<Quiz>>,
    categories: Arc<dyn Repository<Category>>,
    users: Arc<dyn Repository<User>>,
    results: Arc<dyn Repository<QuizResult>>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key.to_string()).or_insert(0) += 1;
    }
    counts
}

impl AnalyticsService {
    pub fn new(
        questions: Arc<dyn Repository<Question>>,
        quizzes: Arc<dyn Repository<Quiz>>,
        categories: Arc<dyn Repository<Category>>,
        users: Arc<dyn Repository<User>>,
        results: Arc<dyn Repository<QuizResult>>,
    ) -> Self {
        Self {
            questions,
            quizzes,
            categories,
            users,
            results,
        }
    }

    /// Everything on the dashboard overview, derived from current contents.
    /// Scores only count once they are known; the pass rate is over results
    /// that were decided against a passing score.
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let questions = load_all(self.questions.as_ref(), "analytics").await?;
        let quizzes = load_all(self.quizzes.as_ref(), "analytics").await?;
        let categories = load_all(self.categories.as_ref(), "analytics").await?;
        let users = load_all(self.users.as_ref(), "analytics").await?;
        let results = load_all(self.results.as_ref(), "analytics").await?;

        let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
        let passed = results
            .iter()
            .filter(|r| r.status == GradingStatus::Passed)
            .count();
        let decided = passed
            + results
                .iter()
                .filter(|r| r.status == GradingStatus::Failed)
                .count();
        let pass_rate = (decided > 0)
            .then(|| ((passed as f64 / decided as f64) * 1000.0).round() / 10.0);

        let quiz_stats = quizzes
            .iter()
            .map(|quiz| {
                let attempts: Vec<&QuizResult> =
                    results.iter().filter(|r| r.quiz_id == quiz.id).collect();
                let quiz_scores: Vec<f64> = attempts.iter().filter_map(|r| r.score).collect();
                QuizStats {
                    quiz_id: quiz.id.clone(),
                    title: quiz.title.clone(),
                    attempts: attempts.len(),
                    average_score: mean(&quiz_scores),
                }
            })
            .collect();

        Ok(DashboardStats {
            total_questions: questions.len(),
            total_quizzes: quizzes.len(),
            active_quizzes: quizzes.iter().filter(|q| q.is_active).count(),
            total_categories: categories.len(),
            total_users: users.len(),
            users_by_role: tally(users.iter().map(|u| u.role.as_str())),
            questions_by_difficulty: tally(questions.iter().map(|q| q.difficulty.as_str())),
            questions_by_type: tally(questions.iter().map(|q| q.question_type().as_str())),
            total_results: results.len(),
            pending_grading: results.iter().filter(|r| r.status.is_pending()).count(),
            average_score: mean(&scores),
            pass_rate,
            quizzes: quiz_stats,
        })
    }
}
