use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult, FieldErrors},
    models::{
        domain::{AnswerKey, Question, Quiz, QuizResult, User},
        dto::{
            request::{ManualGradeRequest, SubmitResultRequest},
            response::ResultRow,
        },
    },
    pipeline::{self, ListQuery, Page},
    repositories::{Repository, SettingsRepository},
    services::{grading::grade_result, load_all, quiz_questions, require},
};

pub struct ResultService {
    results: Arc<dyn Repository<QuizResult>>,
    quizzes: Arc<dyn Repository<Quiz>>,
    questions: Arc<dyn Repository<Question>>,
    users: Arc<dyn Repository<User>>,
    settings: Arc<dyn SettingsRepository>,
}

impl ResultService {
    pub fn new(
        results: Arc<dyn Repository<QuizResult>>,
        quizzes: Arc<dyn Repository<Quiz>>,
        questions: Arc<dyn Repository<Question>>,
        users: Arc<dyn Repository<User>>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            results,
            quizzes,
            questions,
            users,
            settings,
        }
    }

    /// Every result joined with its quiz title and student name. Either is
    /// `None` when the quiz or user has since been deleted.
    pub async fn list_rows(&self) -> AppResult<Vec<ResultRow>> {
        let results = load_all(self.results.as_ref(), "results").await?;
        let quizzes = load_all(self.quizzes.as_ref(), "results").await?;
        let users = load_all(self.users.as_ref(), "results").await?;

        Ok(results
            .into_iter()
            .map(|result| {
                let quiz_title = quizzes
                    .iter()
                    .find(|q| q.id == result.quiz_id)
                    .map(|q| q.title.clone());
                let student_name = users
                    .iter()
                    .find(|u| u.id == result.student_id)
                    .map(User::full_name);
                ResultRow {
                    result,
                    quiz_title,
                    student_name,
                }
            })
            .collect())
    }

    pub async fn list_view(&self, query: &ListQuery) -> AppResult<Page<ResultRow>> {
        let rows = self.list_rows().await?;
        Ok(pipeline::run(&rows, query))
    }

    pub async fn get_result(&self, id: &str) -> AppResult<QuizResult> {
        require(self.results.as_ref(), id).await
    }

    /// Stores a finished attempt. With auto-grading on, everything but long
    /// answers is graded immediately.
    pub async fn submit_result(&self, request: SubmitResultRequest) -> AppResult<QuizResult> {
        request.validate()?;
        let quiz = require(self.quizzes.as_ref(), &request.quiz_id).await?;
        require(self.users.as_ref(), &request.student_id).await?;
        let questions = quiz_questions(self.questions.as_ref(), &quiz).await?;

        let mut errors = FieldErrors::new();
        if let Some(index) = request.answers.keys().find(|i| **i >= questions.len()) {
            errors.add(
                "answers",
                format!("Quiz has no question at position {}", index),
            );
        }
        errors.into_result()?;

        let mut result = QuizResult::new(&quiz.id, &request.student_id, request.answers);
        if self.settings.get().await?.grading.auto_grade {
            grade_result(&mut result, &questions, Some(quiz.passing_score));
        }

        let created = self.results.create(result).await?;
        log::info!(
            "Stored result {} for quiz {} ({})",
            created.id,
            quiz.id,
            created.status
        );
        Ok(created)
    }

    /// Records a teacher's points for one long answer and regrades the
    /// whole result.
    pub async fn grade_answer(&self, id: &str, request: ManualGradeRequest) -> AppResult<QuizResult> {
        request.validate()?;
        let mut result = self.get_result(id).await?;
        let quiz = require(self.quizzes.as_ref(), &result.quiz_id).await?;
        let questions = quiz_questions(self.questions.as_ref(), &quiz).await?;

        let index = request.question_index;
        match questions.get(index).map(|q| &q.answer_key) {
            Some(AnswerKey::LongAnswer { .. }) => {}
            Some(_) => {
                return Err(AppError::ValidationError(format!(
                    "Question {} is graded automatically",
                    index
                )))
            }
            None => {
                return Err(AppError::ValidationError(format!(
                    "Quiz has no question at position {}",
                    index
                )))
            }
        }

        result.manual_scores.insert(index, request.points);
        if let Some(feedback) = request.feedback.filter(|f| !f.trim().is_empty()) {
            result.feedback.insert(index, feedback);
        }
        grade_result(&mut result, &questions, Some(quiz.passing_score));

        let updated = self.results.update(result).await?;
        log::info!("Graded answer {} of result {} ({})", index, updated.id, updated.status);
        Ok(updated)
    }
}
