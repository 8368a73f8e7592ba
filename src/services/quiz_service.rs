use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AnswerKey, GradingStatus, Question, Quiz, QuizResult},
        dto::{
            request::QuizRequest,
            response::{AttemptQuestion, AttemptSheet},
        },
    },
    pipeline::{self, ListQuery, Page},
    reorder::{matching::MatchingEditor, ordering::OrderingEditor, Detached},
    repositories::{ReferenceLock, Repository, SettingsRepository},
    services::{load_all, quiz_questions, require},
};

pub struct QuizService {
    quizzes: Arc<dyn Repository<Quiz>>,
    questions: Arc<dyn Repository<Question>>,
    results: Arc<dyn Repository<QuizResult>>,
    settings: Arc<dyn SettingsRepository>,
    references: ReferenceLock,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn Repository<Quiz>>,
        questions: Arc<dyn Repository<Question>>,
        results: Arc<dyn Repository<QuizResult>>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            results,
            settings,
            references: ReferenceLock::default(),
        }
    }

    pub fn with_reference_lock(mut self, references: ReferenceLock) -> Self {
        self.references = references;
        self
    }

    pub async fn list_quizzes(&self) -> AppResult<Vec<Quiz>> {
        load_all(self.quizzes.as_ref(), "quizzes").await
    }

    pub async fn list_view(&self, query: &ListQuery) -> AppResult<Page<Quiz>> {
        let quizzes = self.list_quizzes().await?;
        Ok(pipeline::run(&quizzes, query))
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<Quiz> {
        require(self.quizzes.as_ref(), id).await
    }

    pub async fn create_quiz(&self, request: QuizRequest) -> AppResult<Quiz> {
        let _references = self.references.lock().await;
        let defaults = self.settings.get().await?.quiz_defaults;

        let mut quiz = Quiz::new(&request.title, &request.category, request.question_ids);
        quiz.description = request.description;
        quiz.time_limit = request.time_limit.unwrap_or(defaults.time_limit);
        quiz.passing_score = request.passing_score.unwrap_or(defaults.passing_score);
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }
        self.check(&quiz).await?;

        let created = self.quizzes.create(quiz).await?;
        log::info!(
            "Created quiz '{}' with {} question(s)",
            created.title,
            created.question_ids.len()
        );
        Ok(created)
    }

    /// Fields missing from the request keep their current values.
    pub async fn update_quiz(&self, id: &str, request: QuizRequest) -> AppResult<Quiz> {
        let _references = self.references.lock().await;
        let mut quiz = self.get_quiz(id).await?;
        quiz.title = request.title;
        quiz.description = request.description;
        quiz.category = request.category;
        quiz.question_ids = request.question_ids;
        if let Some(time_limit) = request.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(passing_score) = request.passing_score {
            quiz.passing_score = passing_score;
        }
        if let Some(difficulty) = request.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }
        quiz.updated_at = Utc::now();
        self.check(&quiz).await?;

        let updated = self.quizzes.update(quiz).await?;
        log::info!("Updated quiz {}", updated.id);
        Ok(updated)
    }

    /// Results of a deleted quiz stay. Without a passing score they can no
    /// longer be passed or failed, so decided results become `graded`.
    pub async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.get_quiz(id).await?;
        self.quizzes.delete(id).await?;

        let mut restamped = 0;
        for mut result in self.results.list().await? {
            if result.quiz_id == id
                && matches!(result.status, GradingStatus::Passed | GradingStatus::Failed)
            {
                result.status = GradingStatus::Graded;
                self.results.update(result).await?;
                restamped += 1;
            }
        }
        log::info!("Deleted quiz {} ({} result(s) kept as graded)", id, restamped);
        Ok(())
    }

    pub async fn questions_for(&self, quiz: &Quiz) -> AppResult<Vec<Question>> {
        quiz_questions(self.questions.as_ref(), quiz).await
    }

    /// Builds what a learner sees when starting the quiz: prompts without
    /// answer keys, ordering items shuffled and matching pools shuffled.
    pub async fn start_attempt(&self, id: &str, rng: &Mutex<StdRng>) -> AppResult<AttemptSheet> {
        let quiz = self.get_quiz(id).await?;
        if !quiz.is_active {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' is not active",
                quiz.title
            )));
        }
        let questions = self.questions_for(&quiz).await?;
        let shuffle_questions = self.settings.get().await?.quiz_defaults.shuffle_questions;

        let mut rng = rng
            .lock()
            .map_err(|_| AppError::InternalError("Shuffle generator poisoned".to_string()))?;
        let mut sheet: Vec<AttemptQuestion> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| attempt_question(index, question, &mut *rng))
            .collect();
        if shuffle_questions {
            sheet.shuffle(&mut *rng);
        }
        log::debug!("Started attempt for quiz {}", quiz.id);

        Ok(AttemptSheet {
            quiz_id: quiz.id,
            title: quiz.title,
            time_limit: quiz.time_limit,
            questions: sheet,
        })
    }

    async fn check(&self, quiz: &Quiz) -> AppResult<()> {
        let mut errors = quiz.field_errors();
        let known = self.questions.list().await?;
        let unknown: Vec<&str> = quiz
            .question_ids
            .iter()
            .filter(|id| !known.iter().any(|q| &q.id == *id))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            errors.add(
                "question_ids",
                format!("Unknown question(s): {}", unknown.join(", ")),
            );
        }
        errors.into_result()
    }
}

fn attempt_question(index: usize, question: &Question, rng: &mut StdRng) -> AttemptQuestion {
    let mut sheet = AttemptQuestion {
        index,
        question_id: question.id.clone(),
        text: question.text.clone(),
        question_type: question.question_type(),
        options: Vec::new(),
        items: Vec::new(),
        left_items: Vec::new(),
        right_items: Vec::new(),
    };
    match &question.answer_key {
        AnswerKey::SingleChoice { options, .. } | AnswerKey::MultiChoice { options, .. } => {
            sheet.options = options.clone();
        }
        AnswerKey::Ordering { correct_order } => {
            let editor = OrderingEditor::new(correct_order, None, rng, Detached);
            sheet.items = editor.items().to_vec();
        }
        AnswerKey::Matching { pairs } => {
            let editor = MatchingEditor::new(pairs, None, rng, Detached);
            sheet.left_items = editor.lefts().to_vec();
            sheet.right_items = editor.available().into_iter().map(str::to_string).collect();
        }
        AnswerKey::FillBlank { .. } | AnswerKey::LongAnswer { .. } => {}
    }
    sheet
}
