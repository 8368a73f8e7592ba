use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Category, Question, Quiz},
        dto::request::QuestionRequest,
    },
    pipeline::{self, ListQuery, Page},
    repositories::{ReferenceLock, Repository},
    services::{load_all, require},
};

pub struct QuestionService {
    questions: Arc<dyn Repository<Question>>,
    quizzes: Arc<dyn Repository<Quiz>>,
    categories: Arc<dyn Repository<Category>>,
    references: ReferenceLock,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn Repository<Question>>,
        quizzes: Arc<dyn Repository<Quiz>>,
        categories: Arc<dyn Repository<Category>>,
    ) -> Self {
        Self {
            questions,
            quizzes,
            categories,
            references: ReferenceLock::default(),
        }
    }

    /// Shares the lock other services take for reference checks.
    pub fn with_reference_lock(mut self, references: ReferenceLock) -> Self {
        self.references = references;
        self
    }

    pub async fn list_questions(&self) -> AppResult<Vec<Question>> {
        load_all(self.questions.as_ref(), "questions").await
    }

    pub async fn list_view(&self, query: &ListQuery) -> AppResult<Page<Question>> {
        let questions = self.list_questions().await?;
        log::debug!("Question list query: {:?}", query);
        Ok(pipeline::run(&questions, query))
    }

    pub async fn get_question(&self, id: &str) -> AppResult<Question> {
        require(self.questions.as_ref(), id).await
    }

    pub async fn create_question(&self, request: QuestionRequest) -> AppResult<Question> {
        let _references = self.references.lock().await;
        let mut question = Question::new(
            &request.text,
            request.answer_key,
            &request.category,
            request.difficulty,
        );
        question.explanation = request.explanation;
        self.check(&question).await?;

        let created = self.questions.create(question).await?;
        log::info!("Created {} question {}", created.question_type(), created.id);
        Ok(created)
    }

    pub async fn update_question(&self, id: &str, request: QuestionRequest) -> AppResult<Question> {
        let _references = self.references.lock().await;
        let mut question = self.get_question(id).await?;
        question.text = request.text;
        question.answer_key = request.answer_key;
        question.category = request.category;
        question.difficulty = request.difficulty;
        question.explanation = request.explanation;
        question.updated_at = Utc::now();
        self.check(&question).await?;

        let updated = self.questions.update(question).await?;
        log::info!("Updated question {}", updated.id);
        Ok(updated)
    }

    /// Refused while any quiz still lists the question.
    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        let _references = self.references.lock().await;
        self.get_question(id).await?;

        let referencing: Vec<String> = self
            .quizzes
            .list()
            .await?
            .into_iter()
            .filter(|quiz| quiz.references(id))
            .map(|quiz| quiz.title)
            .collect();
        if !referencing.is_empty() {
            log::warn!("Refusing to delete question {} used by {:?}", id, referencing);
            return Err(AppError::Conflict(format!(
                "Question is used by quiz(zes): {}",
                referencing.join(", ")
            )));
        }

        self.questions.delete(id).await?;
        log::info!("Deleted question {}", id);
        Ok(())
    }

    async fn check(&self, question: &Question) -> AppResult<()> {
        let mut errors = question.field_errors();
        if errors.get("category").is_none() {
            let categories = self.categories.list().await?;
            if !categories.iter().any(|c| c.same_name(&question.category)) {
                errors.add("category", format!("Unknown category '{}'", question.category));
            }
        }
        errors.into_result()
    }
}
