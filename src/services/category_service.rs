use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Category, Question, Quiz},
        dto::{request::CategoryRequest, response::CategorySummary},
    },
    repositories::{ReferenceLock, Repository},
    services::{load_all, require},
};

pub struct CategoryService {
    categories: Arc<dyn Repository<Category>>,
    questions: Arc<dyn Repository<Question>>,
    quizzes: Arc<dyn Repository<Quiz>>,
    references: ReferenceLock,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn Repository<Category>>,
        questions: Arc<dyn Repository<Question>>,
        quizzes: Arc<dyn Repository<Quiz>>,
    ) -> Self {
        Self {
            categories,
            questions,
            quizzes,
            references: ReferenceLock::default(),
        }
    }

    pub fn with_reference_lock(mut self, references: ReferenceLock) -> Self {
        self.references = references;
        self
    }

    /// Categories by name, each with the number of questions filed under it.
    pub async fn list_categories(&self) -> AppResult<Vec<CategorySummary>> {
        let mut categories = load_all(self.categories.as_ref(), "categories").await?;
        let questions = load_all(self.questions.as_ref(), "categories").await?;
        categories.sort_by_key(|c| c.name.to_lowercase());

        Ok(categories
            .into_iter()
            .map(|category| {
                let question_count = questions
                    .iter()
                    .filter(|q| category.same_name(&q.category))
                    .count();
                CategorySummary {
                    category,
                    question_count,
                }
            })
            .collect())
    }

    pub async fn get_category(&self, id: &str) -> AppResult<Category> {
        require(self.categories.as_ref(), id).await
    }

    pub async fn create_category(&self, request: CategoryRequest) -> AppResult<Category> {
        request.validate()?;
        let category = Category::new(request.name.trim(), &request.description, &request.color);
        let created = self.categories.create(category).await?;
        log::info!("Created category '{}'", created.name);
        Ok(created)
    }

    /// A rename is carried over to every question and quiz filed under the
    /// old name. If that fails part way, the references and the category are
    /// put back under the old name.
    pub async fn update_category(&self, id: &str, request: CategoryRequest) -> AppResult<Category> {
        request.validate()?;
        let _references = self.references.lock().await;
        let original = self.get_category(id).await?;
        let mut category = original.clone();
        category.name = request.name.trim().to_string();
        category.description = request.description;
        category.color = request.color;
        category.updated_at = Utc::now();

        let updated = self.categories.update(category).await?;
        if updated.name == original.name {
            return Ok(updated);
        }
        if let Err(err) = self.rename_references(&original.name, &updated.name).await {
            log::error!(
                "Renaming category '{}' to '{}' stopped part way: {}",
                original.name,
                updated.name,
                err
            );
            if let Err(revert) = self.rename_references(&updated.name, &original.name).await {
                log::error!(
                    "Some questions or quizzes are still filed under '{}': {}",
                    updated.name,
                    revert
                );
            }
            self.categories.update(original).await?;
            return Err(err);
        }
        log::info!("Renamed category '{}' to '{}'", original.name, updated.name);
        Ok(updated)
    }

    /// Refused while questions are still filed under the category.
    pub async fn delete_category(&self, id: &str) -> AppResult<()> {
        let _references = self.references.lock().await;
        let category = self.get_category(id).await?;
        let in_use = self
            .questions
            .list()
            .await?
            .iter()
            .filter(|q| category.same_name(&q.category))
            .count();
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "Category '{}' still has {} question(s)",
                category.name, in_use
            )));
        }

        self.categories.delete(id).await?;
        log::info!("Deleted category '{}'", category.name);
        Ok(())
    }

    async fn rename_references(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        let old = old_name.to_lowercase();
        for mut question in self.questions.list().await? {
            if question.category.to_lowercase() == old {
                question.category = new_name.to_string();
                self.questions.update(question).await?;
            }
        }
        for mut quiz in self.quizzes.list().await? {
            if quiz.category.to_lowercase() == old {
                quiz.category = new_name.to_string();
                self.quizzes.update(quiz).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::Database,
        repositories::MockRepository,
        test_utils::fixtures,
    };

    fn request(name: &str) -> CategoryRequest {
        CategoryRequest {
            name: name.to_string(),
            description: String::new(),
            color: "#123abc".to_string(),
        }
    }

    fn seeded() -> (CategoryService, Database) {
        let database = fixtures::seeded_database();
        let service = CategoryService::new(
            database.categories.clone(),
            database.questions.clone(),
            database.quizzes.clone(),
        );
        (service, database)
    }

    #[tokio::test]
    async fn list_counts_questions_per_category() {
        let (service, _) = seeded();
        let summaries = service.list_categories().await.unwrap();

        let counts: Vec<(&str, usize)> = summaries
            .iter()
            .map(|s| (s.category.name.as_str(), s.question_count))
            .collect();
        assert_eq!(
            counts,
            vec![("Maintenance", 1), ("Traffic Law", 2), ("Vehicle Safety", 3)]
        );
    }

    #[tokio::test]
    async fn duplicate_names_conflict_regardless_of_case() {
        let (service, _) = seeded();
        let err = service.create_category(request("traffic law")).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn categories_with_questions_cannot_be_deleted() {
        let (service, _) = seeded();
        let summaries = service.list_categories().await.unwrap();
        let maintenance = &summaries[0].category;

        let err = service.delete_category(&maintenance.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let empty = service.create_category(request("Weather")).await.unwrap();
        service.delete_category(&empty.id).await.unwrap();
    }

    #[tokio::test]
    async fn rename_moves_questions_and_quizzes() {
        let (service, database) = seeded();
        let summaries = service.list_categories().await.unwrap();
        let law = summaries[1].category.clone();

        service.update_category(&law.id, request("Road Rules")).await.unwrap();

        let questions = database.questions.list().await.unwrap();
        assert_eq!(questions.iter().filter(|q| q.category == "Road Rules").count(), 2);
        assert!(questions.iter().all(|q| q.category != "Traffic Law"));
        let quizzes = database.quizzes.list().await.unwrap();
        assert!(quizzes.iter().any(|q| q.category == "Road Rules"));
    }

    #[tokio::test]
    async fn bad_color_is_a_field_error() {
        let (service, _) = seeded();
        let mut bad = request("Weather");
        bad.color = "blue".into();
        let err = service.create_category(bad).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(ref f) if f.get("color").is_some()));
    }

    #[tokio::test]
    async fn failed_rename_cascade_restores_the_old_name() {
        let (database, data) = fixtures::seeded();
        let seeded_quizzes = data.quizzes.clone();
        let mut quizzes = MockRepository::<Quiz>::new();
        quizzes
            .expect_list()
            .returning(move || Ok(seeded_quizzes.clone()));
        quizzes
            .expect_update()
            .returning(|_| Err(AppError::InternalError("quiz store offline".into())));
        let service = CategoryService::new(
            database.categories.clone(),
            database.questions.clone(),
            Arc::new(quizzes),
        );
        let traffic = &data.categories[1];

        let err = service
            .update_category(&traffic.id, request("Road Rules"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));

        let category = service.get_category(&traffic.id).await.unwrap();
        assert_eq!(category.name, "Traffic Law");
        let questions = database.questions.list().await.unwrap();
        assert!(questions.iter().all(|q| q.category != "Road Rules"));
        assert_eq!(
            questions.iter().filter(|q| q.category == "Traffic Law").count(),
            2
        );
    }
}
