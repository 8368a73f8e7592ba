use std::sync::{Arc, Mutex};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::Config,
    db::Database,
    services::{
        AnalyticsService, CategoryService, QuestionService, QuizService, ResultService,
        SearchService, SettingsService, UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub question_service: Arc<QuestionService>,
    pub quiz_service: Arc<QuizService>,
    pub category_service: Arc<CategoryService>,
    pub user_service: Arc<UserService>,
    pub result_service: Arc<ResultService>,
    pub settings_service: Arc<SettingsService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub search_service: Arc<SearchService>,
    pub db: Database,
    pub config: Arc<Config>,
    /// Shuffles ordering items and matching pools. Seeded from
    /// `SHUFFLE_SEED` when set so attempts are reproducible.
    pub shuffle_rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let db = Database::in_memory(&config);
        Self::from_database(db, config)
    }

    pub fn from_database(db: Database, config: Config) -> Self {
        let rng = match config.shuffle_seed {
            Some(seed) => {
                log::info!("Shuffling with fixed seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self {
            question_service: Arc::new(
                QuestionService::new(
                    db.questions.clone(),
                    db.quizzes.clone(),
                    db.categories.clone(),
                )
                .with_reference_lock(db.references.clone()),
            ),
            quiz_service: Arc::new(
                QuizService::new(
                    db.quizzes.clone(),
                    db.questions.clone(),
                    db.results.clone(),
                    db.settings.clone(),
                )
                .with_reference_lock(db.references.clone()),
            ),
            category_service: Arc::new(
                CategoryService::new(
                    db.categories.clone(),
                    db.questions.clone(),
                    db.quizzes.clone(),
                )
                .with_reference_lock(db.references.clone()),
            ),
            user_service: Arc::new(UserService::new(db.users.clone())),
            result_service: Arc::new(ResultService::new(
                db.results.clone(),
                db.quizzes.clone(),
                db.questions.clone(),
                db.users.clone(),
                db.settings.clone(),
            )),
            settings_service: Arc::new(SettingsService::new(db.settings.clone())),
            analytics_service: Arc::new(AnalyticsService::new(
                db.questions.clone(),
                db.quizzes.clone(),
                db.categories.clone(),
                db.users.clone(),
                db.results.clone(),
            )),
            search_service: Arc::new(SearchService::new(
                db.questions.clone(),
                db.quizzes.clone(),
                db.users.clone(),
                db.settings.clone(),
            )),
            db,
            config: Arc::new(config),
            shuffle_rng: Arc::new(Mutex::new(rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        db::seed,
        models::dto::request::QuizRequest,
        repositories::{Latency, Repository},
        test_utils::fixtures,
    };

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn state_shares_one_database() {
        let state = AppState::from_database(Database::empty(), Config::test_config());
        state
            .db
            .categories
            .create(crate::models::domain::Category::new("Shared", "", "#000000"))
            .await
            .unwrap();

        let summaries = state.category_service.list_categories().await.unwrap();
        assert_eq!(summaries.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_question_races_cleanly_with_a_quiz_that_uses_it() {
        for _ in 0..10 {
            let latency = Latency::between(Duration::from_millis(1), Duration::from_millis(4));
            let state = AppState::from_database(
                Database::from_seed(seed::demo_data(), latency),
                Config::test_config(),
            );
            let question = state
                .db
                .questions
                .create(fixtures::fill_blank("Minimum tread depth?", "Maintenance"))
                .await
                .unwrap();
            let request = QuizRequest {
                title: "Tires".to_string(),
                description: String::new(),
                category: "Maintenance".to_string(),
                question_ids: vec![question.id.clone()],
                time_limit: None,
                passing_score: None,
                difficulty: None,
                is_active: None,
            };

            let (deleted, created) = tokio::join!(
                state.question_service.delete_question(&question.id),
                state.quiz_service.create_quiz(request),
            );
            assert_ne!(deleted.is_ok(), created.is_ok());

            let questions = state.db.questions.list().await.unwrap();
            for quiz in state.db.quizzes.list().await.unwrap() {
                for id in &quiz.question_ids {
                    assert!(questions.iter().any(|q| &q.id == id), "{} lost {}", quiz.title, id);
                }
            }
        }
    }
}
