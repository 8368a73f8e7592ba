use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;

use quizdash_server::{
    errors::{AppError, AppResult},
    models::domain::{
        AnswerKey, Category, Difficulty, Question, Quiz, QuizResult, Role, Settings, User,
    },
    pipeline::ListView,
    repositories::{
        InMemoryRepository, InMemorySettingsRepository, Latency, Record, Repository,
        SettingsRepository,
    },
    services::QuestionService,
};

/// Runs the behaviour every repository must share against a fresh store.
/// `first` and `second` must not clash with each other.
async fn check_contract<T, F>(repo: &dyn Repository<T>, first: T, second: T, edit: F)
where
    T: Record + std::fmt::Debug,
    F: Fn(&mut T),
{
    let created = repo.create(first.clone()).await.expect("create first");
    assert_eq!(created.id(), first.id());
    repo.create(second.clone()).await.expect("create second");

    let duplicate = repo.create(first.clone()).await;
    assert!(matches!(duplicate, Err(AppError::AlreadyExists(_))));

    let found = repo.get(first.id()).await.expect("get should work");
    assert!(found.is_some());
    assert!(repo.get("missing").await.expect("get should work").is_none());

    let ids: Vec<String> = repo
        .list()
        .await
        .expect("list should work")
        .iter()
        .map(|r| r.id().to_string())
        .collect();
    assert_eq!(ids, vec![first.id().to_string(), second.id().to_string()]);

    let mut changed = first.clone();
    edit(&mut changed);
    repo.update(changed).await.expect("update should work");

    let missing = repo.delete("missing").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    repo.delete(second.id()).await.expect("delete should work");
    assert!(repo.get(second.id()).await.expect("get should work").is_none());
    let missing_update = repo.update(second).await;
    assert!(matches!(missing_update, Err(AppError::NotFound(_))));
}

fn question(text: &str) -> Question {
    Question::new(
        text,
        AnswerKey::SingleChoice {
            options: vec!["yes".into(), "no".into()],
            correct_option: 0,
        },
        "General",
        Difficulty::Easy,
    )
}

#[tokio::test]
async fn question_repository_contract() {
    let repo = InMemoryRepository::<Question>::new(Latency::none());
    check_contract(&repo, question("One"), question("Two"), |q| {
        q.text = "Changed".into()
    })
    .await;
    assert_eq!(repo.list().await.unwrap()[0].text, "Changed");
}

#[tokio::test]
async fn quiz_repository_contract() {
    let repo = InMemoryRepository::<Quiz>::new(Latency::none());
    check_contract(
        &repo,
        Quiz::new("One", "General", vec![]),
        Quiz::new("Two", "General", vec![]),
        |q| q.is_active = false,
    )
    .await;
}

#[tokio::test]
async fn category_repository_contract_and_unique_names() {
    let repo = InMemoryRepository::<Category>::new(Latency::none());
    check_contract(
        &repo,
        Category::new("Safety", "", "#ff0000"),
        Category::new("Law", "", "#00ff00"),
        |c| c.description = "Changed".into(),
    )
    .await;

    let clash = repo.create(Category::new("SAFETY", "", "#0000ff")).await;
    assert!(matches!(clash, Err(AppError::AlreadyExists(_))));
}

#[tokio::test]
async fn user_repository_contract_and_unique_emails() {
    let repo = InMemoryRepository::<User>::new(Latency::none());
    check_contract(
        &repo,
        User::new("Ada", "Lovelace", "ada@example.com", Role::Admin),
        User::new("Alan", "Turing", "alan@example.com", Role::Teacher),
        |u| u.is_active = false,
    )
    .await;

    let mut taken = User::new("Other", "Ada", "ADA@example.com", Role::Student);
    let clash = repo.create(taken.clone()).await;
    assert!(matches!(clash, Err(AppError::AlreadyExists(_))));

    taken.email = "other@example.com".into();
    repo.create(taken).await.expect("distinct email is fine");
}

#[tokio::test]
async fn result_repository_contract() {
    let repo = InMemoryRepository::<QuizResult>::new(Latency::none());
    check_contract(
        &repo,
        QuizResult::new("quiz-1", "user-1", Default::default()),
        QuizResult::new("quiz-1", "user-2", Default::default()),
        |r| r.score = Some(42.0),
    )
    .await;
}

#[tokio::test]
async fn settings_repository_round_trips_the_document() {
    let repo = InMemorySettingsRepository::new(Settings::default(), Latency::none());
    let mut settings = repo.get().await.unwrap();
    settings.general.site_name = "Driving School".into();

    repo.update(settings.clone()).await.unwrap();
    assert_eq!(repo.get().await.unwrap(), settings);
}

/// A question store that can be switched offline.
struct FlakyQuestions {
    inner: InMemoryRepository<Question>,
    offline: AtomicBool,
}

impl FlakyQuestions {
    fn check(&self) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::InternalError("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository<Question> for FlakyQuestions {
    async fn get(&self, id: &str) -> AppResult<Option<Question>> {
        self.check()?;
        self.inner.get(id).await
    }

    async fn list(&self) -> AppResult<Vec<Question>> {
        self.check()?;
        self.inner.list().await
    }

    async fn create(&self, record: Question) -> AppResult<Question> {
        self.check()?;
        self.inner.create(record).await
    }

    async fn update(&self, record: Question) -> AppResult<Question> {
        self.check()?;
        self.inner.update(record).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.check()?;
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn list_view_reports_failure_and_recovers_on_retry() {
    let questions = Arc::new(FlakyQuestions {
        inner: InMemoryRepository::with_records(
            vec![question("Brake check"), question("Tire check")],
            Latency::none(),
        ),
        offline: AtomicBool::new(true),
    });
    let service = QuestionService::new(
        questions.clone(),
        Arc::new(InMemoryRepository::new(Latency::none())),
        Arc::new(InMemoryRepository::new(Latency::none())),
    );

    let mut view: ListView<Question> = ListView::new("questions", 10);
    view.load(service.list_questions()).await;
    assert_eq!(view.error(), Some("Failed to load questions"));
    assert!(view.records().is_empty());

    questions.offline.store(false, Ordering::SeqCst);
    view.load(service.list_questions()).await;
    assert_eq!(view.error(), None);
    assert_eq!(view.current_page().items.len(), 2);
}
