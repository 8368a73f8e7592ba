use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Question, Quiz, User},
        dto::{
            request::SearchParams,
            response::{SearchHit, SearchKind},
        },
    },
    pipeline::{self, is_wildcard, Facet, FilterConfig, ListQuery, Page, SortKey, SortSpec},
    repositories::{Repository, SettingsRepository},
    services::load_all,
};

/// One search box over questions, quizzes and users.
pub struct SearchService {
    questions: Arc<dyn Repository<Question>>,
    quizzes: Arc<dyn Repository<Quiz>>,
    users: Arc<dyn Repository<User>>,
    settings: Arc<dyn SettingsRepository>,
}

impl SearchService {
    pub fn new(
        questions: Arc<dyn Repository<Question>>,
        quizzes: Arc<dyn Repository<Quiz>>,
        users: Arc<dyn Repository<User>>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            questions,
            quizzes,
            users,
            settings,
        }
    }

    /// Hits sorted by title. An empty query matches everything.
    pub async fn search(&self, params: SearchParams) -> AppResult<Page<SearchHit>> {
        params.validate()?;
        let mut filters = FilterConfig::new().search(&params.q);
        if let Some(kind) = params.kind.as_deref().filter(|k| !is_wildcard(k)) {
            if ![SearchKind::Question, SearchKind::Quiz, SearchKind::User]
                .iter()
                .any(|known| known.as_str() == kind)
            {
                return Err(AppError::ValidationError(format!(
                    "Unknown search kind '{kind}'"
                )));
            }
            filters.set_facet(Facet::Type, kind);
        }

        let hits = self.hits().await?;
        let page_size = match params.page_size {
            Some(size) => size,
            None => self.settings.get().await?.general.default_page_size,
        };
        let query = ListQuery::new(
            filters,
            SortSpec::asc(SortKey::Name),
            params.page.unwrap_or(1),
            page_size,
        );
        log::debug!("Search '{}' over {} candidate(s)", params.q, hits.len());
        Ok(pipeline::run(&hits, &query))
    }

    async fn hits(&self) -> AppResult<Vec<SearchHit>> {
        let questions = load_all(self.questions.as_ref(), "search results").await?;
        let quizzes = load_all(self.quizzes.as_ref(), "search results").await?;
        let users = load_all(self.users.as_ref(), "search results").await?;

        let questions = questions.iter().map(|q| {
            SearchHit::new(
                SearchKind::Question,
                q,
                q.id.clone(),
                q.text.clone(),
                format!("{} · {}", q.category, q.question_type()),
            )
        });
        let quizzes = quizzes.iter().map(|q| {
            SearchHit::new(
                SearchKind::Quiz,
                q,
                q.id.clone(),
                q.title.clone(),
                format!("{} · {} question(s)", q.category, q.question_ids.len()),
            )
        });
        let users = users.iter().map(|u| {
            SearchHit::new(
                SearchKind::User,
                u,
                u.id.clone(),
                u.full_name(),
                u.email.clone(),
            )
        });
        Ok(questions.chain(quizzes).chain(users).collect())
    }
}
