#[cfg(test)]
pub mod fixtures {
    use crate::{
        db::{seed, Database, SeedData},
        models::domain::{AnswerKey, Difficulty, Question},
        repositories::Latency,
    };

    /// The demo data set, without latency, plus the records it was built from.
    pub fn seeded() -> (Database, SeedData) {
        let data = seed::demo_data();
        (Database::from_seed(data.clone(), Latency::none()), data)
    }

    pub fn seeded_database() -> Database {
        seeded().0
    }

    /// A fill-in-the-blank question whose answer is always "x".
    pub fn fill_blank(text: &str, category: &str) -> Question {
        Question::new(
            text,
            AnswerKey::FillBlank {
                correct_answer: "x".into(),
            },
            category,
            Difficulty::Medium,
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[tokio::test]
    async fn seeded_database_matches_its_seed() {
        let (database, data) = seeded();
        let questions = database.questions.list().await.unwrap();
        assert_eq!(questions.len(), data.questions.len());
    }

    #[test]
    fn fill_blank_is_valid() {
        assert!(fill_blank("Q", "General").field_errors().is_empty());
    }
}
