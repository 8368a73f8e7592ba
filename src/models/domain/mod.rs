pub mod category;
pub mod question;
pub mod quiz;
pub mod quiz_result;
pub mod settings;
pub mod user;
pub use category::Category;
pub use question::{AnswerKey, Difficulty, MatchPair, Question, QuestionType};
pub use quiz::Quiz;
pub use quiz_result::{Answer, GradingStatus, QuizResult};
pub use settings::Settings;
pub use user::{Role, User};
