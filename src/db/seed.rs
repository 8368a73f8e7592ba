use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::{
    models::domain::{
        Answer, AnswerKey, Category, Difficulty, MatchPair, Question, Quiz, QuizResult, Role,
        Settings, User,
    },
    services::grading::grade_result,
};

#[derive(Clone, Debug, Default)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
    pub quizzes: Vec<Quiz>,
    pub users: Vec<User>,
    pub results: Vec<QuizResult>,
    pub settings: Settings,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn question(
    text: &str,
    key: AnswerKey,
    category: &str,
    difficulty: Difficulty,
    days_ago: i64,
) -> Question {
    let mut q = Question::new(text, key, category, difficulty);
    q.created_at = Utc::now() - Duration::days(days_ago);
    q.updated_at = q.created_at;
    q
}

fn user(first: &str, last: &str, role: Role, days_ago: i64) -> User {
    let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
    let mut u = User::new(first, last, &email, role);
    u.join_date = Utc::now() - Duration::days(days_ago);
    u
}

/// A small, consistent data set for local development.
pub fn demo_data() -> SeedData {
    let categories = vec![
        Category::new("Vehicle Safety", "Brakes, tires and safety checks", "#e74c3c"),
        Category::new("Traffic Law", "Rules of the road", "#3498db"),
        Category::new("Maintenance", "Routine vehicle care", "#2ecc71"),
    ];

    let questions = vec![
        question(
            "Brake fluid check: how often should it be inspected?",
            AnswerKey::SingleChoice {
                options: strings(&["Every oil change", "Once a decade", "Never"]),
                correct_option: 0,
            },
            "Vehicle Safety",
            Difficulty::Easy,
            30,
        ),
        question(
            "Tire pressure should be checked when tires are...",
            AnswerKey::FillBlank {
                correct_answer: "cold".to_string(),
            },
            "Maintenance",
            Difficulty::Easy,
            25,
        ),
        question(
            "Emergency braking: put the steps in order",
            AnswerKey::Ordering {
                correct_order: strings(&[
                    "Check mirrors",
                    "Press brake firmly",
                    "Steer to safety",
                    "Turn on hazard lights",
                ]),
            },
            "Vehicle Safety",
            Difficulty::Medium,
            20,
        ),
        question(
            "Match each signal to its meaning",
            AnswerKey::Matching {
                pairs: vec![
                    MatchPair::new("Red light", "Stop"),
                    MatchPair::new("Yellow light", "Prepare to stop"),
                    MatchPair::new("Green light", "Go"),
                ],
            },
            "Traffic Law",
            Difficulty::Easy,
            15,
        ),
        question(
            "Which of these require a full stop?",
            AnswerKey::MultiChoice {
                options: strings(&["Stop sign", "Yield sign", "School bus with flashing lights"]),
                correct_options: vec![0, 2],
            },
            "Traffic Law",
            Difficulty::Medium,
            10,
        ),
        question(
            "Explain why following distance matters in wet weather.",
            AnswerKey::LongAnswer {
                sample_answer: Some("Stopping distances grow on wet roads.".to_string()),
            },
            "Vehicle Safety",
            Difficulty::Hard,
            5,
        ),
    ];
    let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();

    let mut safety = Quiz::new("Safety Basics", "Vehicle Safety", ids[..3].to_vec());
    safety.description = "Brakes, tires and emergency stops".to_string();
    safety.difficulty = Difficulty::Easy;
    let mut road = Quiz::new("Rules of the Road", "Traffic Law", vec![
        ids[3].clone(),
        ids[4].clone(),
        ids[5].clone(),
    ]);
    road.description = "Signals, signs and judgement".to_string();
    road.passing_score = 60;

    let mut teacher = user("Grace", "Hopper", Role::Teacher, 400);
    teacher.department = Some("Driver Education".to_string());
    let mut jane = user("Jane", "Smith", Role::Student, 90);
    jane.student_number = Some("S-1001".to_string());
    let mut omar = user("Omar", "Haddad", Role::Student, 60);
    omar.student_number = Some("S-1002".to_string());
    let users = vec![user("Ada", "Lovelace", Role::Admin, 500), teacher, jane, omar];

    let mut jane_safety = BTreeMap::new();
    jane_safety.insert(0, Answer::Choice(0));
    jane_safety.insert(1, Answer::Text("Cold".to_string()));
    jane_safety.insert(
        2,
        Answer::Order(strings(&[
            "Check mirrors",
            "Press brake firmly",
            "Steer to safety",
            "Turn on hazard lights",
        ])),
    );
    let mut omar_safety = BTreeMap::new();
    omar_safety.insert(0, Answer::Choice(1));
    omar_safety.insert(1, Answer::Text("warm".to_string()));
    let mut jane_road = BTreeMap::new();
    jane_road.insert(1, Answer::Choices(vec![0, 2]));
    jane_road.insert(2, Answer::Text("Wet roads need more room to stop.".to_string()));

    let safety_questions = &questions[..3];
    let road_questions = &questions[3..];
    let mut results = vec![
        QuizResult::new(&safety.id, &users[2].id, jane_safety),
        QuizResult::new(&safety.id, &users[3].id, omar_safety),
        QuizResult::new(&road.id, &users[2].id, jane_road),
    ];
    for (offset, result) in results.iter_mut().enumerate() {
        result.completed_at = Utc::now() - Duration::days(3 - offset as i64);
        result.started_at = result.completed_at - Duration::minutes(20);
    }
    grade_result(&mut results[0], safety_questions, Some(safety.passing_score));
    grade_result(&mut results[1], safety_questions, Some(safety.passing_score));
    grade_result(&mut results[2], road_questions, Some(road.passing_score));

    SeedData {
        categories,
        questions,
        quizzes: vec![safety, road],
        users,
        results,
        settings: Settings::default(),
    }
}
