use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use quizdash_server::{
    app_state::AppState,
    config::Config,
    db::{seed, Database, SeedData},
    handlers,
    middleware::{RequestIdMiddleware, REQUEST_ID_HEADER},
    repositories::Latency,
};

fn seeded_state() -> (AppState, SeedData) {
    let data = seed::demo_data();
    let database = Database::from_seed(data.clone(), Latency::none());
    (
        AppState::from_database(database, Config::test_config()),
        data,
    )
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

fn texts(page: &Value, field: &str) -> Vec<String> {
    page["items"]
        .as_array()
        .expect("page should have items")
        .iter()
        .map(|item| item[field].as_str().unwrap_or_default().to_string())
        .collect()
}

#[actix_web::test]
async fn health_check_carries_request_id() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ready");
}

#[actix_web::test]
async fn question_search_matches_text_case_insensitively() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/questions?search=BRAK&sort=name&order=asc")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(page["total_items"], 2);
    let found = texts(&page, "text");
    assert!(found[0].starts_with("Brake fluid check"));
    assert!(found[1].starts_with("Emergency braking"));
}

#[actix_web::test]
async fn stale_page_is_clamped_to_the_last_page() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/questions?page=5&page_size=4")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(page["page"], 2);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn facets_filter_each_list() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/questions?type=ordering&category=all")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total_items"], 1);

    let req = test::TestRequest::get().uri("/api/users?role=student").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total_items"], 2);

    let req = test::TestRequest::get()
        .uri("/api/results?status=needs_grading")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["quiz_title"], "Rules of the Road");
}

#[actix_web::test]
async fn bad_list_parameters_are_rejected() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/questions?page_size=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get()
        .uri("/api/questions?sort=popularity")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_records_are_not_found() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/questions/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn question_create_validates_fields() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/questions")
        .set_json(json!({
            "text": "Which option?",
            "type": "single-choice",
            "options": ["a", "b"],
            "correct_option": 5,
            "category": "Astronomy",
            "difficulty": "easy"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["category"].is_string());
    assert!(body["fields"]["correct_option"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/questions")
        .set_json(json!({
            "text": "Which option?",
            "type": "single-choice",
            "options": ["a", "b"],
            "correct_option": 1,
            "category": "maintenance",
            "difficulty": "easy"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn referenced_question_delete_conflicts() {
    let (state, data) = seeded_state();
    let app = app!(state);

    let uri = format!("/api/questions/{}", data.questions[0].id);
    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Safety Basics"));
}

#[actix_web::test]
async fn attempt_sheet_hides_answer_keys() {
    let (state, data) = seeded_state();
    let app = app!(state);

    let uri = format!("/api/quizzes/{}/attempts", data.quizzes[0].id);
    let req = test::TestRequest::post().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(!text.contains("correct_order"));
    assert!(!text.contains("correct_option"));

    let sheet: Value = serde_json::from_str(text).unwrap();
    let ordering = sheet["questions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|q| q["type"] == "ordering")
        .expect("safety quiz has an ordering question");
    assert_eq!(ordering["items"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn submit_then_grade_a_long_answer() {
    let (state, data) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/results")
        .set_json(json!({
            "quiz_id": data.quizzes[0].id,
            "student_id": data.users[3].id,
            "answers": { "0": { "kind": "choice", "value": 0 } }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let result: Value = test::read_body_json(resp).await;
    assert_eq!(result["score"], 33.3);
    assert_eq!(result["status"], "failed");

    let uri = format!("/api/results/{}/grades", data.results[2].id);
    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "question_index": 2, "points": 80.0, "feedback": "Clear" }))
        .to_request();
    let graded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(graded["score"], 60.0);
    assert_eq!(graded["status"], "passed");
    assert_eq!(graded["feedback"]["2"], "Clear");
}

#[actix_web::test]
async fn settings_drive_default_page_size() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::put()
        .uri("/api/settings")
        .set_json(json!({ "general": { "theme": "dark" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/settings")
        .set_json(json!({ "general": { "default_page_size": 4 } }))
        .to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["general"]["site_name"], "Quiz Dashboard");

    let req = test::TestRequest::get().uri("/api/questions").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["page_size"], 4);
    assert_eq!(page["total_pages"], 2);
}

#[actix_web::test]
async fn analytics_and_search() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/analytics").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["total_questions"], 6);
    assert_eq!(stats["pending_grading"], 1);
    assert_eq!(stats["pass_rate"], 50.0);

    let req = test::TestRequest::get().uri("/api/search?q=hopper").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total_items"], 1);
    assert_eq!(page["items"][0]["kind"], "user");
}

#[actix_web::test]
async fn category_lifecycle() {
    let (state, _) = seeded_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({ "name": "Weather", "color": "#336699" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({ "name": "weather", "color": "#336699" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list.as_array().unwrap().len(), 4);

    let uri = format!("/api/categories/{}", created["id"].as_str().unwrap());
    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
