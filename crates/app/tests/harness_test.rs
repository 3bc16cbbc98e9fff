//! End-to-end harness tests against a local fixture service.
//!
//! The fixture serves JSONPlaceholder-shaped data (100 posts, 10 users,
//! 5 comments per post, created posts get id 101) so the shipped suite
//! semantics can be verified without touching the public internet.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};

use apicheck_application::ScenarioRunner;
use apicheck_domain::{
    Expectation, HarnessConfig, HttpMethod, JsonKind, Scenario, ScenarioStep, SuiteSummary,
};
use apicheck_infrastructure::{ReqwestHttpClient, SuiteFile};

fn post_fixture(id: u64) -> Value {
    json!({
        "userId": (id - 1) / 10 + 1,
        "id": id,
        "title": format!("post title {id}"),
        "body": format!("post body {id}"),
    })
}

async fn list_posts() -> Json<Value> {
    Json(Value::Array((1..=100).map(post_fixture).collect()))
}

async fn get_post(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    if (1..=100).contains(&id) {
        Ok(Json(post_fixture(id)))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn create_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut created = body;
    if let Some(map) = created.as_object_mut() {
        map.insert("id".to_string(), json!(101));
    }
    (StatusCode::CREATED, Json(created))
}

async fn post_comments(Path(id): Path<u64>) -> Json<Value> {
    let comments: Vec<Value> = (1..=5)
        .map(|n| {
            json!({
                "postId": id,
                "id": (id - 1) * 5 + n,
                "name": format!("comment {n}"),
                "email": format!("commenter{n}@example.com"),
                "body": "some comment text",
            })
        })
        .collect();
    Json(Value::Array(comments))
}

async fn update_post(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
    let mut updated = body;
    if let Some(map) = updated.as_object_mut() {
        map.insert("id".to_string(), json!(id));
    }
    Json(updated)
}

async fn delete_post(Path(_id): Path<u64>) -> Json<Value> {
    Json(json!({}))
}

async fn list_comments() -> Json<Value> {
    let comments: Vec<Value> = (1..=500u64)
        .map(|n| {
            json!({
                "postId": (n - 1) / 5 + 1,
                "id": n,
                "name": format!("comment {n}"),
                "email": format!("commenter{n}@example.com"),
                "body": "some comment text",
            })
        })
        .collect();
    Json(Value::Array(comments))
}

fn user_fixture(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "username": format!("user{id}"),
        "email": format!("user{id}@example.com"),
        "address": {"city": "Gwenborough"},
        "phone": "1-770-736-8031",
        "website": "example.org",
        "company": {"name": "Example Inc"},
    })
}

async fn list_users() -> Json<Value> {
    Json(Value::Array((1..=10).map(user_fixture).collect()))
}

async fn get_user(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    if (1..=10).contains(&id) {
        Ok(Json(user_fixture(id)))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn spawn_fixture() -> SocketAddr {
    let app = axum::Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/comments", get(post_comments))
        .route("/comments", get(list_comments))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn run_scenarios(addr: SocketAddr, scenarios: &[Scenario]) -> SuiteSummary {
    let config = HarnessConfig::new(format!("http://{addr}"));
    let client = ReqwestHttpClient::new(&config).unwrap();
    let runner = ScenarioRunner::new(Arc::new(client), &config);
    runner.run(scenarios).await.unwrap()
}

#[tokio::test]
async fn list_posts_contract_holds() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("GET /posts").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts")
            .expecting(Expectation::StatusEquals { expected: 200 })
            .expecting(Expectation::HeaderContains {
                name: "content-type".to_string(),
                substring: "application/json".to_string(),
            })
            .expecting(Expectation::ArrayLength { count: 100 })
            .expecting(Expectation::HasProperty {
                path: "[0].userId".to_string(),
            })
            .expecting(Expectation::PropertyType {
                path: "[0].userId".to_string(),
                kind: JsonKind::Number,
            })
            .expecting(Expectation::PropertyType {
                path: "[0].id".to_string(),
                kind: JsonKind::Number,
            })
            .expecting(Expectation::PropertyType {
                path: "[0].title".to_string(),
                kind: JsonKind::String,
            })
            .expecting(Expectation::PropertyType {
                path: "[0].body".to_string(),
                kind: JsonKind::String,
            })
            .expecting(Expectation::LatencyBelow { max_ms: 5000 }),
    );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(summary.all_passed(), "{summary:#?}");
    assert_eq!(summary.total_expectations(), 9);
}

#[tokio::test]
async fn single_post_and_missing_post() {
    let addr = spawn_fixture().await;

    let found = Scenario::new("GET /posts/1").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts/{id}")
            .with_param("id", "1")
            .expecting(Expectation::StatusEquals { expected: 200 })
            .expecting(Expectation::PropertyEquals {
                path: "id".to_string(),
                expected: json!(1),
            })
            .expecting(Expectation::PropertyEquals {
                path: "userId".to_string(),
                expected: json!(1),
            }),
    );
    let missing = Scenario::new("GET /posts/999").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts/999")
            .expecting(Expectation::StatusEquals { expected: 404 }),
    );

    let summary = run_scenarios(addr, &[found, missing]).await;
    assert!(summary.all_passed(), "{summary:#?}");
}

#[tokio::test]
async fn created_post_gets_service_assigned_id() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("POST /posts").with_step(
        ScenarioStep::new(HttpMethod::Post, "/posts")
            .with_body(json!({"title": "fresh", "body": "content", "userId": 1}))
            .expecting(Expectation::StatusEquals { expected: 201 })
            .expecting(Expectation::PropertyEquals {
                path: "id".to_string(),
                expected: json!(101),
            })
            .expecting(Expectation::PropertyEquals {
                path: "title".to_string(),
                expected: json!("fresh"),
            }),
    );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(summary.all_passed(), "{summary:#?}");
}

#[tokio::test]
async fn comments_all_belong_to_post() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("GET /posts/1/comments").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts/{id}/comments")
            .with_param("id", "1")
            .expecting(Expectation::StatusEquals { expected: 200 })
            .expecting(Expectation::ArrayLength { count: 5 })
            .expecting(Expectation::ArrayAllMatch {
                each: Box::new(Expectation::PropertyEquals {
                    path: "postId".to_string(),
                    expected: json!(1),
                }),
            }),
    );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(summary.all_passed(), "{summary:#?}");
}

#[tokio::test]
async fn every_post_author_is_a_known_user() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("posts reference known users")
        .with_step(
            ScenarioStep::new(HttpMethod::Get, "/users")
                .capturing("user_ids", "[*].id")
                .expecting(Expectation::StatusEquals { expected: 200 }),
        )
        .with_step(
            ScenarioStep::new(HttpMethod::Get, "/posts")
                .expecting(Expectation::StatusEquals { expected: 200 })
                .expecting(Expectation::ArrayAllMatch {
                    each: Box::new(Expectation::PropertyInCaptured {
                        path: "userId".to_string(),
                        capture: "user_ids".to_string(),
                    }),
                }),
        );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(summary.all_passed(), "{summary:#?}");
}

#[tokio::test]
async fn user_emails_are_addresses() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("GET /users/1").with_step(
        ScenarioStep::new(HttpMethod::Get, "/users/{id}")
            .with_param("id", "1")
            .expecting(Expectation::StatusEquals { expected: 200 })
            .expecting(Expectation::PropertyContains {
                path: "email".to_string(),
                substring: "@".to_string(),
            }),
    );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(summary.all_passed(), "{summary:#?}");
}

#[tokio::test]
async fn failing_expectations_are_reported_not_raised() {
    let addr = spawn_fixture().await;

    let scenario = Scenario::new("wrong expectations").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts")
            .expecting(Expectation::StatusEquals { expected: 201 })
            .expecting(Expectation::ArrayLength { count: 99 })
            .expecting(Expectation::HasProperty {
                path: "[0].missing".to_string(),
            }),
    );

    let summary = run_scenarios(addr, &[scenario]).await;
    assert!(!summary.all_passed());
    assert_eq!(summary.failed_expectations(), 3);
    assert_eq!(summary.passed_expectations(), 0);

    let outcomes = &summary.scenarios[0].outcomes;
    assert_eq!(outcomes[0].detail, "expected status 201, got 200");
    assert_eq!(outcomes[1].detail, "array has length 100, expected 99");
    assert!(outcomes[2].detail.contains("'missing'"));
}

#[tokio::test]
async fn connection_refused_fails_scenario_without_killing_suite() {
    let addr = spawn_fixture().await;

    // Bind then drop a listener so the port is closed.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let healthy = Scenario::new("healthy").with_step(
        ScenarioStep::new(HttpMethod::Get, "/posts")
            .expecting(Expectation::StatusEquals { expected: 200 }),
    );

    let config = HarnessConfig::new(format!("http://{closed_addr}"));
    let client = ReqwestHttpClient::new(&config).unwrap();
    let runner = ScenarioRunner::new(Arc::new(client), &config);
    let dead_summary = runner
        .run(&[Scenario::new("down").with_step(
            ScenarioStep::new(HttpMethod::Get, "/posts")
                .expecting(Expectation::StatusEquals { expected: 200 }),
        )])
        .await
        .unwrap();
    assert!(!dead_summary.all_passed());
    assert!(
        dead_summary.scenarios[0].outcomes[0]
            .detail
            .contains("connection failed"),
        "{:?}",
        dead_summary.scenarios[0].outcomes[0].detail
    );

    // The healthy fixture is unaffected.
    let summary = run_scenarios(addr, &[healthy]).await;
    assert!(summary.all_passed());
}

#[tokio::test]
async fn shipped_suite_file_runs_against_fixture() {
    let addr = spawn_fixture().await;

    let mut suite = SuiteFile::load(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../suites/jsonplaceholder.yaml"
    ))
    .unwrap();
    suite.base_url = format!("http://{addr}");
    assert_eq!(suite.scenarios.len(), 13);

    let config = suite.config();
    let client = ReqwestHttpClient::new(&config).unwrap();
    let runner = ScenarioRunner::new(Arc::new(client), &config);
    let summary = runner.run(&suite.scenarios).await.unwrap();

    assert!(summary.all_passed(), "{summary:#?}");
}
