//! End-to-end API tests over the in-process router.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use stratos_node::{create_router, AppState};

fn test_server() -> TestServer {
    TestServer::new(create_router(AppState::new())).unwrap()
}

fn component_bodies() -> Vec<Value> {
    vec![
        json!({
            "type": "business_information",
            "company_name": "Harbor & Thread",
            "industry": "Sustainable apparel",
            "description": "Direct-to-consumer knitwear made from recycled fibers",
            "products_services": "Sweaters, accessories, repair service",
            "website": "https://harborandthread.example"
        }),
        json!({
            "type": "marketing_goal",
            "primary_objective": "Grow online revenue 40%",
            "timeframe": "12 months",
            "success_metrics": ["online revenue", "repeat purchase rate"]
        }),
        json!({
            "type": "target_audience",
            "description": "Eco-conscious professionals aged 28-45",
            "locations": ["US", "Canada"],
            "pain_points": ["fast fashion guilt", "poor garment longevity"]
        }),
        json!({
            "type": "marketing_resources",
            "team_size": 2,
            "monthly_budget": 6000.0,
            "existing_channels": ["instagram", "email"]
        }),
        json!({
            "type": "competitors",
            "competitors": [
                { "name": "Everlane", "strengths": "brand recognition" }
            ],
            "differentiation": "Repair-first lifetime guarantee"
        }),
        json!({
            "type": "strategy_adjustments",
            "tone": "warm and direct",
            "avoid": ["greenwashing claims"]
        }),
    ]
}

async fn create_brief(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/briefs")
        .json(&json!({ "user_id": uuid::Uuid::new_v4() }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn submit_all_components(server: &TestServer, brief_id: &str) -> Value {
    let mut last = Value::Null;
    for body in component_bodies() {
        let response = server
            .put(&format!("/api/v1/briefs/{}/components", brief_id))
            .json(&body)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        last = response.json::<Value>();
    }
    last
}

async fn generate_strategy(server: &TestServer, brief_id: &str) -> Value {
    let response = server
        .post(&format!("/api/v1/briefs/{}/strategy", brief_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_health_check() {
    let server = test_server();
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], json!("healthy"));
}

#[tokio::test]
async fn test_full_strategy_lifecycle() {
    let server = test_server();
    let brief_id = create_brief(&server).await;

    let brief = submit_all_components(&server, &brief_id).await;
    assert_eq!(brief["complete"], json!(true));
    assert_eq!(brief["missing"].as_array().unwrap().len(), 0);
    assert_eq!(brief["submitted"].as_array().unwrap().len(), 6);

    let response = server
        .get(&format!("/api/v1/briefs/{}/context", brief_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>()["business"]["company_name"],
        json!("Harbor & Thread")
    );

    let strategy = generate_strategy(&server, &brief_id).await;
    assert_eq!(strategy["status"], json!("pending"));
    assert_eq!(strategy["brief_id"].as_str().unwrap(), brief_id);
    let blocks = strategy["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert!(strategy.get("raw_text").is_none());
    let strategy_id = strategy["id"].as_str().unwrap().to_string();
    let section_id = blocks[0]["sections"][0]["id"].as_str().unwrap().to_string();

    // The strategy resource carries the archived raw output
    let response = server
        .get(&format!("/api/v1/strategies/{}", strategy_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let full = response.json::<Value>();
    assert!(full["raw_text"]
        .as_str()
        .unwrap()
        .contains("[[BLOCK:Positioning]]"));
    assert_eq!(full["raw_digest"].as_str().unwrap().len(), 64);

    let response = server
        .post(&format!("/api/v1/strategies/{}/open", strategy_id))
        .await;
    assert_eq!(response.json::<Value>()["status"], json!("opened"));

    let response = server
        .patch(&format!(
            "/api/v1/strategies/{}/sections/{}",
            strategy_id, section_id
        ))
        .json(&json!({ "content": "Lead with the repair guarantee in every campaign." }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let edited = response.json::<Value>();
    assert_eq!(edited["status"], json!("edited"));
    assert_eq!(
        edited["blocks"][0]["sections"][0]["content"],
        json!("Lead with the repair guarantee in every campaign.")
    );

    let response = server
        .post(&format!("/api/v1/strategies/{}/approve", strategy_id))
        .await;
    assert_eq!(response.json::<Value>()["status"], json!("completed"));

    let response = server
        .post(&format!("/api/v1/strategies/{}/deliver", strategy_id))
        .json(&json!({ "recipient": "founder@harborandthread.example" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let receipt = response.json::<Value>();
    assert_eq!(receipt["strategy_id"], strategy["id"]);
    assert_eq!(receipt["transport"], json!("logging"));

    // A brief with a strategy attached refuses deletion
    let response = server.delete(&format!("/api/v1/briefs/{}", brief_id)).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_generate_requires_complete_brief() {
    let server = test_server();
    let brief_id = create_brief(&server).await;

    let business = component_bodies().into_iter().next().unwrap();
    let response = server
        .put(&format!("/api/v1/briefs/{}/components", brief_id))
        .json(&business)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .post(&format!("/api/v1/briefs/{}/strategy", brief_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let message = response.text();
    assert!(message.contains("marketing_goal"));
    assert!(!message.contains("business_information"));

    let response = server
        .get(&format!("/api/v1/briefs/{}/context", brief_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_generation_conflicts_after_approval() {
    let server = test_server();
    let brief_id = create_brief(&server).await;
    submit_all_components(&server, &brief_id).await;

    let strategy = generate_strategy(&server, &brief_id).await;
    let strategy_id = strategy["id"].as_str().unwrap();
    server
        .post(&format!("/api/v1/strategies/{}/open", strategy_id))
        .await;
    server
        .post(&format!("/api/v1/strategies/{}/approve", strategy_id))
        .await;

    let response = server
        .post(&format!("/api/v1/briefs/{}/strategy", brief_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = server
        .post(&format!("/api/v1/briefs/{}/strategy", brief_id))
        .json(&json!({ "regenerate": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let replacement = response.json::<Value>();
    assert_ne!(replacement["id"], strategy["id"]);
    assert_eq!(replacement["status"], json!("pending"));
}

#[tokio::test]
async fn test_edit_requires_open() {
    let server = test_server();
    let brief_id = create_brief(&server).await;
    submit_all_components(&server, &brief_id).await;

    let strategy = generate_strategy(&server, &brief_id).await;
    let strategy_id = strategy["id"].as_str().unwrap();
    let section_id = strategy["blocks"][0]["sections"][0]["id"].as_str().unwrap();

    let response = server
        .patch(&format!(
            "/api/v1/strategies/{}/sections/{}",
            strategy_id, section_id
        ))
        .json(&json!({ "content": "Edited before anyone looked." }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = server
        .post(&format!("/api/v1/strategies/{}/approve", strategy_id))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reorder_blocks() {
    let server = test_server();
    let brief_id = create_brief(&server).await;
    submit_all_components(&server, &brief_id).await;

    let strategy = generate_strategy(&server, &brief_id).await;
    let strategy_id = strategy["id"].as_str().unwrap().to_string();
    server
        .post(&format!("/api/v1/strategies/{}/open", strategy_id))
        .await;

    let mut ids: Vec<String> = strategy["blocks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    ids.reverse();

    let response = server
        .put(&format!("/api/v1/strategies/{}/blocks/order", strategy_id))
        .json(&json!({ "order": ids }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let reordered = response.json::<Value>();
    assert_eq!(reordered["status"], json!("edited"));
    let blocks = reordered["blocks"].as_array().unwrap();
    assert_eq!(blocks[0]["title"], json!("Measurement"));
    let orders: Vec<u64> = blocks.iter().map(|b| b["order"].as_u64().unwrap()).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    // Dropping an id is not a permutation
    let partial: Vec<Value> = blocks[..2].iter().map(|b| b["id"].clone()).collect();
    let response = server
        .put(&format!("/api/v1/strategies/{}/blocks/order", strategy_id))
        .json(&json!({ "order": partial }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_component_validation_rejected() {
    let server = test_server();
    let brief_id = create_brief(&server).await;

    let response = server
        .put(&format!("/api/v1/briefs/{}/components", brief_id))
        .json(&json!({
            "type": "business_information",
            "company_name": "",
            "industry": "Retail",
            "description": "Something",
            "products_services": "Things"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_resources_return_404() {
    let server = test_server();
    let missing = uuid::Uuid::new_v4();

    let response = server.get(&format!("/api/v1/briefs/{}", missing)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get(&format!("/api/v1/strategies/{}", missing)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .post(&format!("/api/v1/briefs/{}/strategy", missing))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unused_brief() {
    let server = test_server();
    let brief_id = create_brief(&server).await;

    let response = server.delete(&format!("/api/v1/briefs/{}", brief_id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/api/v1/briefs/{}", brief_id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
