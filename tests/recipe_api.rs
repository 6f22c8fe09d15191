use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use recipes::{
    api::{create_router, AppState},
    database::memory_repository::InMemoryRecipeRepository,
    dto::recipe_dto::RecipeDto,
    sample_data,
    service::{
        error::{RECIPE_ID_SHOULD_BE_EMPTY, RECIPE_NOT_FOUND, RECIPE_SAME_TITLE},
        recipe_service::RecipeService,
    },
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let service = RecipeService::new(Arc::new(InMemoryRecipeRepository::new()));
    create_router(AppState::new(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn seed(app: &Router) {
    for recipe in sample_data::create() {
        let (status, _) = send(
            app,
            Method::POST,
            "/v1/recipe",
            Some(serde_json::to_value(&recipe).unwrap()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

async fn find(app: &Router, query: &str) -> Vec<RecipeDto> {
    let (status, body) = send(app, Method::GET, &format!("/v1/recipe/find{query}"), None).await;
    assert_eq!(status, StatusCode::OK, "{query}: {body}");
    serde_json::from_value(body).unwrap()
}

fn red_curry() -> Value {
    json!({
        "title": "Red Curry",
        "instructions": "Mix all the vegetables, cook for 30 minutes and it's ready",
        "serves": 2,
        "vegetarian": true,
        "ingredients": ["Carrot", "Chickpea", "Cumin", "Rice", "Potato", "Basil"]
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_recipe() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/v1/recipe", Some(red_curry())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["recipeId"].is_i64());
    assert_eq!(body["title"], "Red Curry");
    assert_eq!(body["serves"], 2);
    assert_eq!(body["vegetarian"], true);
    assert_eq!(body["ingredients"], red_curry()["ingredients"]);
}

#[tokio::test]
async fn test_create_duplicate_title() {
    let app = app();
    send(&app, Method::POST, "/v1/recipe", Some(red_curry())).await;

    let (status, body) = send(&app, Method::POST, "/v1/recipe", Some(red_curry())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!([{ "field": "title", "message": RECIPE_SAME_TITLE }]));
    assert_eq!(find(&app, "").await.len(), 1);
}

#[tokio::test]
async fn test_create_with_id() {
    let app = app();
    let mut recipe = red_curry();
    recipe["recipeId"] = json!(12);

    let (status, body) = send(&app, Method::POST, "/v1/recipe", Some(recipe)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!([{ "field": "recipeId", "message": RECIPE_ID_SHOULD_BE_EMPTY }])
    );
}

#[tokio::test]
async fn test_create_missing_fields() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/recipe",
        Some(json!({ "title": "Toast", "serves": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|error| error["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["instructions", "serves", "vegetarian", "ingredients"]);
    assert!(find(&app, "").await.is_empty());
}

#[tokio::test]
async fn test_malformed_body() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/recipe")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body[0]["field"], "body");
}

#[tokio::test]
async fn test_update_recipe() {
    let app = app();
    let (_, saved) = send(&app, Method::POST, "/v1/recipe", Some(red_curry())).await;

    let mut recipe = saved.clone();
    recipe["title"] = json!("This is a new title");
    recipe["ingredients"] = json!(["Rice", "Tofu"]);
    let (status, body) = send(&app, Method::PUT, "/v1/recipe", Some(recipe)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipeId"], saved["recipeId"]);
    assert_eq!(body["title"], "This is a new title");

    let all = find(&app, "").await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].ingredients, vec!["Rice".to_owned(), "Tofu".to_owned()]);
}

#[tokio::test]
async fn test_put_without_id_creates() {
    let app = app();

    let (status, body) = send(&app, Method::PUT, "/v1/recipe", Some(red_curry())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["recipeId"].is_i64());
}

#[tokio::test]
async fn test_update_unknown_recipe() {
    let app = app();
    let mut recipe = red_curry();
    recipe["recipeId"] = json!(9999);

    let (status, body) = send(&app, Method::PUT, "/v1/recipe", Some(recipe)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!([{ "field": "recipeId", "message": RECIPE_NOT_FOUND }]));
    assert!(find(&app, "").await.is_empty());
}

#[tokio::test]
async fn test_delete_recipe() {
    let app = app();
    seed(&app).await;
    let taco = find(&app, "?text=taco").await.remove(0);
    let id = taco.recipe_id.unwrap();

    let (status, body) = send(&app, Method::DELETE, &format!("/v1/recipe/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
    assert!(find(&app, "?text=taco").await.is_empty());
    assert_eq!(find(&app, "").await.len(), 4);
}

#[tokio::test]
async fn test_delete_unknown_recipe() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(&app, Method::DELETE, "/v1/recipe/9999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!([{ "field": "recipeId", "message": RECIPE_NOT_FOUND }]));
    assert_eq!(find(&app, "").await.len(), 5);
}

#[tokio::test]
async fn test_delete_with_invalid_id() {
    let app = app();

    let (status, body) = send(&app, Method::DELETE, "/v1/recipe/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body[0]["field"], "recipeId");
}

#[tokio::test]
async fn test_find_by_text() {
    let app = app();
    seed(&app).await;

    let tacos = find(&app, "?text=taco").await;
    assert_eq!(tacos.len(), 1);
    assert!(tacos[0].title.to_lowercase().contains("taco"));

    let vegetables = find(&app, "?text=vegetables").await;
    assert_eq!(vegetables.len(), 2);
    assert!(vegetables
        .iter()
        .all(|recipe| recipe.instructions.contains("vegetables")));
}

#[tokio::test]
async fn test_find_filters() {
    let app = app();
    seed(&app).await;

    let cases = [
        ("", 5),
        ("?text=&include=&exclude=&servings=&vegetarian=", 5),
        ("?servings=2", 2),
        ("?vegetarian=true", 4),
        ("?include=carrot", 2),
        ("?include=basil", 3),
        ("?exclude=basil", 2),
        ("?exclude=carrot", 3),
        ("?include=basil&exclude=carrot", 1),
        ("?include=potato&exclude=rice", 1),
        ("?include=rice%20noodle&exclude=basil", 0),
        ("?vegetarian=false&servings=3", 1),
    ];

    for (query, expected) in cases {
        assert_eq!(find(&app, query).await.len(), expected, "{query}");
    }
}

#[tokio::test]
async fn test_find_invalid_servings() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/v1/recipe/find?servings=two", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body[0]["field"], "servings");
}
