use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use filmswipe_api::{
    db::{InMemoryStore, MovieStore},
    models::{movie::NewMovie, AttributeDomain, DbId},
    routes::{create_router, AppState},
    services::{recommendations::SeededRandom, Recommender},
};

fn create_test_server(store: &InMemoryStore) -> TestServer {
    let store: Arc<dyn MovieStore> = Arc::new(store.clone());
    let recommender = Recommender::with_random(store.clone(), Arc::new(SeededRandom::new(11)));
    let app = create_router(Arc::new(AppState::with_recommender(store, recommender)));
    TestServer::new(app).unwrap()
}

async fn seed_movie(store: &InMemoryStore, title: &str, genres: &[&str]) -> DbId {
    let id = store
        .insert_movie(NewMovie::new(title).with_genre(genres.join(", ")))
        .await;
    for genre in genres {
        let genre_id = store.insert_attribute(AttributeDomain::Genre, genre).await;
        store
            .link_attribute(AttributeDomain::Genre, id, genre_id)
            .await;
    }
    id
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert_eq!(header.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_create_user_then_again() {
    let server = create_test_server(&InMemoryStore::new());

    let response = server
        .post("/api/users")
        .json(&json!({ "uid": "firebase-1", "email": "ann@example.com", "name": "Ann" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "User created");

    let response = server
        .post("/api/users")
        .json(&json!({ "uid": "firebase-1", "email": "ann@example.com" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_create_user_requires_email() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .post("/api/users")
        .json(&json!({ "uid": "firebase-1" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing user information");
}

#[tokio::test]
async fn test_recommendation_requires_uid() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.get("/api/movies").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Missing uid parameter");
}

#[tokio::test]
async fn test_recommendation_for_unknown_user() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .get("/api/movies")
        .add_query_param("uid", "ghost")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_new_user_gets_a_catalog_movie() {
    let store = InMemoryStore::new();
    store.insert_user("firebase-1").await;
    let mut catalog = Vec::new();
    for title in ["M1", "M2", "M3"] {
        catalog.push(seed_movie(&store, title, &["Drama"]).await);
    }
    let server = create_test_server(&store);

    let response = server
        .get("/api/movies")
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let id = body["id"].as_i64().unwrap();
    assert!(catalog.contains(&id));
    assert!(body["title"].is_string());
    assert!(body.get("poster_url").is_some());
}

#[tokio::test]
async fn test_swipes_steer_recommendations() {
    let store = InMemoryStore::new();
    store.insert_user("firebase-1").await;
    let liked = seed_movie(&store, "Liked", &["Western"]).await;
    let match_ = seed_movie(&store, "Match", &["Western"]).await;
    seed_movie(&store, "Other", &["Musical"]).await;
    let server = create_test_server(&store);

    let response = server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "movieId": liked, "action": "like" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Recorded like");

    let response = server
        .get("/api/movies")
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"].as_i64(), Some(match_));
}

#[tokio::test]
async fn test_empty_object_when_everything_seen() {
    let store = InMemoryStore::new();
    store.insert_user("firebase-1").await;
    let only = seed_movie(&store, "Only", &["Drama"]).await;
    let server = create_test_server(&store);

    server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "movieId": only, "action": "dislike" }))
        .await
        .assert_status_ok();

    let response = server
        .get("/api/movies")
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_invalid_swipe_action() {
    let store = InMemoryStore::new();
    store.insert_user("firebase-1").await;
    let server = create_test_server(&store);

    let response = server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "movieId": 1, "action": "superlike" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid action");
}

#[tokio::test]
async fn test_swipe_requires_all_fields() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "action": "like" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_watchlist_flow() {
    let store = InMemoryStore::new();
    store.insert_user("firebase-1").await;
    let movie = seed_movie(&store, "M6", &["Drama"]).await;
    let server = create_test_server(&store);

    let response = server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "movieId": movie, "action": "watchlist" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Added to watchlist");

    let response = server
        .put(&format!("/api/watchlist/{movie}"))
        .json(&json!({ "uid": "firebase-1", "watched": true }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Set watched=true");

    let response = server
        .put(&format!("/api/watchlist/{movie}"))
        .add_query_param("uid", "firebase-1")
        .json(&json!({ "watched": false }))
        .await;
    response.assert_status_ok();

    let response = server
        .get("/api/watchlist")
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"].as_i64(), Some(movie));
    assert_eq!(items[0]["watched"], false);

    let response = server
        .delete(&format!("/api/watchlist/{movie}"))
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Removed from watchlist");

    let response = server
        .get("/api/watchlist")
        .add_query_param("uid", "firebase-1")
        .await;
    let items: Vec<Value> = response.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_watchlist_for_unknown_user() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .get("/api/watchlist")
        .add_query_param("uid", "ghost")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_watched_without_body_marks_unwatched() {
    let store = InMemoryStore::new();
    let user = store.insert_user("firebase-1").await;
    let movie = seed_movie(&store, "M6", &["Drama"]).await;
    store.insert_watchlist_if_absent(user, movie).await.unwrap();
    store.set_watched(user, movie, true).await.unwrap();
    let server = create_test_server(&store);

    let response = server
        .put(&format!("/api/watchlist/{movie}"))
        .add_query_param("uid", "firebase-1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Set watched=false");

    let items = store.watchlist(user).await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(!items[0].watched);
}

#[tokio::test]
async fn test_set_watched_accepts_numeric_flag() {
    let store = InMemoryStore::new();
    let user = store.insert_user("firebase-1").await;
    let movie = seed_movie(&store, "M6", &["Drama"]).await;
    store.insert_watchlist_if_absent(user, movie).await.unwrap();
    let server = create_test_server(&store);

    let response = server
        .put(&format!("/api/watchlist/{movie}"))
        .json(&json!({ "uid": "firebase-1", "watched": 1 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Set watched=true");
    assert!(store.watchlist(user).await.unwrap()[0].watched);
}

#[tokio::test]
async fn test_malformed_swipe_body_is_json_error() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server
        .post("/api/swipe")
        .json(&json!({ "uid": "firebase-1", "movieId": "abc", "action": "like" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_user_creation_without_json_is_json_error() {
    let server = create_test_server(&InMemoryStore::new());
    let response = server.post("/api/users").text("uid=firebase-1").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}
