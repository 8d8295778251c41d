//! HTTP-level integration tests for the tag endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_tag, create_translation, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_tag_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = post_json(app, "/api/v1/tags", json!({"name": "mobile"})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "mobile");
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_tag_name_returns_conflict(pool: PgPool) {
    create_tag(&pool, "mobile").await;
    let app = common::build_test_app(pool).await;
    let response = post_json(app, "/api/v1/tags", json!({"name": "mobile"})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["errors"]["name"][0], "The tag name has already been taken.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_blank_tag_name_returns_422(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = post_json(app, "/api/v1/tags", json!({"name": "  "})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_tags_sorted_by_name(pool: PgPool) {
    create_tag(&pool, "web").await;
    create_tag(&pool, "desktop").await;

    let app = common::build_test_app(pool).await;
    let json = body_json(get(app, "/api/v1/tags").await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["desktop", "web"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_rename_and_delete_tag(pool: PgPool) {
    let id = create_tag(&pool, "web").await;
    let uri = format!("/api/v1/tags/{id}");

    let response = get(common::build_test_app(pool.clone()).await, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json(
        common::build_test_app(pool.clone()).await,
        &uri,
        json!({"name": "website"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "website");

    let response = delete(common::build_test_app(pool.clone()).await, &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool).await, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_deleting_tag_removes_it_from_translations(pool: PgPool) {
    let web = create_tag(&pool, "web").await;
    let created = create_translation(&pool, "k", "en", "v", &[web]).await;
    let id = created["id"].as_i64().unwrap();

    delete(common::build_test_app(pool.clone()).await, &format!("/api/v1/tags/{web}")).await;

    let json = body_json(
        get(
            common::build_test_app(pool).await,
            &format!("/api/v1/translations/{id}"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["tags"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_nonexistent_tag_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = delete(app, "/api/v1/tags/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
