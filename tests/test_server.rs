use recipe_import::server::router;
use recipe_import::RecipeImporter;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_app() -> SocketAddr {
    let importer = Arc::new(RecipeImporter::builder().build().unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(importer)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_post_imports_recipe() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/pie")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><head><script type="application/ld+json">
                {"@type": "Recipe", "name": "Apple Pie", "recipeIngredient": ["6 apples", "1 pie crust"]}
            </script></head><body></body></html>"#,
        )
        .create_async()
        .await;

    let addr = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/recipe-import"))
        .json(&json!({ "url": format!("{}/pie", upstream.url()) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "structured-data");
    assert_eq!(body["recipe"]["name"], "Apple Pie");
    assert_eq!(body["recipe"]["ingredients"], "6 apples\n1 pie crust");
    assert_eq!(body["recipe"]["cookTime"], "");
    assert_eq!(body["recipe"]["source"], "structured-data");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_unreachable_upstream_is_still_200() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/broken")
        .with_status(500)
        .create_async()
        .await;

    let addr = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/recipe-import"))
        .json(&json!({ "url": format!("{}/broken", upstream.url()) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["recipe"]["source"], "fallback");
    assert!(body["message"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let addr = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/recipe-import"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() {
    let addr = spawn_app().await;
    let response = reqwest::get(format!("http://{addr}/recipe-import"))
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_cors_preflight() {
    let addr = spawn_app().await;
    let response = reqwest::Client::new()
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{addr}/recipe-import"),
        )
        .header("Origin", "https://family.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
    assert!(response.text().await.unwrap().is_empty());
}
