mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn list_requires_authentication() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::client()
        .get(format!("{}/api/tags", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn create_and_list_limited_to_owner() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = common::register_and_login(&server, "test@gmail.com", "test123").await?;
    let other = common::register_and_login(&server, "testusertwo@gmail.com", "testpass").await?;

    common::post_as(&server, &other, "/api/tags", json!({ "name": "Fruity" })).await?;

    let (status, body) = common::post_as(&server, &token, "/api/tags", json!({ "name": "Vegan" })).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Vegan");

    let (status, body) = common::get_as(&server, &token, "/api/tags").await?;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().expect("array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Vegan");
    Ok(())
}

#[tokio::test]
async fn list_orders_by_name_descending() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = common::register_and_login(&server, "test@gmail.com", "test123").await?;

    for name in ["Dessert", "Vegan", "Breakfast"] {
        let (status, _) = common::post_as(&server, &token, "/api/tags", json!({ "name": name })).await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = common::get_as(&server, &token, "/api/tags").await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Vegan", "Dessert", "Breakfast"]);
    Ok(())
}

#[tokio::test]
async fn create_blank_tag_fails() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = common::register_and_login(&server, "test@gmail.com", "test123").await?;

    let (status, body) = common::post_as(&server, &token, "/api/tags", json!({ "name": "" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}
