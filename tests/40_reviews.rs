mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_and_fetch_single_review() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .post_json(
            "/api/v1/reviews",
            &json!({
                "recipeId": "recipe-1",
                "reviewer": { "email": "a@b.com", "name": "A" },
                "reviewTime": "2024-05-01T12:00:00Z",
                "rating": 5,
                "comment": "Great",
            }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    let review = &body["data"]["recipeReview"];
    let id = review["_id"].as_str().expect("assigned id");

    let res = server.get(&format!("/api/v1/review/{id}")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = res.json::<Value>().await?;
    assert_eq!(&fetched["data"]["review"], review);

    assert_eq!(server.get("/api/v1/review/12345").await?.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn reviews_for_recipe_are_newest_first() -> Result<()> {
    let server = common::spawn_server().await?;
    for (recipe, time) in [
        ("recipe-1", "2024-01-10T00:00:00Z"),
        ("recipe-2", "2024-02-10T00:00:00Z"),
        ("recipe-1", "2024-03-10T00:00:00Z"),
        ("recipe-1", "2023-12-10T00:00:00Z"),
    ] {
        server
            .create("/api/v1/reviews", "recipeReview", json!({ "recipeId": recipe, "reviewTime": time }))
            .await?;
    }

    let res = server.get("/api/v1/reviews/recipe-1").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let times: Vec<&str> = body["data"]["recipeReviews"]
        .as_array()
        .expect("reviews array")
        .iter()
        .map(|r| r["reviewTime"].as_str().unwrap())
        .collect();
    assert_eq!(
        times,
        vec!["2024-03-10T00:00:00Z", "2024-01-10T00:00:00Z", "2023-12-10T00:00:00Z"]
    );

    let body = server.get("/api/v1/reviews/nothing-here").await?.json::<Value>().await?;
    assert_eq!(body["data"]["recipeReviews"], json!([]));
    Ok(())
}

#[tokio::test]
async fn patch_sets_only_given_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let review = server
        .create(
            "/api/v1/reviews",
            "recipeReview",
            json!({ "recipeId": "recipe-1", "rating": 2, "comment": "meh" }),
        )
        .await?;
    let id = review["_id"].as_str().unwrap();

    let res = server
        .client
        .patch(server.url(&format!("/api/v1/reviews/{id}")))
        .json(&json!({ "rating": 4 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["data"]["result"],
        json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 })
    );

    let fetched = server.get(&format!("/api/v1/review/{id}")).await?.json::<Value>().await?;
    assert_eq!(
        fetched["data"]["review"],
        json!({ "_id": id, "recipeId": "recipe-1", "rating": 4, "comment": "meh" })
    );
    Ok(())
}

#[tokio::test]
async fn patch_rejects_identifier_changes() -> Result<()> {
    let server = common::spawn_server().await?;
    let review = server.create("/api/v1/reviews", "recipeReview", json!({ "rating": 1 })).await?;
    let id = review["_id"].as_str().unwrap();

    let res = server
        .client
        .patch(server.url(&format!("/api/v1/reviews/{id}")))
        .json(&json!({ "_id": "something-else" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn patch_of_missing_review_matches_nothing() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .patch(server.url("/api/v1/reviews/0190b0e4-7f3a-7cc2-8b1e-3f4a5b6c7d8e"))
        .json(&json!({ "rating": 4 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["result"]["matchedCount"], 0);
    Ok(())
}

#[tokio::test]
async fn delete_reports_count_even_when_absent() -> Result<()> {
    let server = common::spawn_server().await?;
    let review = server.create("/api/v1/reviews", "recipeReview", json!({ "rating": 3 })).await?;
    let path = format!("/api/v1/reviews/{}", review["_id"].as_str().unwrap());

    let first = server.client.delete(server.url(&path)).send().await?;
    assert_eq!(first.status(), StatusCode::OK);
    let body = first.json::<Value>().await?;
    assert_eq!(body["data"]["result"], json!({ "acknowledged": true, "deletedCount": 1 }));

    let second = server.client.delete(server.url(&path)).send().await?;
    assert_eq!(second.status(), StatusCode::OK);
    let body = second.json::<Value>().await?;
    assert_eq!(body["data"]["result"]["deletedCount"], 0);

    let bad = server.client.delete(server.url("/api/v1/reviews/nope")).send().await?;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
