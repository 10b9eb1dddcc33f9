mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

#[tokio::test]
async fn test_postgres_duplicate_email_rejected() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    app.register("Ada", "ada@example.com").await;

    let response = app
        .post("/api/users")
        .json(&json!({ "name": "Other", "email": "ADA@example.com", "password": "secret1" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "errors": [{ "msg": "User already exists" }] }));
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_postgres_concurrent_registration_creates_one_account() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };

    let attempts = (0..8).map(|_| {
        app.post("/api/users")
            .json(&json!({ "name": "Race", "email": "race@example.com", "password": "secret1" }))
            .send()
    });
    let statuses: Vec<StatusCode> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|response| response.expect("Failed to execute request").status())
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::OK || *s == StatusCode::BAD_REQUEST));
    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_postgres_concurrent_likes_count_once() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    let ada = app.register("Ada", "ada@example.com").await;
    let post_id = app.create_post(&ada, "hello").await;
    let path = format!("/api/posts/like/{}", post_id);

    let attempts = (0..8).map(|_| app.put_authenticated(&path, &ada.token).send());
    let statuses: Vec<StatusCode> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|response| response.expect("Failed to execute request").status())
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);

    let post: Value = app
        .get_authenticated(&format!("/api/posts/{}", post_id), &ada.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(post["likes"], json!([{ "user": ada.id }]));
}

#[tokio::test]
async fn test_postgres_like_on_unknown_post_is_not_found() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    let ada = app.register("Ada", "ada@example.com").await;

    let response = app
        .put_authenticated(
            &format!("/api/posts/like/{}", uuid::Uuid::new_v4()),
            &ada.token,
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_authenticated(
            &format!("/api/posts/comment/{}", uuid::Uuid::new_v4()),
            &ada.token,
        )
        .json(&json!({ "text": "anyone?" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_postgres_posts_and_comments_newest_first() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    let ada = app.register("Ada", "ada@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;
    app.create_post(&ada, "older").await;
    let post_id = app.create_post(&ada, "newer").await;

    for (author, text) in [(&ada, "first"), (&bob, "second")] {
        let response = app
            .post_authenticated(&format!("/api/posts/comment/{}", post_id), &author.token)
            .json(&json!({ "text": text }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let posts: Value = app
        .get_authenticated("/api/posts", &ada.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let texts: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["newer", "older"]);

    let comments: Vec<&str> = posts[0]["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(comments, ["second", "first"]);
}

#[tokio::test]
async fn test_postgres_profile_entries_added_and_removed() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    let ada = app.register("Ada", "ada@example.com").await;

    let no_profile = app
        .put_authenticated("/api/profile/experience", &ada.token)
        .json(&json!({ "title": "Engineer", "company": "Acme", "from": "2020-01-01" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(no_profile.status(), StatusCode::NOT_FOUND);

    let saved = app
        .post_authenticated("/api/profile", &ada.token)
        .json(&json!({ "status": "Developer", "skills": "rust, sql" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(saved.status(), StatusCode::OK);

    for title in ["Engineer", "Lead"] {
        let response = app
            .put_authenticated("/api/profile/experience", &ada.token)
            .json(&json!({ "title": title, "company": "Acme", "from": "2020-01-01" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let added: Value = app
        .put_authenticated("/api/profile/education", &ada.token)
        .json(&json!({
            "school": "MIT",
            "degree": "BSc",
            "fieldofstudy": "CS",
            "from": "2010-09-01",
            "to": "2014-06-01"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added["skills"], json!(["rust", "sql"]));
    assert_eq!(added["education"][0]["to"], "2014-06-01");

    let titles: Vec<&str> = added["experience"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Lead", "Engineer"]);

    let lead_id = added["experience"][0]["id"].as_str().unwrap().to_string();
    let education_id = added["education"][0]["id"].as_str().unwrap().to_string();

    let removed: Value = app
        .delete_authenticated(&format!("/api/profile/experience/{}", lead_id), &ada.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["experience"].as_array().unwrap().len(), 1);
    assert_eq!(removed["experience"][0]["title"], "Engineer");

    let removed: Value = app
        .delete_authenticated(
            &format!("/api/profile/education/{}", education_id),
            &ada.token,
        )
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(removed["education"], json!([]));

    let unknown = app
        .delete_authenticated(&format!("/api/profile/education/{}", education_id), &ada.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_postgres_account_deletion_cascades_to_profile() {
    let Some(app) = TestApp::spawn_postgres().await else {
        return;
    };
    let ada = app.register("Ada", "ada@example.com").await;
    let post_id = app.create_post(&ada, "still here").await;

    app.post_authenticated("/api/profile", &ada.token)
        .json(&json!({ "status": "Developer", "skills": "rust" }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .delete_authenticated(&format!("/api/users/{}", ada.id), &ada.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.user_count().await, 0);

    let all: Value = app.get("/api/profile").send().await.unwrap().json().await.unwrap();
    assert_eq!(all, json!([]));

    // The deleted account's token can no longer own a profile.
    let orphan = app
        .post_authenticated("/api/profile", &ada.token)
        .json(&json!({ "status": "Developer", "skills": "rust" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);

    let bob = app.register("Bob", "bob@example.com").await;
    let post = app
        .get_authenticated(&format!("/api/posts/{}", post_id), &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(post.status(), StatusCode::OK);
}
