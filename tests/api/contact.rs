use serde_json::json;
use wiremock::matchers::any;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::spawn_app;
use crate::helpers::TestApp;
use crate::helpers::ALLOWED_ORIGIN;
use crate::helpers::SERVER_TOKEN;

async fn provider_accepts(app: &TestApp) {
    Mock::given(path("/email"))
        .and(method("POST"))
        .and(header("X-Postmark-Server-Token", SERVER_TOKEN))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.email_server)
        .await;
}

fn alice() -> serde_json::Value {
    json!({
        "name": "Alice",
        "email": "alice@example.com",
        "message": "Hello",
    })
}

#[tokio::test]
async fn contact_ok() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let resp = app.post_contact(&alice()).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], "Email sent successfully");
}

#[tokio::test]
async fn contact_forwards_submission() {
    let app = spawn_app().await;
    provider_accepts(&app).await;

    app.post_contact(&alice()).await;

    let sent = app.sent_emails().await;
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email["To"], "owner@example.com");
    assert_eq!(email["ReplyTo"], "alice@example.com");
    assert_eq!(email["Subject"], "New message from Alice");
    let text = email["TextBody"].as_str().unwrap();
    assert!(text.contains("Hello"));
    assert!(text.contains("alice@example.com"));
}

#[tokio::test]
async fn contact_missing_fields() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for (body, msg) in [
        (json!({}), "empty"),
        (json!({"email": "alice@example.com", "message": "Hello"}), "no name"),
        (json!({"name": "Alice", "message": "Hello"}), "no email"),
        (json!({"name": "Alice", "email": "alice@example.com"}), "no message"),
        (json!({"name": "", "email": "alice@example.com", "message": "Hello"}), "empty name"),
        (json!({"name": "   ", "email": "alice@example.com", "message": "Hello"}), "blank name"),
        (json!({"name": "Alice", "email": "alice@example.com", "message": null}), "null message"),
        (json!({"name": "a".repeat(300), "message": "Hello"}), "long name, no email"),
        (json!({"name": "Alice\nBob", "email": "alice@example.com"}), "bad name, no message"),
    ] {
        let resp = app.post_contact(&body).await;
        assert_eq!(resp.status().as_u16(), 400, "{msg}");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["msg"], "Please enter all fields", "{msg}");
    }
}

#[tokio::test]
async fn contact_invalid_fields() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for (body, expected) in [
        (
            json!({"name": "a".repeat(257), "email": "alice@example.com", "message": "Hello"}),
            "Name is too long",
        ),
        (
            json!({"name": "Alice", "email": "a@b.com\r\nBcc: x@y.z", "message": "Hello"}),
            "Invalid email address",
        ),
        (
            json!({"name": "Alice\r\nBcc: x@y.z", "email": "alice@example.com", "message": "Hello"}),
            "Invalid name",
        ),
    ] {
        let resp = app.post_contact(&body).await;
        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["msg"], expected);
    }
}

#[tokio::test]
async fn contact_malformed_body() {
    let app = spawn_app().await;
    for body in ["not json", r#"{"name": 42}"#] {
        let resp = app.post_contact_raw(body).await;
        assert_eq!(resp.status().as_u16(), 400, "{body}");
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["msg"], "Invalid request body");
    }
}

#[tokio::test]
async fn contact_provider_failure() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .expect(1) // no retry
        .mount(&app.email_server)
        .await;

    let resp = app.post_contact(&alice()).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["msg"], "Server error");
}

#[tokio::test]
async fn contact_twice_sends_twice() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    assert_eq!(app.post_contact(&alice()).await.status().as_u16(), 200);
    let bob = json!({"name": "Bob", "email": "bob@example.com", "message": "Hi again"});
    assert_eq!(app.post_contact(&bob).await.status().as_u16(), 200);

    let sent = app.sent_emails().await;
    assert_eq!(sent[0]["Subject"], "New message from Alice");
    assert_eq!(sent[1]["Subject"], "New message from Bob");
}

#[tokio::test]
async fn cors_headers() {
    let app = spawn_app().await;
    provider_accepts(&app).await;

    let preflight = |origin: &'static str| {
        app.client
            .request(reqwest::Method::OPTIONS, format!("{}/api/contact", app.addr))
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "content-type")
            .send()
    };

    let resp = preflight(ALLOWED_ORIGIN).await.unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);
    assert!(resp.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("POST"));

    let resp = preflight("https://elsewhere.example.net").await.unwrap();
    assert!(resp.headers().get("access-control-allow-origin").is_none());

    // error responses carry the header too, or the browser hides the message
    let resp = app
        .client
        .post(format!("{}/api/contact", app.addr))
        .header("Origin", ALLOWED_ORIGIN)
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    assert_eq!(resp.headers()["access-control-allow-origin"], ALLOWED_ORIGIN);
}
