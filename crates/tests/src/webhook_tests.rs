use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn webhook_submits_job_for_media_answer() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "contact": { "email": "test@example.com" },
        "answers": [{
            "media_url": "https://example.com/test-video.mp4",
            "poll_option_content": "Test Question"
        }]
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "processed");
    assert!(body["errors"].as_array().unwrap().is_empty());

    let submissions = app.provider.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0]["media_url"],
        "https://example.com/test-video.mp4"
    );
    assert_eq!(submissions[0]["metadata"]["email"], "test@example.com");
    assert_eq!(submissions[0]["metadata"]["question"], "Test Question");
    assert_eq!(
        submissions[0]["notification_config"]["url"],
        "https://voxform.test/webhook"
    );
}

#[tokio::test]
async fn webhook_resolves_question_for_answers_nested_under_contact() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "event_type": "form_response",
        "interaction_id": "int123",
        "contact": {
            "email": "test@example.com",
            "name": "Test User",
            "answers": [{
                "type": "audio",
                "media_url": "https://example.com/test-audio.mp3",
                "question_id": "q123",
                "answer_id": "a123",
                "share_id": "s123"
            }]
        },
        "form": {
            "questions": [{
                "question_id": "q123",
                "metadata": { "text": "What is your experience?" }
            }]
        }
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "processed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);

    let submissions = app.provider.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0]["metadata"]["question"],
        "What is your experience?"
    );
    assert_eq!(submissions[0]["metadata"]["answer_type"], "audio");
    assert_eq!(submissions[0]["metadata"]["interaction_id"], "int123");
    assert_eq!(submissions[0]["metadata"]["contact_name"], "Test User");
}

#[tokio::test]
async fn webhook_reports_provider_errors_per_answer() {
    let app = TestApp::spawn().await;
    app.provider
        .fail_submissions(401, json!({ "error": "Invalid API key" }))
        .await;

    let payload = json!({
        "contact": { "email": "test@example.com" },
        "answers": [{
            "media_url": "https://example.com/test-video.mp4",
            "poll_option_content": "Test Question"
        }]
    });

    // The upstream platform must still see 200, or it would retry-storm.
    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "processed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["media_url"], "https://example.com/test-video.mp4");
    assert!(errors[0]["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn webhook_without_credential_reports_per_item_error() {
    let app = TestApp::spawn_with(|settings| settings.provider.api_key.clear()).await;

    let payload = json!({
        "contact": { "email": "test@example.com" },
        "answers": [{
            "media_url": "https://example.com/test-audio.mp3",
            "poll_option_content": "What is your experience?"
        }]
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "processed");
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]["error"].as_str().unwrap().contains("credential"));
    assert!(app.provider.submissions().await.is_empty());
}

#[tokio::test]
async fn webhook_rejects_unsupported_answer_format() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "contact": { "email": "test@example.com" },
        "answers": [{ "media_url": "https://example.com/notes.pdf" }]
    });

    let resp = app.post_json("/webhook", &payload).await;
    let body: Value = resp.json().await.unwrap();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0]["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported file format: pdf")
    );
}

#[tokio::test]
async fn webhook_without_media_answers_is_a_no_op() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "contact": { "email": "test@example.com" },
        "answers": [{ "poll_option_content": "Text answer, no media" }]
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "processed");
    assert!(body["errors"].as_array().unwrap().is_empty());
    assert!(app.provider.submissions().await.is_empty());
}
