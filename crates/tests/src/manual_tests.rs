use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

fn transcript_fixture() -> Value {
    json!({
        "monologues": [{
            "speaker": 1,
            "elements": [
                { "type": "text", "value": "the", "ts": 0.1, "confidence": 0.96 },
                { "type": "text", "value": "product", "ts": 0.4, "confidence": 0.93 },
                { "type": "text", "value": "works", "ts": 0.8, "confidence": 0.95 },
                { "type": "text", "value": "well", "ts": 1.1, "confidence": 0.94 },
                { "type": "punct", "value": "." }
            ]
        }]
    })
}

#[tokio::test]
async fn transcribe_requires_media_url() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json("/manual/transcribe", &json!({ "email": "user@example.com" }))
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "media_url is required");
}

#[tokio::test]
async fn transcribe_requires_email() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/manual/transcribe",
            &json!({ "media_url": "https://example.com/clip.mp3" }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "email is required");
}

#[tokio::test]
async fn transcribe_rejects_unsupported_format() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/manual/transcribe",
            &json!({
                "media_url": "https://example.com/document.pdf",
                "email": "user@example.com"
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("Unsupported file format: pdf")
    );
}

#[tokio::test]
async fn transcribe_submits_and_returns_job_id() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/manual/transcribe",
            &json!({
                "media_url": "https://example.com/clip.mp3",
                "email": "user@example.com"
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["job_id"], "job_1");
    assert_eq!(body["message"], "Transcription job submitted successfully");
}

#[tokio::test]
async fn transcribe_with_wait_runs_the_full_pipeline() {
    let app = TestApp::spawn().await;
    app.sheets.seed_email("user@example.com").await;
    app.provider
        .complete_submissions_with(transcript_fixture())
        .await;

    let resp = app
        .post_json(
            "/manual/transcribe",
            &json!({
                "media_url": app.provider.media_url("answer.mp3"),
                "email": "user@example.com",
                "question": "Manual request",
                "wait_for_completion": true,
                "max_wait_time": 30
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["job_id"], "job_1");
    assert_eq!(body["stored"], true);
    assert_eq!(body["transcript"], "The product works well.");
    assert!(body["quality_metrics"]["overall_confidence"].as_f64().unwrap() > 0.9);
    assert!(body["quality_metrics"]["linguistic_quality_score"].as_f64().is_some());
    assert_eq!(
        body["quality_metrics"]["content_analysis"]["metrics"]["word_count"],
        4
    );

    let writes = app.sheets.writes().await;
    assert_eq!(writes.len(), 2);
    assert!(writes[1].1.starts_with("The product works well."));
}

#[tokio::test]
async fn status_of_completed_job_returns_enhanced_transcript() {
    let app = TestApp::spawn().await;
    app.provider
        .set_job(
            "job_s1",
            json!({
                "id": "job_s1",
                "status": "completed",
                "media_url": app.provider.media_url("clip.mp3")
            }),
        )
        .await;
    app.provider
        .set_transcript("job_s1", transcript_fixture())
        .await;

    let resp = app.get("/manual/status/job_s1").await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["transcript"], "The product works well.");
    assert!(body["quality_metrics"]["overall_confidence"].as_f64().is_some());
    // Status lookups are read-only.
    assert!(app.sheets.writes().await.is_empty());
}

#[tokio::test]
async fn status_of_running_job_reports_progress() {
    let app = TestApp::spawn().await;
    app.provider
        .set_job("job_s2", json!({ "id": "job_s2", "status": "in_progress" }))
        .await;

    let resp = app.get("/manual/status/job_s2").await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["job_id"], "job_s2");
}

#[tokio::test]
async fn batch_reports_partial_failure() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/manual/batch",
            &json!({
                "requests": [
                    { "media_url": "https://example.com/one.mp3", "email": "a@example.com" },
                    { "email": "b@example.com" }
                ]
            }),
        )
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["failed"], 1);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["job_id"], "job_1");
    assert_eq!(results[0]["status"], "in_progress");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[1]["error"], "media_url is required");
}

#[tokio::test]
async fn batch_requires_requests_array() {
    let app = TestApp::spawn().await;

    let resp = app.post_json("/manual/batch", &json!({})).await;
    assert_eq!(resp.status().as_u16(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "requests array is required");
}
