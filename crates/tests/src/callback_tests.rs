use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

fn embedded_transcript() -> Value {
    json!({
        "monologues": [{
            "speaker": 1,
            "elements": [
                { "type": "text", "value": "it", "ts": 0.1, "confidence": 0.98 },
                { "type": "text", "value": "was", "ts": 0.3, "confidence": 0.97 },
                { "type": "text", "value": "great", "ts": 0.5, "confidence": 0.95 },
                { "type": "punct", "value": "." }
            ]
        }]
    })
}

#[tokio::test]
async fn callback_with_embedded_transcript_stores_enhanced_text() {
    let app = TestApp::spawn().await;
    app.sheets.seed_email("ada@example.com").await;

    let media_url = app.provider.media_url("answer.mp3");
    let payload = json!({
        "job": {
            "id": "job_cb1",
            "status": "completed",
            "media_url": media_url,
            "metadata": { "email": "ada@example.com", "question": "What is your experience?" },
            "transcript": embedded_transcript()
        }
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["job_id"], "job_cb1");
    assert_eq!(body["status"], "completed");
    assert_eq!(body["stored"], true);

    let writes = app.sheets.writes().await;
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].0, "Responses!O1");
    assert_eq!(writes[0].1, media_url);
    assert_eq!(writes[1].0, "Responses!P1");
    // Stored text is the enhanced rendering with the quality footer.
    assert!(writes[1].1.starts_with("It was great."));
    assert!(writes[1].1.contains("Quality Notes:"));
    assert!(writes[1].1.contains("Confidence: 96.67%"));
}

#[tokio::test]
async fn callback_refetches_transcript_when_not_embedded() {
    let app = TestApp::spawn().await;
    app.sheets.seed_email("ada@example.com").await;
    app.provider
        .set_job(
            "job_cb2",
            json!({ "id": "job_cb2", "status": "completed" }),
        )
        .await;
    app.provider
        .set_transcript("job_cb2", embedded_transcript())
        .await;

    let payload = json!({
        "job": {
            "id": "job_cb2",
            "status": "completed",
            "media_url": app.provider.media_url("answer.mp3"),
            "metadata": { "email": "ada@example.com", "question": "What is your experience?" }
        }
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["stored"], true);

    let writes = app.sheets.writes().await;
    assert_eq!(writes.len(), 2);
    assert!(writes[1].1.starts_with("It was great."));
}

#[tokio::test]
async fn callback_appends_row_for_new_contact() {
    let app = TestApp::spawn().await;
    app.sheets.seed_email("existing@example.com").await;

    let payload = json!({
        "job": {
            "id": "job_cb3",
            "status": "completed",
            "media_url": app.provider.media_url("answer.mp3"),
            "metadata": { "email": "new@example.com", "question": "What is your experience?" },
            "transcript": embedded_transcript()
        }
    });

    app.post_json("/webhook", &payload).await;

    let writes = app.sheets.writes().await;
    // Unknown email lands on the row after the existing extent.
    assert_eq!(writes[0].0, "Responses!O2");
    assert_eq!(writes[1].0, "Responses!P2");
}

#[tokio::test]
async fn callback_failure_is_surfaced_not_stored() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "job": {
            "id": "job_cb4",
            "status": "failed",
            "failure_detail": "download failure",
            "metadata": { "email": "ada@example.com", "question": "What is your experience?" }
        }
    });

    let resp = app.post_json("/webhook", &payload).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["stored"], false);
    assert_eq!(body["error"], "download failure");
    assert!(app.sheets.writes().await.is_empty());
}

#[tokio::test]
async fn callback_without_job_id_answers_200_with_embedded_error() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json("/webhook", &json!({ "job": { "status": "completed" } }))
        .await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(
        body["errors"][0]["error"]
            .as_str()
            .unwrap()
            .contains("job identifier")
    );
}

#[tokio::test]
async fn callback_for_unmapped_question_reports_not_stored() {
    let app = TestApp::spawn().await;
    app.sheets.seed_email("ada@example.com").await;

    let payload = json!({
        "job": {
            "id": "job_cb5",
            "status": "completed",
            "media_url": app.provider.media_url("answer.mp3"),
            "metadata": { "email": "ada@example.com", "question": "Unmapped question" },
            "transcript": embedded_transcript()
        }
    });

    let resp = app.post_json("/webhook", &payload).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["stored"], false);
    assert!(app.sheets.writes().await.is_empty());
}
