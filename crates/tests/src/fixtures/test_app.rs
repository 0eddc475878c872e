use serde_json::Value;

use voxform_api::{build_router, state::AppState};
use voxform_config::{QuestionColumns, Settings};

use super::mock_provider::MockProvider;
use super::mock_sheets::MockSheets;

/// Spawns the full router on an ephemeral port, wired to in-process mock
/// provider and store servers.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub provider: MockProvider,
    pub sheets: MockSheets,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut Settings)) -> Self {
        let provider = MockProvider::start().await;
        let sheets = MockSheets::start().await;

        let mut settings = Settings::default();
        settings.provider.base_url = provider.base_url();
        settings.provider.api_key = "test-key".to_string();
        settings.provider.callback_url = Some("https://voxform.test/webhook".to_string());
        settings.provider.poll_interval_secs = 1;
        settings.store.base_url = sheets.base_url();
        settings.store.api_token = "sheets-token".to_string();
        settings.store.spreadsheet_id = "sheet-1".to_string();
        settings.store.sheet_name = "Responses".to_string();
        for question in ["What is your experience?", "Manual request", "Staying Connected"] {
            settings.store.question_columns.insert(
                question.to_string(),
                QuestionColumns {
                    link_column: "O".to_string(),
                    transcript_column: "P".to_string(),
                },
            );
        }
        customize(&mut settings);

        let state = AppState::new(settings);
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            address,
            client: reqwest::Client::new(),
            provider,
            sheets,
        }
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.address))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.address))
            .send()
            .await
            .unwrap()
    }
}
