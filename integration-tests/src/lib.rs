use dice_server::{
    api::{
        actix_roll_api::ActixRollApi,
        dto::{
            ErrorResponseDto,
            RollResponseDto,
        },
    },
    config::ServerConfig,
};
use fair_dice::{
    Engine,
    EntropySource,
};
use reqwest::{
    Response,
    StatusCode,
};
use serde_json::{
    Value,
    json,
};

/// A dice server on an ephemeral port plus a client pointed at it.
pub struct TestContext {
    api: ActixRollApi,
    http: reqwest::Client,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_engine(Engine::new()).await
    }

    pub async fn with_engine<E: EntropySource + 'static>(engine: Engine<E>) -> Self {
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), engine)
            .await
            .unwrap();
        tracing::info!("test server at {}", api.base_url());
        Self {
            api,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub async fn post(&self, path: &str, body: Value) -> Response {
        self.http
            .post(format!("{}{}", self.base_url(), path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn roll(&self, bet: u64, balance: u64, client_seed: &str) -> Response {
        self.post(
            "/roll-dice",
            json!({ "bet": bet, "balance": balance, "clientSeed": client_seed }),
        )
        .await
    }

    pub async fn roll_ok(&self, bet: u64, balance: u64, client_seed: &str) -> RollResponseDto {
        let response = self.roll(bet, balance, client_seed).await;
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }

    pub async fn rejected(response: Response) -> (StatusCode, ErrorResponseDto) {
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}
