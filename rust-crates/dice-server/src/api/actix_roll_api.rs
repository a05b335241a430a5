use crate::{
    Result,
    api::{
        ApiError,
        dto::{
            HealthDto,
            RollRequestDto,
            RollResponseDto,
            VerifyResponseDto,
        },
    },
    config::ServerConfig,
};
use actix_cors::Cors;
use actix_web::{
    App,
    HttpServer,
    dev::ServerHandle,
    http::header,
    web,
};
use anyhow::Context;
use fair_dice::{
    BetRequest,
    Engine,
    EntropySource,
    Error,
    ProofBundle,
};
use std::{
    net::TcpListener,
    thread::JoinHandle,
};

/// HTTP front of the engine. The server runs on its own actix system thread
/// and is stopped when this value is dropped.
pub struct ActixRollApi {
    base_url: String,
    server_handle: ServerHandle,
    server_thread: Option<JoinHandle<()>>,
}

impl ActixRollApi {
    pub async fn new<E>(config: &ServerConfig, engine: Engine<E>) -> Result<Self>
    where
        E: EntropySource + 'static,
    {
        let listener = TcpListener::bind((config.host, config.port))
            .context("failed to bind HTTP listener for roll API")?;
        let address = listener
            .local_addr()
            .context("failed to read listener address")?;
        let base_url = format!("http://{}", address);

        tracing::info!("roll API listening on {}", base_url);

        let engine = web::Data::new(engine);
        let allowed_origins = config.allowed_origins.clone();
        let json_limit = config.json_limit;
        let server = HttpServer::new(move || {
            App::new()
                .wrap(cors(&allowed_origins))
                .app_data(engine.clone())
                .app_data(json_config(json_limit))
                .route("/roll-dice", web::post().to(handle_roll::<E>))
                .route("/verify", web::post().to(handle_verify))
                .route("/health", web::get().to(handle_health))
        })
        .listen(listener)
        .context("failed to start Actix server")?
        .run();

        let server_handle = server.handle();
        let server_thread = std::thread::spawn(move || {
            let sys = actix_web::rt::System::new();
            if let Err(e) = sys.block_on(server) {
                tracing::error!("roll API server stopped with error: {e}");
            }
        });

        Ok(Self {
            base_url,
            server_handle,
            server_thread: Some(server_thread),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for ActixRollApi {
    fn drop(&mut self) {
        let _ = self.server_handle.stop(true);
        if let Some(thread) = self.server_thread.take() {
            let _ = thread.join();
        }
    }
}

fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            tracing::warn!("rejected malformed request body: {err}");
            ApiError(Error::invalid_request(err.to_string())).into()
        })
}

async fn handle_roll<E: EntropySource + 'static>(
    engine: web::Data<Engine<E>>,
    body: web::Json<RollRequestDto>,
) -> actix_web::Result<web::Json<RollResponseDto>, ApiError> {
    tracing::info!("received roll request");
    let request = BetRequest::try_from(body.into_inner())?;
    let result = engine.play(&request)?;
    Ok(web::Json(RollResponseDto::from(&result)))
}

async fn handle_verify(
    body: web::Json<ProofBundle>,
) -> actix_web::Result<web::Json<VerifyResponseDto>, ApiError> {
    tracing::info!("received verify request");
    let verification = fair_dice::verify(&body)?;
    if !verification.is_fair() {
        tracing::warn!(
            commitment_matches = verification.commitment_matches,
            roll_matches = verification.roll_matches,
            "submitted round failed verification"
        );
    }
    Ok(web::Json(verification.into()))
}

async fn handle_health() -> web::Json<HealthDto> {
    web::Json(HealthDto {
        status: "ok".to_string(),
    })
}

#[allow(non_snake_case)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::ErrorResponseDto;
    use fair_dice::{
        ErrorKind,
        OsEntropy,
        test_helpers::{
            FailingEntropy,
            FixedEntropy,
        },
    };
    use reqwest::StatusCode;
    use serde_json::json;

    async fn post(api: &ActixRollApi, path: &str, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}{}", api.base_url(), path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn roll_dice__returns_settled_round_with_proof() {
        // given
        let api = ActixRollApi::new(
            &ServerConfig::ephemeral(),
            Engine::with_entropy(FixedEntropy::new([0x01; 32])),
        )
        .await
        .unwrap();

        // when
        let response = post(
            &api,
            "/roll-dice",
            json!({ "bet": 100, "balance": 1000, "clientSeed": "lucky-seed" }),
        )
        .await;

        // then
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.json::<RollResponseDto>().await.unwrap();
        assert_eq!(body.proof.roll.value(), 4);
        assert_eq!(body.new_balance, 1100);
        assert_eq!(body.proof.server_seed, "01".repeat(32));
        assert_eq!(body.proof.client_seed, "lucky-seed");
        assert_eq!(body.proof.nonce, 0);
        assert!(fair_dice::verify(&body.proof).unwrap().is_fair());
    }

    #[tokio::test]
    async fn roll_dice__validation_failure_is_bad_request() {
        // given
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), Engine::new())
            .await
            .unwrap();

        // when
        let response = post(
            &api,
            "/roll-dice",
            json!({ "bet": 2000, "balance": 1000, "clientSeed": "abc" }),
        )
        .await;

        // then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.json::<ErrorResponseDto>().await.unwrap();
        assert_eq!(body.kind, ErrorKind::InsufficientBalance);
        assert_eq!(body.error, "Bet exceeds current balance");
    }

    #[tokio::test]
    async fn roll_dice__entropy_failure_is_service_unavailable() {
        // given
        let api = ActixRollApi::new(
            &ServerConfig::ephemeral(),
            Engine::with_entropy(FailingEntropy),
        )
        .await
        .unwrap();

        // when
        let response = post(
            &api,
            "/roll-dice",
            json!({ "bet": 1, "balance": 10, "clientSeed": "abc" }),
        )
        .await;

        // then
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = response.json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["kind"], "EntropyUnavailable");
        assert!(body.get("serverSeed").is_none());
        assert!(body.get("roll").is_none());
    }

    #[tokio::test]
    async fn roll_dice__unparseable_body_is_invalid_request() {
        // given
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), Engine::new())
            .await
            .unwrap();

        // when
        let response = reqwest::Client::new()
            .post(format!("{}/roll-dice", api.base_url()))
            .header("content-type", "application/json")
            .body("{ not json")
            .send()
            .await
            .unwrap();

        // then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.json::<ErrorResponseDto>().await.unwrap();
        assert_eq!(body.kind, ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn verify__reports_tampered_roll() {
        // given
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), Engine::<OsEntropy>::new())
            .await
            .unwrap();
        let round = post(
            &api,
            "/roll-dice",
            json!({ "bet": 5, "balance": 50, "clientSeed": "abc", "nonce": 2 }),
        )
        .await
        .json::<RollResponseDto>()
        .await
        .unwrap();
        let mut tampered = serde_json::to_value(&round.proof).unwrap();
        tampered["roll"] = json!(round.proof.roll.value() % 6 + 1);

        // when
        let honest = post(&api, "/verify", serde_json::to_value(&round.proof).unwrap())
            .await
            .json::<VerifyResponseDto>()
            .await
            .unwrap();
        let cheated = post(&api, "/verify", tampered)
            .await
            .json::<VerifyResponseDto>()
            .await
            .unwrap();

        // then
        assert!(honest.fair);
        assert!(cheated.commitment_matches);
        assert!(!cheated.roll_matches);
        assert!(!cheated.fair);
        assert_eq!(cheated.expected_roll, round.proof.roll);
    }

    #[tokio::test]
    async fn health__reports_ok() {
        // given
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), Engine::new())
            .await
            .unwrap();

        // when
        let response = reqwest::get(format!("{}/health", api.base_url()))
            .await
            .unwrap();

        // then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.json::<HealthDto>().await.unwrap(),
            HealthDto {
                status: "ok".into()
            }
        );
    }

    #[tokio::test]
    async fn cors__permissive_by_default() {
        // given
        let api = ActixRollApi::new(&ServerConfig::ephemeral(), Engine::new())
            .await
            .unwrap();

        // when
        let response = reqwest::Client::new()
            .get(format!("{}/health", api.base_url()))
            .header("origin", "https://dice.example")
            .send()
            .await
            .unwrap();

        // then
        assert!(
            response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }
}
