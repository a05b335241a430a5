use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use fair_dice::ProofBundle;
use reqwest::StatusCode;
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Clone)]
pub struct DiceClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct RollRequestDto<'a> {
    bet: u64,
    balance: u64,
    client_seed: &'a str,
    nonce: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    #[serde(flatten)]
    pub proof: ProofBundle,
    pub new_balance: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDto {
    error: String,
    #[serde(default)]
    kind: Option<String>,
}

impl DiceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for dice server")?;
        Ok(Self { base_url, http })
    }

    pub async fn roll(
        &self,
        bet: u64,
        balance: u64,
        client_seed: &str,
        nonce: u64,
    ) -> Result<RoundDto> {
        let url = format!("{}/roll-dice", self.base_url);
        let body = RollRequestDto {
            bet,
            balance,
            client_seed,
            nonce,
        };
        let res = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .wrap_err("dice server request failed")?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .wrap_err("failed to read dice server response body")?;
        if !status.is_success() {
            return Err(rejection(status, &bytes));
        }
        serde_json::from_slice(&bytes).wrap_err("invalid dice server round payload")
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> color_eyre::eyre::Report {
    match serde_json::from_slice::<ErrorDto>(body) {
        Ok(ErrorDto {
            error,
            kind: Some(kind),
        }) => eyre!("dice server rejected the round with {status} ({kind}): {error}"),
        Ok(ErrorDto { error, kind: None }) => {
            eyre!("dice server rejected the round with {status}: {error}")
        }
        Err(_) => {
            let body = String::from_utf8_lossy(body);
            eyre!("dice server responded with {status}: {body}")
        }
    }
}
