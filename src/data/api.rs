use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use crate::data::error::{ClientError, ClientResult};
use crate::data::types::{
    Envelope, LeagueStats, MatchRecord, PredictionRequest, PredictionResult, Stats,
    TeamHistoryEntry, TeamHistoryResponse,
};

/// Endpoints the controllers consume
pub trait FootballApi: Send + Sync + 'static {
    fn stats(&self) -> impl Future<Output = ClientResult<Stats>> + Send;

    fn leagues(&self) -> impl Future<Output = ClientResult<LeagueStats>> + Send;

    fn matches(&self) -> impl Future<Output = ClientResult<Vec<MatchRecord>>> + Send;

    fn teams(&self) -> impl Future<Output = ClientResult<Vec<String>>> + Send;

    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = ClientResult<PredictionResult>> + Send;

    fn team_history(
        &self,
        team: &str,
    ) -> impl Future<Output = ClientResult<Vec<TeamHistoryEntry>>> + Send;
}

pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: String, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let request = self.client
            .get(&url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache");

        let envelope: Envelope<T> = fetch_json(request).await?;
        envelope.into_result()
    }

    /// `{base}/team_history/{team}` with the team name as one encoded segment
    fn team_history_url(&self, team: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Network(format!("invalid base url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::Network("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("team_history")
            .push(team);

        Ok(url)
    }
}

impl FootballApi for HttpApiClient {
    async fn stats(&self) -> ClientResult<Stats> {
        self.get_envelope("stats").await
    }

    async fn leagues(&self) -> ClientResult<LeagueStats> {
        self.get_envelope("leagues").await
    }

    async fn matches(&self) -> ClientResult<Vec<MatchRecord>> {
        self.get_envelope("matches").await
    }

    async fn teams(&self) -> ClientResult<Vec<String>> {
        self.get_envelope("teams").await
    }

    async fn predict(&self, request: &PredictionRequest) -> ClientResult<PredictionResult> {
        let url = self.endpoint("predict");
        debug!("POST {} {:?}", url, request);

        let envelope: Envelope<PredictionResult> =
            fetch_json(self.client.post(&url).json(request)).await?;

        envelope.into_result_or("Prediction failed")
    }

    async fn team_history(&self, team: &str) -> ClientResult<Vec<TeamHistoryEntry>> {
        let url = self.team_history_url(team)?;
        debug!("GET {}", url);

        let response: TeamHistoryResponse = fetch_json(self.client.get(url)).await?;

        if !response.success {
            return Err(ClientError::Api(
                response.error.unwrap_or_else(|| "team history unavailable".to_string()),
            ));
        }

        Ok(response.matches)
    }
}

/// Send `request` and decode its JSON body. Transport failures and bodies
/// that are not JSON are `Network`; JSON of the wrong shape is `Api`.
async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> ClientResult<T> {
    let body: Value = request.send().await?.json().await?;
    decode_body(body)
}

fn decode_body<T: DeserializeOwned>(body: Value) -> ClientResult<T> {
    serde_json::from_value(body)
        .map_err(|e| ClientError::Api(format!("Unexpected response format: {}", e)))
}
