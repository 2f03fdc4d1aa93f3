use crate::wire::{
    DefensiveResponse, FourthDownResponse, HealthResponse, OffensiveResponse, ScenarioEntry,
};
use crate::{
    DefensiveAdvice, DefensiveCall, DemoScenario, ExpectedResult, FourthDownAdvice,
    FourthDownCall, GameSnapshot, OffensiveAdvice, ScenarioState,
};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const FALLBACK_SCENARIOS_JSON: &str = include_str!("../scenarios.json");

/// Client for the play-prediction backend (the FastAPI service in the
/// original stack). The service is a black box that scores a `GameSnapshot`;
/// nothing it returns is ever written back into the game clock.
#[derive(Debug, Clone)]
pub struct CoachApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for CoachApi {
    fn default() -> Self {
        let base_url = std::env::var("COACHTUI_API")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl CoachApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::builder()
                .user_agent("coachtui/0.1 (terminal sideline dashboard)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Score a 4th-down decision: go-for-it vs punt/kick, plus win probability.
    pub async fn predict_fourth_down(&self, snap: &GameSnapshot) -> ApiResult<FourthDownAdvice> {
        let url = format!("{}/predict/fourth-down", self.base_url);
        let raw: FourthDownResponse = self.post(&url, snap).await?;
        map_fourth_down(raw)
    }

    /// Ask the offensive play-caller model for a play class distribution.
    pub async fn predict_offensive(&self, snap: &GameSnapshot) -> ApiResult<OffensiveAdvice> {
        let url = format!("{}/predict/offensive", self.base_url);
        let raw: OffensiveResponse = self.post(&url, snap).await?;
        map_offensive(raw)
    }

    /// Ask the defensive coordinator model for a pass/run lean.
    pub async fn predict_defensive(&self, snap: &GameSnapshot) -> ApiResult<DefensiveAdvice> {
        let url = format!("{}/predict/defensive", self.base_url);
        let raw: DefensiveResponse = self.post(&url, snap).await?;
        map_defensive(raw)
    }

    /// Fetch the curated demo-scenario catalog.
    ///
    /// Fallback chain:
    /// 1) `COACHTUI_SCENARIOS_JSON` env var — load from a local JSON file.
    /// 2) The prediction service's `/demo/scenarios` endpoint.
    /// 3) Embedded catalog — last-resort offline fallback.
    pub async fn fetch_scenarios(&self) -> ApiResult<Vec<DemoScenario>> {
        if let Ok(path) = std::env::var("COACHTUI_SCENARIOS_JSON")
            && !path.trim().is_empty()
        {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ApiError::NotFound(format!("could not read {path}: {e}")))?;
            let raw: Vec<ScenarioEntry> = serde_json::from_str(&content)
                .map_err(|e| ApiError::NotFound(format!("invalid scenarios json at {path}: {e}")))?;
            return Ok(map_scenarios(raw));
        }

        let url = format!("{}/demo/scenarios", self.base_url);
        match self.get::<Vec<ScenarioEntry>>(&url).await {
            Ok(raw) if !raw.is_empty() => Ok(map_scenarios(raw)),
            _ => builtin_scenarios(),
        }
    }

    /// Service liveness check; returns the names of the loaded models.
    pub async fn health(&self) -> ApiResult<Vec<String>> {
        let url = format!("{}/health", self.base_url);
        let raw: HealthResponse = self.get(&url).await?;
        match raw.status.as_deref() {
            Some("ok") => Ok(raw.models_loaded.unwrap_or_default()),
            other => Err(ApiError::Other(format!(
                "service unhealthy: status {:?}",
                other.unwrap_or("missing")
            ))),
        }
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &GameSnapshot,
    ) -> ApiResult<T> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            // 503 = models not loaded on the service side.
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

/// The three curated scenarios shipped with the repo, used when the service
/// is unreachable or its catalog is empty.
pub fn builtin_scenarios() -> ApiResult<Vec<DemoScenario>> {
    let raw: Vec<ScenarioEntry> = serde_json::from_str(FALLBACK_SCENARIOS_JSON)
        .map_err(|e| ApiError::NotFound(format!("invalid embedded scenario json: {e}")))?;
    Ok(map_scenarios(raw))
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_fourth_down(raw: FourthDownResponse) -> ApiResult<FourthDownAdvice> {
    let call = raw
        .recommendation
        .as_deref()
        .and_then(parse_fourth_down_call)
        .ok_or_else(|| missing("fourth-down", "recommendation"))?;
    Ok(FourthDownAdvice {
        call,
        conversion_probability: raw
            .conversion_probability
            .ok_or_else(|| missing("fourth-down", "conversion_probability"))?,
        fg_probability: raw
            .fg_probability
            .ok_or_else(|| missing("fourth-down", "fg_probability"))?,
        expected_epa: raw
            .expected_epa
            .ok_or_else(|| missing("fourth-down", "expected_epa"))?,
        win_probability: raw
            .win_probability
            .ok_or_else(|| missing("fourth-down", "win_probability"))?,
    })
}

fn map_offensive(raw: OffensiveResponse) -> ApiResult<OffensiveAdvice> {
    Ok(OffensiveAdvice {
        play_call: raw
            .recommendation
            .filter(|r| !r.is_empty())
            .ok_or_else(|| missing("offensive", "recommendation"))?,
        probabilities: raw.probabilities.unwrap_or_default(),
    })
}

fn map_defensive(raw: DefensiveResponse) -> ApiResult<DefensiveAdvice> {
    let call = raw
        .recommendation
        .as_deref()
        .and_then(parse_defensive_call)
        .ok_or_else(|| missing("defensive", "recommendation"))?;
    Ok(DefensiveAdvice {
        call,
        pass_probability: raw
            .pass_probability
            .ok_or_else(|| missing("defensive", "pass_probability"))?,
    })
}

fn parse_fourth_down_call(s: &str) -> Option<FourthDownCall> {
    match s {
        "GO" => Some(FourthDownCall::Go),
        "PUNT/KICK" | "PUNT" | "KICK" => Some(FourthDownCall::PuntOrKick),
        _ => None,
    }
}

fn parse_defensive_call(s: &str) -> Option<DefensiveCall> {
    match s {
        "Pass Defense" => Some(DefensiveCall::PassDefense),
        "Run Defense" => Some(DefensiveCall::RunDefense),
        _ => None,
    }
}

fn missing(endpoint: &str, field: &str) -> ApiError {
    ApiError::Other(format!("{endpoint} response missing field {field}"))
}

/// Entries without an id are dropped; everything else defaults, so a sparse
/// catalog still renders.
fn map_scenarios(raw: Vec<ScenarioEntry>) -> Vec<DemoScenario> {
    raw.into_iter().filter_map(map_scenario).collect()
}

fn map_scenario(entry: ScenarioEntry) -> Option<DemoScenario> {
    let id = entry.id.filter(|id| !id.is_empty())?;
    let state = entry.state.unwrap_or_default();
    Some(DemoScenario {
        title: entry.title.unwrap_or_else(|| id.clone()),
        description: entry.description.unwrap_or_default(),
        state: ScenarioState {
            down: state.down.unwrap_or(1),
            ydstogo: state.ydstogo.unwrap_or(10),
            yardline_100: state.yardline_100.unwrap_or(75),
            score_differential: state.score_differential.unwrap_or(0),
            qtr: state.qtr.unwrap_or(1),
            game_seconds_remaining: state.game_seconds_remaining.unwrap_or(3600),
            posteam_timeouts_remaining: state.posteam_timeouts_remaining.unwrap_or(3),
            defteam_timeouts_remaining: state.defteam_timeouts_remaining.unwrap_or(3),
        },
        expected: entry.expected_result.map(|e| ExpectedResult {
            recommendation: e.recommendation.unwrap_or_default(),
            confidence: e.confidence.unwrap_or_default(),
            win_prob_delta: e.win_prob_delta.unwrap_or_default(),
        }),
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourth_down_go_maps() {
        let raw = FourthDownResponse {
            recommendation: Some("GO".into()),
            conversion_probability: Some(0.61),
            fg_probability: Some(0.42),
            expected_epa: Some(0.8),
            win_probability: Some(0.55),
        };
        let advice = map_fourth_down(raw).expect("valid response should map");
        assert_eq!(advice.call, FourthDownCall::Go);
        assert_eq!(advice.conversion_probability, 0.61);
    }

    #[test]
    fn fourth_down_missing_probability_is_rejected() {
        let raw = FourthDownResponse {
            recommendation: Some("PUNT/KICK".into()),
            conversion_probability: None,
            fg_probability: Some(0.1),
            expected_epa: Some(-0.3),
            win_probability: Some(0.2),
        };
        assert!(map_fourth_down(raw).is_err());
    }

    #[test]
    fn fourth_down_unknown_recommendation_is_rejected() {
        let raw = FourthDownResponse {
            recommendation: Some("HAIL MARY".into()),
            conversion_probability: Some(0.5),
            fg_probability: Some(0.5),
            expected_epa: Some(0.0),
            win_probability: Some(0.5),
        };
        assert!(map_fourth_down(raw).is_err());
    }

    #[test]
    fn defensive_calls_parse() {
        assert_eq!(parse_defensive_call("Pass Defense"), Some(DefensiveCall::PassDefense));
        assert_eq!(parse_defensive_call("Run Defense"), Some(DefensiveCall::RunDefense));
        assert_eq!(parse_defensive_call("Prevent"), None);
    }

    #[test]
    fn embedded_scenario_catalog_parses() {
        let scenarios = builtin_scenarios().expect("embedded catalog should parse");
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].id, "scen_1");
        assert_eq!(scenarios[0].state.down, 4);
        assert_eq!(scenarios[2].state.game_seconds_remaining, 4);
        assert!(scenarios.iter().all(|s| s.expected.is_some()));
    }

    #[test]
    fn scenario_without_id_is_dropped() {
        let raw = vec![ScenarioEntry::default()];
        assert!(map_scenarios(raw).is_empty());
    }

    #[tokio::test]
    async fn predict_fourth_down_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict/fourth-down")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"recommendation":"GO","conversion_probability":0.58,
                    "fg_probability":0.31,"expected_epa":0.42,"win_probability":0.61}"#,
            )
            .create_async()
            .await;

        let api = CoachApi::with_base_url(server.url());
        let advice = api
            .predict_fourth_down(&GameSnapshot::default())
            .await
            .expect("mocked prediction should succeed");
        assert_eq!(advice.call, FourthDownCall::Go);
        assert_eq!(advice.win_probability, 0.61);
    }

    #[tokio::test]
    async fn predict_defensive_service_error_surfaces() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/predict/defensive")
            .with_status(503)
            .create_async()
            .await;

        let api = CoachApi::with_base_url(server.url());
        let err = api
            .predict_defensive(&GameSnapshot::default())
            .await
            .expect_err("503 must surface as an error");
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn fetch_scenarios_falls_back_to_embedded_catalog() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/demo/scenarios")
            .with_status(500)
            .create_async()
            .await;

        let api = CoachApi::with_base_url(server.url());
        let scenarios = api.fetch_scenarios().await.expect("fallback should apply");
        assert_eq!(scenarios.len(), 3);
    }
}
