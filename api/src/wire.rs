/// Prediction-service raw wire types — serde shapes for deserializing the
/// coach backend's JSON. These map to the clean domain types via the mapping
/// functions in client.rs.
use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// /predict/* responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FourthDownResponse {
    /// "GO" or "PUNT/KICK"
    pub recommendation: Option<String>,
    pub conversion_probability: Option<f64>,
    pub fg_probability: Option<f64>,
    pub expected_epa: Option<f64>,
    pub win_probability: Option<f64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct OffensiveResponse {
    pub recommendation: Option<String>,
    /// Play class -> probability, e.g. {"pass_short": 0.41, "run_inside": 0.27}
    pub probabilities: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DefensiveResponse {
    /// "Pass Defense" or "Run Defense"
    pub recommendation: Option<String>,
    pub pass_probability: Option<f64>,
}

// ---------------------------------------------------------------------------
// /demo/scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScenarioEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<ScenarioStateEntry>,
    pub expected_result: Option<ExpectedResultEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScenarioStateEntry {
    pub down: Option<u8>,
    pub ydstogo: Option<u8>,
    pub yardline_100: Option<u8>,
    pub score_differential: Option<i32>,
    pub qtr: Option<u8>,
    pub game_seconds_remaining: Option<u32>,
    pub posteam_timeouts_remaining: Option<u8>,
    pub defteam_timeouts_remaining: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ExpectedResultEntry {
    pub recommendation: Option<String>,
    pub confidence: Option<String>,
    pub win_prob_delta: Option<String>,
}

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HealthResponse {
    pub status: Option<String>,
    pub models_loaded: Option<Vec<String>>,
}
