pub mod client;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the service wire format
// ---------------------------------------------------------------------------

/// Snapshot of the game situation sent to the prediction service.
///
/// Field names and units follow the nflfastR conventions the models were
/// trained on: `yardline_100` is distance from the opponent goal line,
/// `score_differential` is positive when the possessing team leads, and the
/// situational flags are 0/1 integers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub down: u8,
    pub ydstogo: u8,
    pub yardline_100: u8,
    pub score_differential: i32,
    pub qtr: u8,
    pub game_seconds_remaining: u32,
    pub half_seconds_remaining: u32,
    pub posteam_timeouts_remaining: u8,
    pub defteam_timeouts_remaining: u8,
    pub red_zone: u8,
    pub goal_to_go: u8,
    pub two_min_drill: u8,
}

/// One typed result per prediction kind. Keeping these as tagged records
/// (instead of one loose map) means a missing field is a parse error at the
/// boundary, not a silent `undefined` deep in the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    FourthDown(FourthDownAdvice),
    Offensive(OffensiveAdvice),
    Defensive(DefensiveAdvice),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FourthDownCall {
    Go,
    #[default]
    PuntOrKick,
}

impl FourthDownCall {
    pub fn label(&self) -> &'static str {
        match self {
            FourthDownCall::Go => "GO FOR IT",
            FourthDownCall::PuntOrKick => "PUNT / KICK",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FourthDownAdvice {
    pub call: FourthDownCall,
    pub conversion_probability: f64,
    pub fg_probability: f64,
    pub expected_epa: f64,
    pub win_probability: f64,
}

/// Offensive play-caller output: the recommended play class plus the full
/// probability distribution over classes, sorted by name for stable display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffensiveAdvice {
    pub play_call: String,
    pub probabilities: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefensiveCall {
    PassDefense,
    #[default]
    RunDefense,
}

impl DefensiveCall {
    pub fn label(&self) -> &'static str {
        match self {
            DefensiveCall::PassDefense => "Pass Defense",
            DefensiveCall::RunDefense => "Run Defense",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefensiveAdvice {
    pub call: DefensiveCall,
    pub pass_probability: f64,
}

// ---------------------------------------------------------------------------
// Demo scenario catalog
// ---------------------------------------------------------------------------

/// A curated high-pressure situation from the service's demo catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    pub state: ScenarioState,
    pub expected: Option<ExpectedResult>,
}

/// The situational fields a scenario pins down. Clock presentation details
/// (home/away score split, play clock) are left to the consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioState {
    pub down: u8,
    pub ydstogo: u8,
    pub yardline_100: u8,
    pub score_differential: i32,
    pub qtr: u8,
    pub game_seconds_remaining: u32,
    pub posteam_timeouts_remaining: u8,
    pub defteam_timeouts_remaining: u8,
}

/// What the catalog says the models should conclude for this scenario.
/// Display-only; the dashboard never trusts it over a live prediction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedResult {
    pub recommendation: String,
    pub confidence: String,
    pub win_prob_delta: String,
}
