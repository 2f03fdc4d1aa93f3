use crate::app::MenuItem;
use crate::state::game_clock::{GameClock, GameSituation};
use chrono::Local;
use coach_api::{DefensiveAdvice, DemoScenario, FourthDownAdvice, OffensiveAdvice};

// ---------------------------------------------------------------------------
// Advice panel state
// ---------------------------------------------------------------------------

/// Latest result from each prediction model. Results are kept separately so a
/// failed refresh of one panel never blanks the other two.
#[derive(Debug, Default)]
pub struct AdviceState {
    pub fourth_down: Option<FourthDownAdvice>,
    pub offensive: Option<OffensiveAdvice>,
    pub defensive: Option<DefensiveAdvice>,
    /// HH:MM:SS of the last successful prediction, any panel.
    pub last_updated: Option<String>,
    /// Model names reported by the service health endpoint.
    pub models: Vec<String>,
    pub service_online: bool,
}

impl AdviceState {
    pub fn store(&mut self, advice: coach_api::Advice) {
        match advice {
            coach_api::Advice::FourthDown(a) => self.fourth_down = Some(a),
            coach_api::Advice::Offensive(a) => self.offensive = Some(a),
            coach_api::Advice::Defensive(a) => self.defensive = Some(a),
        }
        self.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

// ---------------------------------------------------------------------------
// Scenario catalog state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScenarioCatalogState {
    pub scenarios: Vec<DemoScenario>,
    pub selected: usize,
}

impl ScenarioCatalogState {
    pub fn load(&mut self, scenarios: Vec<DemoScenario>) {
        self.selected = 0;
        self.scenarios = scenarios;
    }

    pub fn navigate_down(&mut self) {
        let max = self.scenarios.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_scenario(&self) -> Option<&DemoScenario> {
        self.scenarios.get(self.selected)
    }

    /// Playback order is catalog order, each scenario expanded into a full
    /// situation record.
    pub fn playback_situations(&self) -> Vec<GameSituation> {
        self.scenarios
            .iter()
            .map(|s| GameSituation::from_scenario(&s.state))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Position feed state
// ---------------------------------------------------------------------------

const FEED_HISTORY_CAP: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct FeedPlay {
    pub received_at: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct FeedState {
    pub connected: bool,
    pub plays: Vec<FeedPlay>,
}

impl FeedState {
    pub fn ingest_play(&mut self, description: impl Into<String>) {
        self.plays.push(FeedPlay {
            received_at: Local::now().format("%H:%M:%S").to_string(),
            description: description.into(),
        });
        if self.plays.len() > FEED_HISTORY_CAP {
            let remove_count = self.plays.len() - FEED_HISTORY_CAP;
            self.plays.drain(0..remove_count);
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub clock: GameClock,
    pub advice: AdviceState,
    pub catalog: ScenarioCatalogState,
    pub feed: FeedState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            last_error: None,
            clock: GameClock::new(GameSituation::default()),
            advice: AdviceState::default(),
            catalog: ScenarioCatalogState::default(),
            feed: FeedState::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_api::client::builtin_scenarios;

    #[test]
    fn catalog_navigation_clamps_at_both_ends() {
        let mut catalog = ScenarioCatalogState::default();
        catalog.load(builtin_scenarios().expect("embedded catalog"));

        catalog.navigate_up();
        assert_eq!(catalog.selected, 0);
        for _ in 0..10 {
            catalog.navigate_down();
        }
        assert_eq!(catalog.selected, 2);
        assert_eq!(catalog.selected_scenario().map(|s| s.id.as_str()), Some("scen_3"));
    }

    #[test]
    fn catalog_reload_resets_selection() {
        let mut catalog = ScenarioCatalogState::default();
        catalog.load(builtin_scenarios().expect("embedded catalog"));
        catalog.navigate_down();
        catalog.load(builtin_scenarios().expect("embedded catalog"));
        assert_eq!(catalog.selected, 0);
    }

    #[test]
    fn playback_situations_follow_catalog_order() {
        let mut catalog = ScenarioCatalogState::default();
        catalog.load(builtin_scenarios().expect("embedded catalog"));
        let situations = catalog.playback_situations();
        assert_eq!(situations.len(), 3);
        assert_eq!(situations[0].distance, 1);
        assert_eq!(situations[2].clock_seconds, 4);
    }

    #[test]
    fn feed_history_is_capped() {
        let mut feed = FeedState::default();
        for i in 0..80 {
            feed.ingest_play(format!("play {i}"));
        }
        assert_eq!(feed.plays.len(), FEED_HISTORY_CAP);
        assert_eq!(feed.plays.last().map(|p| p.description.as_str()), Some("play 79"));
    }
}
