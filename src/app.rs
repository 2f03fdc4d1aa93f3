use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::feed::FeedWireMessage;
use crate::state::game_clock::{FieldUpdate, GameSituation, PLAY_CLOCK_RESET, QUARTER_SECONDS};
use coach_api::GameSnapshot;
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Field,
    Advice,
    Scenarios,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let mut app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        // Resume the last saved situation when one exists.
        if state_file_path().exists()
            && let Err(e) = app.load_state_file()
        {
            log::warn!("could not restore saved situation: {e}");
        }

        app
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.clock.situation().to_snapshot()
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_advice_loaded(&mut self, advice: coach_api::Advice) {
        self.state.last_error = None;
        self.state.advice.store(advice);
    }

    pub fn on_scenarios_loaded(&mut self, scenarios: Vec<coach_api::DemoScenario>) {
        self.state.last_error = None;
        self.state.catalog.load(scenarios);
    }

    pub fn on_health_checked(&mut self, models: Vec<String>) {
        self.state.advice.service_online = true;
        self.state.advice.models = models;
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Clock control
    // -----------------------------------------------------------------------

    pub fn on_clock_tick(&mut self) {
        self.state.clock.tick();
    }

    pub fn toggle_clock_running(&mut self) {
        self.state.clock.toggle_clock_running();
    }

    pub fn reset_play_clock(&mut self) {
        self.state.clock.reset_play_clock(PLAY_CLOCK_RESET);
    }

    // -----------------------------------------------------------------------
    // Manual field edits — each goes through apply(), which cancels any
    // running demo: the operator always outranks the script.
    // -----------------------------------------------------------------------

    pub fn advance_ball(&mut self) {
        let yard_line = self.state.clock.situation().yard_line.saturating_sub(1);
        self.apply_update(FieldUpdate { yard_line: Some(yard_line), ..FieldUpdate::default() });
    }

    pub fn retreat_ball(&mut self) {
        let yard_line = (self.state.clock.situation().yard_line + 1).min(99);
        self.apply_update(FieldUpdate { yard_line: Some(yard_line), ..FieldUpdate::default() });
    }

    pub fn shorten_distance(&mut self) {
        let distance = self.state.clock.situation().distance.saturating_sub(1).max(1);
        self.apply_update(FieldUpdate { distance: Some(distance), ..FieldUpdate::default() });
    }

    pub fn lengthen_distance(&mut self) {
        let distance = (self.state.clock.situation().distance + 1).min(99);
        self.apply_update(FieldUpdate { distance: Some(distance), ..FieldUpdate::default() });
    }

    /// 1 → 2 → 3 → 4 → 1.
    pub fn cycle_down(&mut self) {
        let down = self.state.clock.situation().down % 4 + 1;
        self.apply_update(FieldUpdate { down: Some(down), ..FieldUpdate::default() });
    }

    /// 1 → 2 → 3 → 4 → 5 (OT) → 1.
    pub fn cycle_quarter(&mut self) {
        let qtr = self.state.clock.situation().qtr % 5 + 1;
        self.apply_update(FieldUpdate { qtr: Some(qtr), ..FieldUpdate::default() });
    }

    pub fn nudge_clock(&mut self, delta_seconds: i32) {
        let current = self.state.clock.situation().clock_seconds as i64;
        let next = (current + i64::from(delta_seconds)).clamp(0, i64::from(QUARTER_SECONDS));
        self.apply_update(FieldUpdate {
            clock_seconds: Some(next as u32),
            ..FieldUpdate::default()
        });
    }

    pub fn flip_possession(&mut self) {
        let possession = self.state.clock.situation().possession.flip();
        self.apply_update(FieldUpdate { possession: Some(possession), ..FieldUpdate::default() });
    }

    pub fn score_field_goal(&mut self) {
        self.score_for_possessing_team(3);
    }

    pub fn score_touchdown(&mut self) {
        self.score_for_possessing_team(7);
    }

    /// Score for the possessing team, then hand the ball over: new drive for
    /// the other side starting at its own 25.
    fn score_for_possessing_team(&mut self, points: u16) {
        let s = self.state.clock.situation();
        let update = match s.possession {
            crate::state::game_clock::Possession::Home => FieldUpdate {
                score_home: Some(s.score_home + points),
                ..FieldUpdate::default()
            },
            crate::state::game_clock::Possession::Away => FieldUpdate {
                score_away: Some(s.score_away + points),
                ..FieldUpdate::default()
            },
        };
        let update = FieldUpdate {
            possession: Some(s.possession.flip()),
            down: Some(1),
            distance: Some(10),
            yard_line: Some(75),
            play_clock_seconds: Some(PLAY_CLOCK_RESET),
            ..update
        };
        self.apply_update(update);
    }

    pub fn use_timeout(&mut self) {
        let s = self.state.clock.situation();
        let update = match s.possession {
            crate::state::game_clock::Possession::Home => FieldUpdate {
                timeouts_home: Some(s.timeouts_home.saturating_sub(1)),
                clock_running: Some(false),
                ..FieldUpdate::default()
            },
            crate::state::game_clock::Possession::Away => FieldUpdate {
                timeouts_away: Some(s.timeouts_away.saturating_sub(1)),
                clock_running: Some(false),
                ..FieldUpdate::default()
            },
        };
        self.apply_update(update);
    }

    fn apply_update(&mut self, update: FieldUpdate) {
        self.state.clock.apply(update);
    }

    // -----------------------------------------------------------------------
    // Demo playback + scenarios
    // -----------------------------------------------------------------------

    /// Start or stop demo playback. The spawned timer task is reconciled by
    /// the main loop against `demo_active()` after every event.
    pub fn toggle_demo(&mut self) {
        if self.state.clock.demo_active() {
            self.state.clock.stop_demo();
            return;
        }
        let situations = self.state.catalog.playback_situations();
        if situations.is_empty() {
            self.state.last_error = Some("No scenarios loaded for demo playback".to_string());
            return;
        }
        self.state
            .clock
            .start_demo(situations, self.settings.demo_interval_ms);
    }

    pub fn on_demo_advance(&mut self) -> bool {
        self.state.clock.demo_advance()
    }

    /// Load the highlighted catalog scenario as the live situation. A manual
    /// load, so any running demo stops.
    pub fn apply_selected_scenario(&mut self) -> bool {
        let Some(scenario) = self.state.catalog.selected_scenario() else {
            return false;
        };
        let situation = GameSituation::from_scenario(&scenario.state);
        self.state.clock.stop_demo();
        self.state.clock.replace(situation);
        self.state.last_error = None;
        true
    }

    // -----------------------------------------------------------------------
    // Position feed handlers
    // -----------------------------------------------------------------------

    pub fn on_feed_connected(&mut self) {
        self.state.feed.connected = true;
    }

    pub fn on_feed_disconnected(&mut self) {
        self.state.feed.connected = false;
    }

    pub fn on_feed_error(&mut self, message: String) {
        log::warn!("position feed: {message}");
    }

    /// Merge a spotter update. Feed data counts as manual input, so it also
    /// cancels demo playback.
    pub fn on_feed_update(&mut self, msg: FeedWireMessage) {
        if let Some(play) = msg.play.as_deref().filter(|p| !p.trim().is_empty()) {
            self.state.feed.ingest_play(play);
        }
        if !msg.is_commentary_only() {
            self.state.clock.apply(msg.to_update());
        }
    }

    // -----------------------------------------------------------------------
    // Situation save / restore
    // -----------------------------------------------------------------------

    pub fn save_state_file(&mut self) -> Result<(), String> {
        let path = state_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(self.state.clock.situation())
            .map_err(|e| format!("serialize situation failed: {e}"))?;
        std::fs::write(&path, payload).map_err(|e| format!("write situation failed: {e}"))?;
        Ok(())
    }

    pub fn load_state_file(&mut self) -> Result<(), String> {
        let path = state_file_path();
        let content =
            std::fs::read_to_string(&path).map_err(|e| format!("read situation failed: {e}"))?;
        let situation: GameSituation = serde_json::from_str(&content)
            .map_err(|e| format!("parse situation failed: {e}"))?;
        self.state.clock.stop_demo();
        self.state.clock.replace(situation);
        Ok(())
    }
}

fn state_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("COACHTUI_STATE_JSON")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("coachtui").join("state.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("coachtui")
            .join("state.json");
    }
    PathBuf::from("state.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game_clock::Possession;

    fn app() -> App {
        App {
            settings: AppSettings {
                full_screen: false,
                log_level: None,
                demo_interval_ms: 4000,
                feed_endpoint: "ws://127.0.0.1:8765".to_string(),
            },
            state: AppState::new(),
        }
    }

    #[test]
    fn cycle_down_wraps_after_fourth() {
        let mut app = app();
        // Default situation is 4th down.
        app.cycle_down();
        assert_eq!(app.state.clock.situation().down, 1);
        app.cycle_down();
        assert_eq!(app.state.clock.situation().down, 2);
    }

    #[test]
    fn cycle_quarter_wraps_after_overtime() {
        let mut app = app();
        app.cycle_quarter();
        assert_eq!(app.state.clock.situation().qtr, 4);
        app.cycle_quarter();
        assert_eq!(app.state.clock.situation().qtr, 5);
        app.cycle_quarter();
        assert_eq!(app.state.clock.situation().qtr, 1);
    }

    #[test]
    fn nudge_clock_clamps_to_quarter_bounds() {
        let mut app = app();
        app.nudge_clock(10_000);
        assert_eq!(app.state.clock.situation().clock_seconds, QUARTER_SECONDS);
        app.nudge_clock(-10_000);
        assert_eq!(app.state.clock.situation().clock_seconds, 0);
    }

    #[test]
    fn touchdown_scores_and_changes_possession() {
        let mut app = app();
        app.score_touchdown();
        let s = app.state.clock.situation();
        assert_eq!(s.score_home, 31);
        assert_eq!(s.possession, Possession::Away);
        assert_eq!(s.down, 1);
        assert_eq!(s.distance, 10);
        assert_eq!(s.yard_line, 75);
    }

    #[test]
    fn timeout_stops_clock_and_burns_one() {
        let mut app = app();
        app.use_timeout();
        let s = app.state.clock.situation();
        assert_eq!(s.timeouts_home, 2);
        assert!(!s.clock_running);

        app.use_timeout();
        app.use_timeout();
        app.use_timeout();
        assert_eq!(app.state.clock.situation().timeouts_home, 0);
    }

    #[test]
    fn demo_toggle_with_empty_catalog_reports_error() {
        let mut app = app();
        app.toggle_demo();
        assert!(!app.state.clock.demo_active());
        assert!(app.state.last_error.is_some());
    }

    #[test]
    fn demo_toggle_starts_and_stops_playback() {
        let mut app = app();
        app.on_scenarios_loaded(coach_api::client::builtin_scenarios().expect("catalog"));
        app.toggle_demo();
        assert!(app.state.clock.demo_active());
        app.toggle_demo();
        assert!(!app.state.clock.demo_active());
    }

    #[test]
    fn manual_edit_during_demo_takes_over() {
        let mut app = app();
        app.on_scenarios_loaded(coach_api::client::builtin_scenarios().expect("catalog"));
        app.toggle_demo();
        app.on_demo_advance();
        app.advance_ball();
        assert!(!app.state.clock.demo_active());
    }

    #[test]
    fn applying_scenario_stops_demo() {
        let mut app = app();
        app.on_scenarios_loaded(coach_api::client::builtin_scenarios().expect("catalog"));
        app.toggle_demo();
        assert!(app.apply_selected_scenario());
        assert!(!app.state.clock.demo_active());
        // scen_1: 4th and 1 at the opponent 45.
        assert_eq!(app.state.clock.situation().distance, 1);
        assert_eq!(app.state.clock.situation().yard_line, 45);
    }

    #[test]
    fn commentary_feed_message_leaves_clock_untouched() {
        let mut app = app();
        let before = app.state.clock.situation().clone();
        app.on_feed_update(FeedWireMessage {
            play: Some("TV timeout".to_string()),
            ..FeedWireMessage::default()
        });
        assert_eq!(app.state.clock.situation(), &before);
        assert_eq!(app.state.feed.plays.len(), 1);
    }

    #[test]
    fn feed_position_update_merges_into_situation() {
        let mut app = app();
        app.on_feed_update(FeedWireMessage {
            yard_line: Some(18),
            down: Some(1),
            distance: Some(10),
            play: Some("24-yd catch and run".to_string()),
            ..FeedWireMessage::default()
        });
        let s = app.state.clock.situation();
        assert_eq!(s.yard_line, 18);
        assert!(s.red_zone());
        assert_eq!(s.qtr, 3);
    }
}
