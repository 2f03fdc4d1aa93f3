use coach_api::{GameSnapshot, ScenarioState};
use serde::{Deserialize, Serialize};

/// Regulation quarter length in seconds.
pub const QUARTER_SECONDS: u32 = 900;
/// Standard play-clock reset value.
pub const PLAY_CLOCK_RESET: u32 = 40;
/// Clock threshold for the two-minute drill flag.
pub const TWO_MINUTE_WARNING: u32 = 120;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Possession {
    #[default]
    Home,
    Away,
}

impl Possession {
    pub fn flip(self) -> Self {
        match self {
            Possession::Home => Possession::Away,
            Possession::Away => Possession::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Possession::Home => "HOME",
            Possession::Away => "AWAY",
        }
    }
}

/// The authoritative game-situation record. One instance per session, owned
/// by [`GameClock`]; everything else reads snapshots or submits updates.
///
/// Out-of-range values supplied by callers are accepted as-is. The only
/// defended invariant is that the two countdowns never go below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSituation {
    /// 1-4, 5 = overtime.
    pub qtr: u8,
    /// Game clock, seconds remaining in the quarter. Counts down.
    pub clock_seconds: u32,
    /// Independent short countdown, resets to [`PLAY_CLOCK_RESET`].
    pub play_clock_seconds: u32,
    /// Gates whether the per-second tick mutates the countdowns.
    pub clock_running: bool,
    pub down: u8,
    /// Yards to go for a first down (`ydstogo`).
    pub distance: u8,
    /// Distance from the opponent goal line (`yardline_100`): 100 = own end
    /// zone, 0 = opponent end zone.
    pub yard_line: u8,
    pub score_home: u16,
    pub score_away: u16,
    pub possession: Possession,
    pub timeouts_home: u8,
    pub timeouts_away: u8,
}

impl Default for GameSituation {
    /// The demo kickoff snapshot: KC 24 - 21 BUF, 4th & 2 at the 42, Q3 08:45.
    fn default() -> Self {
        Self {
            qtr: 3,
            clock_seconds: 8 * 60 + 45,
            play_clock_seconds: PLAY_CLOCK_RESET,
            clock_running: true,
            down: 4,
            distance: 2,
            yard_line: 42,
            score_home: 24,
            score_away: 21,
            possession: Possession::Home,
            timeouts_home: 3,
            timeouts_away: 3,
        }
    }
}

impl GameSituation {
    // -----------------------------------------------------------------------
    // Derived flags — computed on read, never stored
    // -----------------------------------------------------------------------

    pub fn red_zone(&self) -> bool {
        self.yard_line <= 20
    }

    pub fn goal_to_go(&self) -> bool {
        self.distance >= self.yard_line
    }

    /// Under two minutes in an ending quarter (2nd or 4th).
    pub fn two_min_drill(&self) -> bool {
        self.clock_seconds < TWO_MINUTE_WARNING && self.qtr % 2 == 0
    }

    pub fn score_differential(&self) -> i32 {
        let diff = i32::from(self.score_home) - i32::from(self.score_away);
        match self.possession {
            Possession::Home => diff,
            Possession::Away => -diff,
        }
    }

    /// Seconds left in the whole game, assuming regulation quarter lengths
    /// for the quarters not yet started. Overtime counts only its own clock.
    pub fn game_seconds_remaining(&self) -> u32 {
        let quarters_left = u32::from(4u8.saturating_sub(self.qtr));
        self.clock_seconds + quarters_left * QUARTER_SECONDS
    }

    pub fn half_seconds_remaining(&self) -> u32 {
        let extra = if self.qtr == 1 || self.qtr == 3 {
            QUARTER_SECONDS
        } else {
            0
        };
        self.clock_seconds + extra
    }

    /// The payload the prediction service scores. Timeouts are split into
    /// possessing/defending per the service's convention.
    pub fn to_snapshot(&self) -> GameSnapshot {
        let (pos_to, def_to) = match self.possession {
            Possession::Home => (self.timeouts_home, self.timeouts_away),
            Possession::Away => (self.timeouts_away, self.timeouts_home),
        };
        GameSnapshot {
            down: self.down,
            ydstogo: self.distance,
            yardline_100: self.yard_line,
            score_differential: self.score_differential(),
            qtr: self.qtr,
            game_seconds_remaining: self.game_seconds_remaining(),
            half_seconds_remaining: self.half_seconds_remaining(),
            posteam_timeouts_remaining: pos_to,
            defteam_timeouts_remaining: def_to,
            red_zone: u8::from(self.red_zone()),
            goal_to_go: u8::from(self.goal_to_go()),
            two_min_drill: u8::from(self.two_min_drill()),
        }
    }

    /// Build a full situation from a catalog scenario. Scenarios carry a
    /// score differential rather than a score pair; we anchor the defense at
    /// 21 and give the possessing (home) side the differential on top.
    pub fn from_scenario(state: &ScenarioState) -> Self {
        const ANCHOR_SCORE: i32 = 21;
        // Catalog entries carry whole-game seconds; fold into the current
        // quarter, keeping a full quarter at an exact boundary.
        let quarter_clock = match state.game_seconds_remaining % QUARTER_SECONDS {
            0 if state.game_seconds_remaining > 0 => QUARTER_SECONDS,
            rem => rem,
        };
        Self {
            qtr: state.qtr,
            clock_seconds: quarter_clock,
            play_clock_seconds: PLAY_CLOCK_RESET,
            clock_running: true,
            down: state.down,
            distance: state.ydstogo,
            yard_line: state.yardline_100,
            score_home: (ANCHOR_SCORE + state.score_differential).max(0) as u16,
            score_away: ANCHOR_SCORE as u16,
            possession: Possession::Home,
            timeouts_home: state.posteam_timeouts_remaining,
            timeouts_away: state.defteam_timeouts_remaining,
        }
    }
}

/// A typed partial update: `None` fields are left untouched, present fields
/// win (shallow merge, last write per field). Being a closed struct, there is
/// no way to smuggle an unknown or malformed field into the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldUpdate {
    pub qtr: Option<u8>,
    pub clock_seconds: Option<u32>,
    pub play_clock_seconds: Option<u32>,
    pub clock_running: Option<bool>,
    pub down: Option<u8>,
    pub distance: Option<u8>,
    pub yard_line: Option<u8>,
    pub score_home: Option<u16>,
    pub score_away: Option<u16>,
    pub possession: Option<Possession>,
    pub timeouts_home: Option<u8>,
    pub timeouts_away: Option<u8>,
}

/// Demo playback cursor: an ordered scenario list replayed cyclically.
#[derive(Debug, Default)]
struct DemoPlayback {
    scenarios: Vec<GameSituation>,
    next_index: usize,
    interval_ms: u64,
    active: bool,
}

/// Owner of the [`GameSituation`] and of every transition that mutates it:
/// the per-second tick, manual field updates, and demo-scenario playback.
///
/// This type is single-threaded by construction; the event loop in main.rs
/// is the serialization point, so a tick and a scenario replacement can
/// never interleave field-by-field.
#[derive(Debug)]
pub struct GameClock {
    situation: GameSituation,
    demo: DemoPlayback,
}

impl GameClock {
    pub fn new(initial: GameSituation) -> Self {
        Self {
            situation: initial,
            demo: DemoPlayback::default(),
        }
    }

    pub fn situation(&self) -> &GameSituation {
        &self.situation
    }

    /// Advance the clocks by one second. No-op while stopped.
    ///
    /// Both countdowns floor at zero; when the game clock reaches zero the
    /// running flag is dropped in the same update, so consumers never observe
    /// a running clock at 0:00.
    pub fn tick(&mut self) {
        if !self.situation.clock_running {
            return;
        }
        self.situation.clock_seconds = self.situation.clock_seconds.saturating_sub(1);
        self.situation.play_clock_seconds = self.situation.play_clock_seconds.saturating_sub(1);
        if self.situation.clock_seconds == 0 {
            self.situation.clock_running = false;
        }
    }

    /// Merge a manual update into the situation. Manual control always takes
    /// precedence over scripted playback, so any apply stops the demo.
    pub fn apply(&mut self, update: FieldUpdate) {
        self.stop_demo();
        let s = &mut self.situation;
        if let Some(v) = update.qtr {
            s.qtr = v;
        }
        if let Some(v) = update.clock_seconds {
            s.clock_seconds = v;
        }
        if let Some(v) = update.play_clock_seconds {
            s.play_clock_seconds = v;
        }
        if let Some(v) = update.clock_running {
            s.clock_running = v;
        }
        if let Some(v) = update.down {
            s.down = v;
        }
        if let Some(v) = update.distance {
            s.distance = v;
        }
        if let Some(v) = update.yard_line {
            s.yard_line = v;
        }
        if let Some(v) = update.score_home {
            s.score_home = v;
        }
        if let Some(v) = update.score_away {
            s.score_away = v;
        }
        if let Some(v) = update.possession {
            s.possession = v;
        }
        if let Some(v) = update.timeouts_home {
            s.timeouts_home = v;
        }
        if let Some(v) = update.timeouts_away {
            s.timeouts_away = v;
        }
    }

    /// Replace the whole situation at once (scenario load). Unlike [`apply`],
    /// this is also what demo playback uses, so it does not cancel playback.
    ///
    /// [`apply`]: GameClock::apply
    pub fn replace(&mut self, situation: GameSituation) {
        self.situation = situation;
    }

    pub fn reset_play_clock(&mut self, to: u32) {
        self.situation.play_clock_seconds = to;
    }

    /// Flip the running flag. Permitted at 0:00, though a tick will have no
    /// visible effect until a field update raises the clock again.
    pub fn toggle_clock_running(&mut self) {
        self.situation.clock_running = !self.situation.clock_running;
    }

    // -----------------------------------------------------------------------
    // Demo playback
    // -----------------------------------------------------------------------

    /// Arm cyclic playback over `scenarios`. Restarting always rewinds to the
    /// first entry. Returns false (and stays idle) for an empty list.
    pub fn start_demo(&mut self, scenarios: Vec<GameSituation>, interval_ms: u64) -> bool {
        if scenarios.is_empty() {
            return false;
        }
        self.demo = DemoPlayback {
            scenarios,
            next_index: 0,
            interval_ms,
            active: true,
        };
        true
    }

    /// Cancel playback. The last-applied scenario stays in place (no rollback).
    pub fn stop_demo(&mut self) {
        self.demo.active = false;
    }

    pub fn demo_active(&self) -> bool {
        self.demo.active
    }

    pub fn demo_interval_ms(&self) -> u64 {
        self.demo.interval_ms
    }

    /// Apply the next scheduled scenario, wrapping cyclically. Returns whether
    /// a replacement happened; a stopped demo swallows stale timer fires.
    pub fn demo_advance(&mut self) -> bool {
        if !self.demo.active || self.demo.scenarios.is_empty() {
            return false;
        }
        let idx = self.demo.next_index;
        self.situation = self.demo.scenarios[idx].clone();
        self.demo.next_index = (idx + 1) % self.demo.scenarios.len();
        true
    }
}

/// Format a countdown as MM:SS.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(clock_seconds: u32) -> GameClock {
        GameClock::new(GameSituation {
            clock_seconds,
            clock_running: true,
            ..GameSituation::default()
        })
    }

    #[test]
    fn tick_decrements_and_stays_running() {
        let mut clock = running(500);
        clock.tick();
        assert_eq!(clock.situation().clock_seconds, 499);
        assert!(clock.situation().clock_running);
    }

    #[test]
    fn tick_to_zero_stops_the_clock_atomically() {
        let mut clock = running(1);
        clock.tick();
        assert_eq!(clock.situation().clock_seconds, 0);
        assert!(!clock.situation().clock_running);
    }

    #[test]
    fn tick_at_zero_is_an_idempotent_floor() {
        let mut clock = running(1);
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.situation().clock_seconds, 0);
        assert!(!clock.situation().clock_running);
    }

    #[test]
    fn tick_is_a_noop_while_stopped() {
        let mut clock = running(300);
        clock.toggle_clock_running();
        clock.tick();
        assert_eq!(clock.situation().clock_seconds, 300);
        assert_eq!(clock.situation().play_clock_seconds, PLAY_CLOCK_RESET);
    }

    #[test]
    fn play_clock_floors_independently() {
        let mut clock = GameClock::new(GameSituation {
            clock_seconds: 500,
            play_clock_seconds: 2,
            clock_running: true,
            ..GameSituation::default()
        });
        for _ in 0..4 {
            clock.tick();
        }
        assert_eq!(clock.situation().play_clock_seconds, 0);
        assert_eq!(clock.situation().clock_seconds, 496);
        assert!(clock.situation().clock_running);
    }

    #[test]
    fn reset_play_clock_never_touches_game_clock() {
        let mut clock = running(321);
        clock.tick();
        clock.reset_play_clock(PLAY_CLOCK_RESET);
        assert_eq!(clock.situation().play_clock_seconds, 40);
        assert_eq!(clock.situation().clock_seconds, 320);
    }

    #[test]
    fn toggle_at_zero_is_permitted_but_invisible() {
        let mut clock = running(1);
        clock.tick();
        clock.toggle_clock_running();
        assert!(clock.situation().clock_running);
        clock.tick();
        assert_eq!(clock.situation().clock_seconds, 0);
        assert!(!clock.situation().clock_running);
    }

    #[test]
    fn full_quarter_runs_out() {
        let mut clock = GameClock::new(GameSituation {
            down: 1,
            distance: 10,
            clock_seconds: 800,
            qtr: 1,
            clock_running: true,
            ..GameSituation::default()
        });
        for _ in 0..800 {
            clock.tick();
        }
        assert_eq!(clock.situation().clock_seconds, 0);
        assert!(!clock.situation().clock_running);
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut clock = running(500);
        clock.apply(FieldUpdate {
            distance: Some(7),
            down: Some(3),
            ..FieldUpdate::default()
        });
        assert_eq!(clock.situation().distance, 7);
        assert_eq!(clock.situation().down, 3);
        assert_eq!(clock.situation().clock_seconds, 500);
        assert_eq!(clock.situation().score_home, 24);
    }

    #[test]
    fn red_zone_boundary() {
        let mut clock = running(500);
        clock.apply(FieldUpdate { yard_line: Some(20), ..FieldUpdate::default() });
        assert!(clock.situation().red_zone());
        clock.apply(FieldUpdate { yard_line: Some(21), ..FieldUpdate::default() });
        assert!(!clock.situation().red_zone());
    }

    #[test]
    fn goal_to_go_when_goal_line_is_closer_than_the_sticks() {
        let mut clock = running(500);
        clock.apply(FieldUpdate {
            yard_line: Some(4),
            distance: Some(4),
            ..FieldUpdate::default()
        });
        assert!(clock.situation().goal_to_go());
        clock.apply(FieldUpdate { yard_line: Some(5), ..FieldUpdate::default() });
        assert!(!clock.situation().goal_to_go());
    }

    #[test]
    fn two_minute_drill_only_in_ending_quarters() {
        let mut clock = running(119);
        clock.apply(FieldUpdate { qtr: Some(4), ..FieldUpdate::default() });
        assert!(clock.situation().two_min_drill());
        clock.apply(FieldUpdate { qtr: Some(3), ..FieldUpdate::default() });
        assert!(!clock.situation().two_min_drill());
        clock.apply(FieldUpdate {
            qtr: Some(2),
            clock_seconds: Some(120),
            ..FieldUpdate::default()
        });
        assert!(!clock.situation().two_min_drill());
    }

    fn demo_scenarios() -> Vec<GameSituation> {
        [(1u8, 10u8, 800u32, 1u8), (3, 8, 500, 3), (4, 1, 100, 4)]
            .into_iter()
            .map(|(down, distance, clock_seconds, qtr)| GameSituation {
                down,
                distance,
                clock_seconds,
                qtr,
                ..GameSituation::default()
            })
            .collect()
    }

    #[test]
    fn demo_playback_wraps_cyclically() {
        let scenarios = demo_scenarios();
        let mut clock = running(500);
        assert!(clock.start_demo(scenarios.clone(), 4000));

        for k in 0..7 {
            assert!(clock.demo_advance());
            assert_eq!(clock.situation(), &scenarios[k % 3]);
        }
    }

    #[test]
    fn demo_restart_rewinds_to_first_scenario() {
        let scenarios = demo_scenarios();
        let mut clock = running(500);
        clock.start_demo(scenarios.clone(), 4000);
        clock.demo_advance();
        clock.demo_advance();
        clock.stop_demo();

        clock.start_demo(scenarios.clone(), 4000);
        clock.demo_advance();
        assert_eq!(clock.situation(), &scenarios[0]);
    }

    #[test]
    fn stopping_demo_freezes_last_applied_scenario() {
        let scenarios = demo_scenarios();
        let mut clock = running(500);
        clock.start_demo(scenarios.clone(), 4000);
        clock.demo_advance();
        clock.stop_demo();

        // A stale timer fire after cancellation must not mutate anything.
        assert!(!clock.demo_advance());
        assert_eq!(clock.situation(), &scenarios[0]);
    }

    #[test]
    fn manual_update_stops_demo_playback() {
        let mut clock = running(500);
        clock.start_demo(demo_scenarios(), 4000);
        clock.demo_advance();

        clock.apply(FieldUpdate { distance: Some(2), ..FieldUpdate::default() });
        assert!(!clock.demo_active());
        let frozen = clock.situation().clone();
        assert!(!clock.demo_advance());
        assert_eq!(clock.situation(), &frozen);
    }

    #[test]
    fn empty_scenario_list_never_arms_playback() {
        let mut clock = running(500);
        assert!(!clock.start_demo(Vec::new(), 4000));
        assert!(!clock.demo_active());
        assert!(!clock.demo_advance());
    }

    #[test]
    fn snapshot_reflects_possession() {
        let mut situation = GameSituation {
            timeouts_away: 1,
            ..GameSituation::default()
        };
        let snap = situation.to_snapshot();
        assert_eq!(snap.score_differential, 3);
        assert_eq!(snap.posteam_timeouts_remaining, 3);
        assert_eq!(snap.defteam_timeouts_remaining, 1);

        situation.possession = Possession::Away;
        let snap = situation.to_snapshot();
        assert_eq!(snap.score_differential, -3);
        assert_eq!(snap.posteam_timeouts_remaining, 1);
        assert_eq!(snap.defteam_timeouts_remaining, 3);
    }

    #[test]
    fn snapshot_counts_remaining_quarters() {
        let situation = GameSituation {
            qtr: 3,
            clock_seconds: 525,
            ..GameSituation::default()
        };
        let snap = situation.to_snapshot();
        assert_eq!(snap.game_seconds_remaining, 525 + 900);
        assert_eq!(snap.half_seconds_remaining, 525 + 900);
        assert_eq!(snap.two_min_drill, 0);
    }

    #[test]
    fn scenario_maps_to_full_situation() {
        let scenario = ScenarioState {
            down: 4,
            ydstogo: 8,
            yardline_100: 70,
            score_differential: 4,
            qtr: 4,
            game_seconds_remaining: 120,
            posteam_timeouts_remaining: 2,
            defteam_timeouts_remaining: 3,
        };
        let situation = GameSituation::from_scenario(&scenario);
        assert_eq!(situation.down, 4);
        assert_eq!(situation.clock_seconds, 120);
        assert_eq!(situation.score_home, 25);
        assert_eq!(situation.score_away, 21);
        assert_eq!(situation.timeouts_home, 2);
        assert!(situation.two_min_drill());
    }

    #[test]
    fn clock_formats_as_minutes_and_seconds() {
        assert_eq!(format_clock(525), "08:45");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(900), "15:00");
    }
}
