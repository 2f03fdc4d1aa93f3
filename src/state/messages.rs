use crate::state::network::LoadingState;
use coach_api::{Advice, DemoScenario, GameSnapshot};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    PredictFourthDown { snapshot: GameSnapshot },
    PredictOffensive { snapshot: GameSnapshot },
    PredictDefensive { snapshot: GameSnapshot },
    LoadScenarios,
    CheckHealth,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    AdviceLoaded { advice: Advice },
    ScenariosLoaded { scenarios: Vec<DemoScenario> },
    HealthChecked { models: Vec<String> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// One-second game-clock tick.
    ClockTick,
    /// Demo playback timer fired — advance to the next scripted scenario.
    DemoAdvance,
}
