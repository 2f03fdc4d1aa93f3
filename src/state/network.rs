use crate::state::messages::{NetworkRequest, NetworkResponse};
use coach_api::client::{ApiError, CoachApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns the prediction-service client and drains the request channel one
/// request at a time. Every request produces exactly one response (errors
/// included), so the UI loop never waits on a request that went nowhere.
pub struct NetworkWorker {
    client: CoachApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: CoachApi::new(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::PredictFourthDown { snapshot } => {
                    self.handle_fourth_down(snapshot).await
                }
                NetworkRequest::PredictOffensive { snapshot } => {
                    self.handle_offensive(snapshot).await
                }
                NetworkRequest::PredictDefensive { snapshot } => {
                    self.handle_defensive(snapshot).await
                }
                NetworkRequest::LoadScenarios => self.handle_load_scenarios().await,
                NetworkRequest::CheckHealth => self.handle_check_health().await,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_fourth_down(
        &self,
        snapshot: coach_api::GameSnapshot,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("requesting 4th-down recommendation");
        let advice = self.client.predict_fourth_down(&snapshot).await?;
        Ok(NetworkResponse::AdviceLoaded {
            advice: coach_api::Advice::FourthDown(advice),
        })
    }

    async fn handle_offensive(
        &self,
        snapshot: coach_api::GameSnapshot,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("requesting offensive play call");
        let advice = self.client.predict_offensive(&snapshot).await?;
        Ok(NetworkResponse::AdviceLoaded {
            advice: coach_api::Advice::Offensive(advice),
        })
    }

    async fn handle_defensive(
        &self,
        snapshot: coach_api::GameSnapshot,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("requesting defensive alignment");
        let advice = self.client.predict_defensive(&snapshot).await?;
        Ok(NetworkResponse::AdviceLoaded {
            advice: coach_api::Advice::Defensive(advice),
        })
    }

    async fn handle_load_scenarios(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading demo scenario catalog");
        let scenarios = self.client.fetch_scenarios().await?;
        Ok(NetworkResponse::ScenariosLoaded { scenarios })
    }

    async fn handle_check_health(&self) -> Result<NetworkResponse, ApiError> {
        debug!("checking prediction service health");
        let models = self.client.health().await?;
        Ok(NetworkResponse::HealthChecked { models })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
