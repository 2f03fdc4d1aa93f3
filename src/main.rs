mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::feed::{FeedEvent, FeedWorker};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::ticker::{ClockTicker, ScenarioPlayer};
use coach_api::GameSnapshot;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Warn)?;
    tui_logger::set_default_level(log::LevelFilter::Warn);

    let app = Arc::new(Mutex::new(App::new()));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (feed_evt_tx, feed_evt_rx) = mpsc::channel::<FeedEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Position feed thread
    let feed_endpoint = {
        let guard = app.lock().await;
        guard.settings.feed_endpoint.clone()
    };
    let feed_worker = FeedWorker { url: feed_endpoint, events: feed_evt_tx };
    let feed_task = tokio::spawn(feed_worker.run());

    // Game clock heartbeat — 1 Hz
    let clock_ticker = ClockTicker::new(ui_event_tx.clone());
    let ticker_task = tokio::spawn(clock_ticker.run());

    // Trigger scenario catalog + health check on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_tx,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        feed_evt_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    feed_task.abort();
    ticker_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("coachtui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "coachtui - sideline decision dashboard for the terminal

Usage:
  coachtui
  coachtui --help
  coachtui --version

Environment:
  COACHTUI_API              Prediction service base URL (default http://127.0.0.1:8000)
  COACHTUI_SCENARIOS_JSON   Path to a local scenario catalog JSON
  COACHTUI_STATE_JSON       Path for saved game situations
  COACHTUI_FEED_WS          Position feed websocket URL (default ws://127.0.0.1:8765)
  COACHTUI_DEMO_MS          Demo playback interval in milliseconds (default 4000)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    ui_event_tx: mpsc::Sender<UiEvent>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut feed_events: mpsc::Receiver<FeedEvent>,
) {
    let mut loading = LoadingState::default();
    // The demo playback timer lives only while playback is armed; stopping
    // playback aborts it rather than letting a stale timer keep firing.
    let mut demo_player: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                sync_demo_player(&app, &ui_event_tx, &mut demo_player).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(feed_event) = feed_events.recv() => {
                let should_redraw = handle_feed_event(feed_event, &app).await;
                sync_demo_player(&app, &ui_event_tx, &mut demo_player).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

/// Reconcile the demo timer task with the clock's playback flag: spawn it
/// when playback was just armed, abort it when playback stopped (whether by
/// the d key, a manual edit, or a feed update).
async fn sync_demo_player(
    app: &Arc<Mutex<App>>,
    ui_event_tx: &mpsc::Sender<UiEvent>,
    demo_player: &mut Option<JoinHandle<()>>,
) {
    let (active, interval_ms) = {
        let guard = app.lock().await;
        (guard.state.clock.demo_active(), guard.state.clock.demo_interval_ms())
    };

    match (active, demo_player.as_ref()) {
        (true, None) => {
            let player = ScenarioPlayer::new(ui_event_tx.clone(), interval_ms);
            *demo_player = Some(tokio::spawn(player.run()));
        }
        (false, Some(_)) => {
            if let Some(handle) = demo_player.take() {
                handle.abort();
            }
        }
        _ => {}
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests.send(NetworkRequest::CheckHealth).await;
            let _ = network_requests.send(NetworkRequest::LoadScenarios).await;
            let snapshot = {
                let guard = app.lock().await;
                guard.snapshot()
            };
            request_predictions(network_requests, snapshot).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::ClockTick => {
            let mut guard = app.lock().await;
            guard.on_clock_tick();
            true
        }
        UiEvent::DemoAdvance => {
            let mut guard = app.lock().await;
            if guard.on_demo_advance() {
                let snapshot = guard.snapshot();
                drop(guard);
                request_predictions(network_requests, snapshot).await;
            }
            true
        }
    }
}

pub async fn request_predictions(
    network_requests: &mpsc::Sender<NetworkRequest>,
    snapshot: GameSnapshot,
) {
    let _ = network_requests
        .send(NetworkRequest::PredictFourthDown { snapshot: snapshot.clone() })
        .await;
    let _ = network_requests
        .send(NetworkRequest::PredictOffensive { snapshot: snapshot.clone() })
        .await;
    let _ = network_requests
        .send(NetworkRequest::PredictDefensive { snapshot })
        .await;
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::AdviceLoaded { advice } => {
            let mut guard = app.lock().await;
            guard.on_advice_loaded(advice);
        }
        NetworkResponse::ScenariosLoaded { scenarios } => {
            let mut guard = app.lock().await;
            guard.on_scenarios_loaded(scenarios);
        }
        NetworkResponse::HealthChecked { models } => {
            let mut guard = app.lock().await;
            guard.on_health_checked(models);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn handle_feed_event(event: FeedEvent, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;
    match event {
        FeedEvent::Connected => guard.on_feed_connected(),
        FeedEvent::Disconnected => guard.on_feed_disconnected(),
        FeedEvent::Update(msg) => guard.on_feed_update(msg),
        FeedEvent::Error(message) => guard.on_feed_error(message),
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
