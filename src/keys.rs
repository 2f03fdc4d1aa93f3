use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut refresh_predictions = false;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Field),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Advice),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Scenarios),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Clock control
        (_, Char(' '), _) => guard.toggle_clock_running(),
        (_, Char('p'), _) => guard.reset_play_clock(),

        // Demo playback + prediction refresh
        (_, Char('d'), _) => guard.toggle_demo(),
        (_, Char('r'), _) => refresh_predictions = true,

        // Field editing
        (MenuItem::Field, Char('k') | KeyCode::Up, _) => guard.advance_ball(),
        (MenuItem::Field, Char('j') | KeyCode::Down, _) => guard.retreat_ball(),
        (MenuItem::Field, Char('h') | KeyCode::Left, _) => guard.shorten_distance(),
        (MenuItem::Field, Char('l') | KeyCode::Right, _) => guard.lengthen_distance(),
        (MenuItem::Field, Char('n'), _) => guard.cycle_down(),
        (MenuItem::Field, Char('b'), _) => guard.cycle_quarter(),
        (MenuItem::Field, Char('['), _) => guard.nudge_clock(-15),
        (MenuItem::Field, Char(']'), _) => guard.nudge_clock(15),
        (MenuItem::Field, Char('m'), _) => guard.flip_possession(),
        (MenuItem::Field, Char('g'), _) => {
            guard.score_field_goal();
            refresh_predictions = true;
        }
        (MenuItem::Field, Char('t'), _) => {
            guard.score_touchdown();
            refresh_predictions = true;
        }
        (MenuItem::Field, Char('o'), _) => guard.use_timeout(),

        // Situation save / restore
        (MenuItem::Field, Char('w'), _) => {
            if let Err(e) = guard.save_state_file() {
                warn!("situation save failed: {e}");
                guard.on_error(e);
            }
        }
        (MenuItem::Field, Char('e'), _) => match guard.load_state_file() {
            Ok(()) => refresh_predictions = true,
            Err(e) => {
                warn!("situation load failed: {e}");
                guard.on_error(e);
            }
        },

        // Scenario catalog
        (MenuItem::Scenarios, Char('j') | KeyCode::Down, _) => guard.state.catalog.navigate_down(),
        (MenuItem::Scenarios, Char('k') | KeyCode::Up, _) => guard.state.catalog.navigate_up(),
        (MenuItem::Scenarios, KeyCode::Enter, _) => {
            if guard.apply_selected_scenario() {
                refresh_predictions = true;
            }
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if refresh_predictions {
        let snapshot = guard.snapshot();
        drop(guard);
        crate::request_predictions(network_requests, snapshot).await;
    }
}
