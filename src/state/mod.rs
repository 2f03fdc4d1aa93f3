pub mod app_settings;
pub mod app_state;
pub mod feed;
pub mod game_clock;
pub mod messages;
pub mod network;
pub mod ticker;
