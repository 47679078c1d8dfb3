use serde::Deserialize;

use crate::config::Config;
use crate::state::RosterState;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub roster: RosterState,
}

impl AppState {
    pub fn new(config: Config) -> AppState {
        AppState {
            config,
            roster: RosterState::new(),
        }
    }
}
