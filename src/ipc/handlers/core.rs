use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "studentCount": state.roster.roster().len(),
            "lastUpdated": state.roster.last_updated().map(|t| t.to_rfc3339()),
            "seq": state.roster.committed_seq(),
        }),
    )
}

fn handle_config_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "refreshMinutes": state.config.refresh_minutes,
            "countryCode": state.config.country_code,
            "linkScheme": state.config.link_scheme,
            "messageTemplate": state.config.message_template,
            "paletteSize": state.config.palette().len(),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "config.get" => Some(handle_config_get(state, req)),
        _ => None,
    }
}
