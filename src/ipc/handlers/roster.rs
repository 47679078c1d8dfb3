use crate::ipc::error::{err, ok};
use crate::ipc::handlers::required_str;
use crate::ipc::types::{AppState, Request};
use crate::normalize::clean_str;
use serde_json::json;

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let students = serde_json::to_value(state.roster.roster()).unwrap_or_else(|_| json!([]));
    ok(
        &req.id,
        json!({
            "students": students,
            "lastUpdated": state.roster.last_updated().map(|t| t.to_rfc3339()),
            "seq": state.roster.committed_seq(),
        }),
    )
}

fn handle_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let lower = clean_str(&name).to_lowercase();

    let found = state
        .roster
        .roster()
        .iter()
        .find(|s| s.display_name.to_lowercase() == lower);
    match found {
        Some(student) => {
            let value = serde_json::to_value(student).unwrap_or_else(|_| json!(null));
            ok(&req.id, json!({ "student": value }))
        }
        None => err(
            &req.id,
            "not_found",
            "student not found",
            Some(json!({ "name": name })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.get" => Some(handle_get(state, req)),
        "roster.student" => Some(handle_student(state, req)),
        _ => None,
    }
}
