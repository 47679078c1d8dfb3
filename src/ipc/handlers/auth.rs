use crate::auth::authenticate;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

/// Login resolution order matches the frontend flow: the bare admin
/// access code grants an admin session with no student record, then the
/// roster lookup runs. A miss is a normal negative result, not an error.
fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let identifier = req
        .params
        .get("identifier")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if state.config.admin.is_access_code(identifier) {
        return ok(&req.id, json!({ "student": null, "isAdmin": true }));
    }

    match authenticate(state.roster.roster(), identifier) {
        Some(student) => {
            let is_admin = state.config.admin.is_admin_email(&student.email);
            let value = serde_json::to_value(student).unwrap_or_else(|_| json!(null));
            ok(&req.id, json!({ "student": value, "isAdmin": is_admin }))
        }
        None => ok(&req.id, json!({ "student": null, "isAdmin": false })),
    }
}

fn handle_admin_verify(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing password", None);
    };
    let granted = state.config.admin.verify_password(password);
    ok(&req.id, json!({ "granted": granted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.adminVerify" => Some(handle_admin_verify(state, req)),
        _ => None,
    }
}
