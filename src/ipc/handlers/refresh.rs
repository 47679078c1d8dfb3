use crate::ipc::error::{err, ok};
use crate::ipc::handlers::required_str;
use crate::ipc::types::{AppState, Request};
use crate::roster::build_roster;
use crate::sheet::Sheet;
use serde_json::json;

fn handle_begin(state: &mut AppState, req: &Request) -> serde_json::Value {
    let seq = state.roster.begin();
    ok(&req.id, json!({ "seq": seq }))
}

/// Parse the fetched CSV payloads, rebuild the roster, and commit it under
/// the caller's sequence number. Every failure leaves the previously
/// committed roster in place; only the credentials sheet is allowed to be
/// missing or broken without failing the cycle.
fn handle_commit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let scores_csv = match required_str(req, "scoresCsv") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let seq = match req.params.get("seq").and_then(|v| v.as_u64()) {
        Some(v) => v,
        // Single-shot refresh: nobody raced us, issue a fresh number.
        None => state.roster.begin(),
    };

    let scores = match Sheet::from_csv_text(&scores_csv) {
        Ok(sheet) => sheet,
        Err(e) => return err(&req.id, "sheet_parse_failed", e.to_string(), None),
    };

    let credentials = match req.params.get("credentialsCsv").and_then(|v| v.as_str()) {
        Some(text) => match Sheet::from_csv_text(text) {
            Ok(sheet) => Some(sheet),
            Err(e) => {
                tracing::warn!(error = %e, "credentials sheet failed to parse, joining empty");
                None
            }
        },
        None => None,
    };

    let roster = match build_roster(&scores, credentials.as_ref(), &state.config.palette()) {
        Ok(roster) => roster,
        Err(e) => return err(&req.id, e.code(), e.to_string(), None),
    };

    let committed = state.roster.commit(seq, roster);
    ok(
        &req.id,
        json!({
            "committed": committed,
            "seq": seq,
            "studentCount": state.roster.roster().len(),
            "lastUpdated": state.roster.last_updated().map(|t| t.to_rfc3339()),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "refresh.begin" => Some(handle_begin(state, req)),
        "refresh.commit" => Some(handle_commit(state, req)),
        _ => None,
    }
}
