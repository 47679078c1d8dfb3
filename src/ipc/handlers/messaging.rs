use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::message::build_send_link;
use crate::normalize::clean_str;
use serde_json::json;

/// Build per-student deep links for the bulk-messaging view. Selection is
/// by display name (all students when no names are given); students
/// without a phone number are reported back as skipped rather than
/// silently dropped.
fn handle_build_links(state: &mut AppState, req: &Request) -> serde_json::Value {
    let template = req
        .params
        .get("template")
        .and_then(|v| v.as_str())
        .unwrap_or(&state.config.message_template)
        .to_string();

    let selected_names: Option<Vec<String>> = req.params.get("names").and_then(|v| {
        v.as_array().map(|items| {
            items
                .iter()
                .filter_map(|n| n.as_str())
                .map(|n| clean_str(n).to_lowercase())
                .collect()
        })
    });

    let mut links = Vec::new();
    let mut skipped = Vec::new();
    for student in state.roster.roster() {
        if let Some(names) = &selected_names {
            if !names.contains(&student.display_name.to_lowercase()) {
                continue;
            }
        }
        match build_send_link(
            &state.config.link_scheme,
            &state.config.country_code,
            &student.phone,
            &student.display_name,
            student.total_score,
            &template,
        ) {
            Some(url) => links.push(json!({
                "name": student.display_name,
                "phone": student.phone,
                "url": url,
            })),
            None => skipped.push(student.display_name.clone()),
        }
    }

    ok(&req.id, json!({ "links": links, "skipped": skipped }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "messages.buildLinks" => Some(handle_build_links(state, req)),
        _ => None,
    }
}
