use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::columns::{CredentialColumns, ScoreColumns};
use crate::identity::{assign_identities, Identity, Palette};
use crate::normalize::parse_num;
use crate::sheet::Sheet;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("scores sheet has no rows")]
    SheetEmpty,
    #[error("no header matches the name keyword set")]
    NoNameColumn,
}

impl RosterError {
    /// Stable code for the IPC error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::SheetEmpty => "sheet_empty",
            RosterError::NoNameColumn => "no_name_column",
        }
    }
}

/// One task cell for one student. `note` is the neighboring comment
/// column's value when the header immediately after the task column is a
/// comment column; the pairing is strictly positional.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskScore {
    pub column: String,
    pub score: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub icon: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub display_name: String,
    pub code_name: String,
    pub icon: String,
    pub credential_id: String,
    pub email: String,
    pub phone: String,
    pub total_score: f64,
    pub rank: usize,
    pub weekly_score: f64,
    pub is_weekly_champion: bool,
    pub task_breakdown: Vec<TaskScore>,
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, Default)]
struct JoinedCredentials {
    id: String,
    email: String,
    phone: String,
}

/// Lowercase-name-keyed credentials lookup. Credential rows that never
/// appear in the scores sheet are simply ignored; no orphan students are
/// synthesized from credentials alone.
fn build_credentials_map(sheet: &Sheet) -> HashMap<String, JoinedCredentials> {
    let cols = CredentialColumns::resolve(sheet);
    let mut map = HashMap::new();
    let Some(name_col) = cols.name.as_deref() else {
        return map;
    };
    for row in &sheet.rows {
        let name = row.cleaned(name_col);
        if name.is_empty() {
            continue;
        }
        let creds = JoinedCredentials {
            id: cols.id.as_deref().map(|c| row.cleaned(c)).unwrap_or_default(),
            email: cols
                .email
                .as_deref()
                .map(|c| row.cleaned(c).to_lowercase())
                .unwrap_or_default(),
            phone: cols
                .phone
                .as_deref()
                .map(|c| row.cleaned(c))
                .unwrap_or_default(),
        };
        map.insert(name.to_lowercase(), creds);
    }
    map
}

/// Build the ranked, badge-annotated roster from the two sheets.
///
/// The credentials sheet is optional: when the upstream fetch failed the
/// roster is still built with empty joins. The scores sheet is not — an
/// empty sheet or an unresolvable name column fails the refresh so the
/// caller can keep serving the previous snapshot.
pub fn build_roster(
    scores: &Sheet,
    credentials: Option<&Sheet>,
    palette: &Palette,
) -> Result<Vec<Student>, RosterError> {
    if scores.is_empty() {
        return Err(RosterError::SheetEmpty);
    }
    let cols = ScoreColumns::resolve(scores).ok_or(RosterError::NoNameColumn)?;

    let creds_map = match credentials {
        Some(sheet) => build_credentials_map(sheet),
        None => {
            tracing::warn!("credentials sheet unavailable, building roster with empty joins");
            HashMap::new()
        }
    };

    let identity_map = assign_identities(
        scores.rows.iter().map(|row| {
            row.get(&cols.name).unwrap_or("")
        }),
        palette,
    );

    let mut students: Vec<Student> = Vec::with_capacity(scores.rows.len());
    for row in &scores.rows {
        let name = row.cleaned(&cols.name);
        if name.is_empty() {
            continue;
        }

        let total_score = cols
            .score
            .as_deref()
            .map(|c| parse_num(row.get(c)))
            .unwrap_or(0.0);
        let weekly_score = cols
            .weekly
            .as_deref()
            .map(|c| parse_num(row.get(c)))
            .unwrap_or(0.0);

        let identity = identity_map
            .get(&name)
            .cloned()
            .unwrap_or_else(Identity::unknown);
        let creds = creds_map.get(&name.to_lowercase()).cloned().unwrap_or_default();

        let task_breakdown = cols
            .tasks
            .iter()
            .map(|col| {
                let note = scores
                    .headers
                    .iter()
                    .position(|h| h == col)
                    .and_then(|idx| scores.headers.get(idx + 1))
                    .filter(|next| cols.comments.contains(next.as_str()))
                    .map(|next| row.cleaned(next))
                    .unwrap_or_default();
                TaskScore {
                    column: col.clone(),
                    score: parse_num(row.get(col)),
                    note,
                }
            })
            .collect();

        students.push(Student {
            display_name: name,
            code_name: identity.code_name,
            icon: identity.icon,
            credential_id: creds.id,
            email: creds.email,
            phone: creds.phone,
            total_score,
            rank: 0,
            weekly_score,
            is_weekly_champion: false,
            task_breakdown,
            badges: Vec::new(),
        });
    }

    // Stable sort, total descending; ties keep source row order.
    students.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(Ordering::Equal)
    });
    for (i, s) in students.iter_mut().enumerate() {
        s.rank = i + 1;
    }

    let max_weekly = students
        .iter()
        .map(|s| s.weekly_score)
        .fold(0.0_f64, f64::max);
    if max_weekly > 0.0 {
        for s in &mut students {
            s.is_weekly_champion = s.weekly_score == max_weekly;
        }
    }

    for s in &mut students {
        if s.is_weekly_champion {
            s.badges.push(Badge {
                icon: "👑".to_string(),
                label: "Weekly Champion".to_string(),
            });
        }
        if s.rank <= 3 {
            s.badges.push(Badge {
                icon: "🔥".to_string(),
                label: "Top Performer".to_string(),
            });
        }
        if !s.is_weekly_champion && max_weekly > 0.0 && s.weekly_score >= 0.8 * max_weekly {
            s.badges.push(Badge {
                icon: "🚀".to_string(),
                label: "Rising This Week".to_string(),
            });
        }
    }

    Ok(students)
}
