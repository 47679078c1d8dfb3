use std::collections::HashSet;

use crate::normalize::parse_num;
use crate::sheet::Sheet;

// Header keyword sets for the deployed sheets: Hebrew terms plus the
// English synonyms that show up when a sheet is copied or re-exported.
pub const NAME_KEYWORDS: &[&str] = &["שם", "name"];
pub const SCORE_KEYWORDS: &[&str] = &["סך", "ניקוד", "total", "score"];
pub const COMMENT_KEYWORDS: &[&str] = &["הערה", "note", "comment"];
pub const ID_KEYWORDS: &[&str] = &["זהות", "תז", "id", "tz"];
pub const EMAIL_KEYWORDS: &[&str] = &["email", "mail", "אימייל"];
pub const PHONE_KEYWORDS: &[&str] = &["טלפון", "phone", "נייד", "mobile", "tel", "whatsapp"];

/// First header (in header order) whose lowercase form contains any
/// keyword as a substring. Real sheets phrase headers inconsistently, so
/// the match is deliberately substring, not exact.
pub fn find_column<'a>(headers: &'a [String], keywords: &[&str]) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| {
            let lower = h.to_lowercase();
            keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
        })
        .map(|h| h.as_str())
}

/// Resolved column roles for the scores sheet.
#[derive(Debug, Clone)]
pub struct ScoreColumns {
    pub name: String,
    pub score: Option<String>,
    pub comments: HashSet<String>,
    pub tasks: Vec<String>,
    pub weekly: Option<String>,
}

impl ScoreColumns {
    /// Resolve roles against the sheet's headers. A missing name column is
    /// the caller's fatal error; a missing score column only degrades
    /// totals to zero.
    ///
    /// The weekly column is the right-most task column with at least one
    /// nonzero value across the rows. That is a recency heuristic (latest
    /// graded task stands in for "this week"), not a date rule; it can
    /// pick an unrelated later column when an earlier task is re-graded.
    pub fn resolve(sheet: &Sheet) -> Option<ScoreColumns> {
        let name = find_column(&sheet.headers, NAME_KEYWORDS)?.to_string();
        let score = find_column(&sheet.headers, SCORE_KEYWORDS).map(|s| s.to_string());

        let comments: HashSet<String> = sheet
            .headers
            .iter()
            .filter(|h| {
                let lower = h.to_lowercase();
                COMMENT_KEYWORDS
                    .iter()
                    .any(|kw| lower.contains(&kw.to_lowercase()))
            })
            .cloned()
            .collect();

        let tasks: Vec<String> = sheet
            .headers
            .iter()
            .filter(|h| {
                if h.trim().is_empty() {
                    return false;
                }
                if **h == name {
                    return false;
                }
                if score.as_deref() == Some(h.as_str()) {
                    return false;
                }
                !comments.contains(h.as_str())
            })
            .cloned()
            .collect();

        let weekly = tasks
            .iter()
            .rev()
            .find(|col| {
                sheet
                    .rows
                    .iter()
                    .any(|row| parse_num(row.get(col.as_str())) != 0.0)
            })
            .cloned();

        Some(ScoreColumns {
            name,
            score,
            comments,
            tasks,
            weekly,
        })
    }
}

/// Resolved column roles for the credentials sheet. Every role is
/// optional; an unresolved role just yields empty joined fields.
#[derive(Debug, Clone, Default)]
pub struct CredentialColumns {
    pub name: Option<String>,
    pub id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CredentialColumns {
    pub fn resolve(sheet: &Sheet) -> CredentialColumns {
        CredentialColumns {
            name: find_column(&sheet.headers, NAME_KEYWORDS).map(|s| s.to_string()),
            id: find_column(&sheet.headers, ID_KEYWORDS).map(|s| s.to_string()),
            email: find_column(&sheet.headers, EMAIL_KEYWORDS).map(|s| s.to_string()),
            phone: find_column(&sheet.headers, PHONE_KEYWORDS).map(|s| s.to_string()),
        }
    }
}
