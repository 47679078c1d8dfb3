use serde::{Deserialize, Serialize};

use crate::normalize::clean_str;
use crate::roster::Student;

/// Look a student up by credential id, email, or real name,
/// case-insensitively. Roster order decides between multiple matches; the
/// id → email → name check order per student is fixed for
/// reproducibility. `None` is the normal negative result, not an error.
pub fn authenticate<'a>(roster: &'a [Student], identifier: &str) -> Option<&'a Student> {
    let cleaned = clean_str(identifier);
    if cleaned.is_empty() {
        return None;
    }
    let lower = cleaned.to_lowercase();

    roster.iter().find(|s| {
        let matches = |field: &str| !field.is_empty() && clean_str(field).to_lowercase() == lower;
        matches(&s.credential_id) || matches(&s.email) || matches(&s.display_name)
    })
}

/// Shared-secret admin gate. A static secret by design; hardening is an
/// explicit non-goal of this system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminGate {
    /// Bare login code that grants an admin session with no student record.
    pub access_code: String,
    /// Students whose joined email equals this are flagged as admins.
    pub email: String,
    /// Password checked when toggling admin mode in the frontend.
    pub password: String,
}

impl Default for AdminGate {
    fn default() -> AdminGate {
        AdminGate {
            access_code: "7".to_string(),
            email: String::new(),
            password: "1234".to_string(),
        }
    }
}

impl AdminGate {
    pub fn is_access_code(&self, identifier: &str) -> bool {
        let cleaned = clean_str(identifier);
        !self.access_code.is_empty() && cleaned == self.access_code
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        !self.email.is_empty() && email.eq_ignore_ascii_case(&self.email)
    }

    pub fn verify_password(&self, password: &str) -> bool {
        password == self.password
    }
}
