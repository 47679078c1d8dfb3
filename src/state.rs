use chrono::{DateTime, Utc};

use crate::roster::Student;

/// Single owner of the committed roster snapshot.
///
/// Refreshes are sequence-numbered: the frontend asks for a sequence
/// number when a fetch starts and presents it when committing the built
/// roster. A commit whose sequence is not newer than the last committed
/// one lost the race to a later refresh and is discarded, so overlapping
/// refreshes resolve last-begun-wins and a stale in-flight result can
/// never clobber a newer snapshot. Failed refreshes never touch the
/// committed roster.
#[derive(Debug, Default)]
pub struct RosterState {
    next_seq: u64,
    committed_seq: u64,
    roster: Vec<Student>,
    last_updated: Option<DateTime<Utc>>,
}

impl RosterState {
    pub fn new() -> RosterState {
        RosterState::default()
    }

    /// Issue the sequence number for a refresh that is starting now.
    pub fn begin(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Commit a built roster. Returns false (state untouched) when a
    /// refresh that began later has already committed.
    pub fn commit(&mut self, seq: u64, roster: Vec<Student>) -> bool {
        if seq <= self.committed_seq {
            tracing::debug!(seq, committed = self.committed_seq, "discarding stale refresh");
            return false;
        }
        self.committed_seq = seq;
        self.roster = roster;
        self.last_updated = Some(Utc::now());
        tracing::debug!(seq, students = self.roster.len(), "roster committed");
        true
    }

    pub fn roster(&self) -> &[Student] {
        &self.roster
    }

    pub fn committed_seq(&self) -> u64 {
        self.committed_seq
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Palette;
    use crate::roster::build_roster;
    use crate::sheet::Sheet;

    fn roster_of(names_scores: &str) -> Vec<Student> {
        let text = format!("name,total\n{names_scores}");
        let sheet = Sheet::from_csv_text(&text).expect("parse");
        build_roster(&sheet, None, &Palette::builtin()).expect("build")
    }

    #[test]
    fn begin_issues_increasing_sequences() {
        let mut state = RosterState::new();
        let a = state.begin();
        let b = state.begin();
        assert!(b > a);
    }

    #[test]
    fn commit_replaces_snapshot() {
        let mut state = RosterState::new();
        let seq = state.begin();
        assert!(state.commit(seq, roster_of("Anna,50\n")));
        assert_eq!(state.roster().len(), 1);
        assert_eq!(state.committed_seq(), seq);
        assert!(state.last_updated().is_some());
    }

    #[test]
    fn stale_commit_is_discarded() {
        let mut state = RosterState::new();
        let old = state.begin();
        let new = state.begin();

        // The refresh that began later resolves first.
        assert!(state.commit(new, roster_of("Anna,50\nBen,80\n")));
        // The earlier one resolves late and must be dropped.
        assert!(!state.commit(old, roster_of("Stale,1\n")));

        assert_eq!(state.roster().len(), 2);
        assert_eq!(state.committed_seq(), new);
    }

    #[test]
    fn reusing_a_committed_sequence_is_rejected() {
        let mut state = RosterState::new();
        let seq = state.begin();
        assert!(state.commit(seq, roster_of("Anna,50\n")));
        assert!(!state.commit(seq, roster_of("Dup,2\n")));
        assert_eq!(state.roster()[0].display_name, "Anna");
    }
}
