use chrono::Utc;

use crate::error::{Result, SplitError};
use crate::schemas::{new_id, Participant};

/// Display name for ids that are not on the roster.
pub const UNKNOWN_NAME: &str = "Unknown";

/// The participants of the group, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_participants(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn contains(&self, id: &str) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    pub fn add(&mut self, name: &str) -> Result<Participant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SplitError::invalid_input("participant name is empty"));
        }
        let participant = Participant {
            id: self.unused_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Returns whether anyone was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        self.participants.len() != before
    }

    pub fn get_name(&self, id: &str) -> String {
        self.participants
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string())
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }

    // Decoded rosters may carry ids of any shape, so fresh ones are checked.
    fn unused_id(&self) -> String {
        loop {
            let id = new_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_appended_in_order() {
        let mut roster = Roster::new();
        roster.add("  Ana ").unwrap();
        roster.add("Ben").unwrap();

        let names: Vec<_> = roster.participants().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Ben"]);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut roster = Roster::new();

        let err = roster.add("   ").unwrap_err();

        assert!(matches!(err, SplitError::InvalidInput { .. }));
        assert!(roster.participants().is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut roster = Roster::new();
        let first = roster.add("Ana").unwrap();
        let second = roster.add("Ana").unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn unknown_ids_resolve_to_sentinel() {
        let mut roster = Roster::new();
        let ana = roster.add("Ana").unwrap();

        assert_eq!(roster.get_name(&ana.id), "Ana");
        assert_eq!(roster.get_name("nobody"), UNKNOWN_NAME);
    }

    #[test]
    fn remove_reports_whether_found() {
        let mut roster = Roster::new();
        let ana = roster.add("Ana").unwrap();

        assert!(!roster.remove("nobody"));
        assert!(roster.remove(&ana.id));
        assert!(roster.participants().is_empty());
    }
}
