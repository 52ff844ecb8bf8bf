//! Append-only version history for the playground

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description used when none is given
pub const DEFAULT_DESCRIPTION: &str = "Changes made";

/// One saved document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: usize,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub description: String,
}

/// Linear list of versions with a movable current pointer.
///
/// Ids equal the insertion index and are never reused; restoring only moves
/// the pointer, so later versions stay in place.
#[derive(Debug, Clone, Default)]
pub struct VersionManager {
    versions: Vec<Version>,
    current: Option<usize>,
}

impl VersionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a version and make it current; returns its id
    pub fn add_version(&mut self, content: impl Into<String>, description: Option<&str>) -> usize {
        let id = self.versions.len();
        self.versions.push(Version {
            id,
            timestamp: Utc::now(),
            content: content.into(),
            description: description.unwrap_or(DEFAULT_DESCRIPTION).to_string(),
        });
        self.current = Some(id);
        crate::log_debug!("Recorded version {}", id);
        id
    }

    /// Point at version `id` and return its content; unknown ids change nothing
    pub fn restore(&mut self, id: usize) -> Option<&str> {
        let version = self.versions.iter().find(|v| v.id == id)?;
        self.current = Some(id);
        Some(version.content.as_str())
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Id of the current version
    pub fn current_version(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Version> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: usize) -> Option<&Version> {
        self.versions.get(id)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut history = VersionManager::new();
        assert_eq!(history.current_version(), None);

        assert_eq!(history.add_version("a", Some("Initial generation")), 0);
        assert_eq!(history.add_version("b", None), 1);

        assert_eq!(history.current_version(), Some(1));
        assert_eq!(history.versions()[1].description, "Changes made");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_restore_moves_pointer_only() {
        let mut history = VersionManager::new();
        history.add_version("a", None);
        history.add_version("b", None);
        history.add_version("c", None);

        assert_eq!(history.restore(0), Some("a"));
        assert_eq!(history.current_version(), Some(0));
        assert_eq!(history.len(), 3);

        assert_eq!(history.add_version("d", None), 3);
        assert_eq!(history.current().map(|v| v.content.as_str()), Some("d"));
    }

    #[test]
    fn test_restore_unknown_id() {
        let mut history = VersionManager::new();
        history.add_version("a", None);
        assert_eq!(history.restore(5), None);
        assert_eq!(history.current_version(), Some(0));

        let mut empty = VersionManager::new();
        assert_eq!(empty.restore(0), None);
        assert!(empty.is_empty());
    }
}
