use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a member of a group.
///
/// Members are identified by display name, as entered when they were
/// added to the group. Ordering is lexical and is what the simplifier
/// uses to break ties between people with equal standing.
///
/// # Examples
///
/// ```
/// use settle_up::core::person::PersonId;
///
/// let alice = PersonId::new("alice");
/// let bob = PersonId::new("bob");
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used when checking for duplicate members.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_equality() {
        assert_eq!(PersonId::new("alice"), PersonId::new("alice"));
        assert_ne!(PersonId::new("alice"), PersonId::new("Alice"));
    }

    #[test]
    fn test_person_matches_ignores_case() {
        let p = PersonId::new("Alice");
        assert!(p.matches("alice"));
        assert!(p.matches("  ALICE "));
        assert!(!p.matches("alicia"));
    }

    #[test]
    fn test_person_ordering() {
        assert!(PersonId::new("A") < PersonId::new("B"));
        assert_eq!(format!("{}", PersonId::new("carol")), "carol");
    }
}
