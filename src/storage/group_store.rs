use crate::core::group::{Group, GroupError, GroupId};
use crate::optimization::simplify::SimplificationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors raised by the group store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("group {0} not found")]
    GroupNotFound(GroupId),
    #[error(transparent)]
    Group(#[from] GroupError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("group store lock poisoned")]
    Poisoned,
}

/// On-disk layout of a store file.
#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    groups: Vec<Group>,
}

/// Repository of groups.
///
/// Every read-modify-write of a group happens under a single lock, so
/// two simplifications of the same group cannot interleave and lose an
/// update. Persistence is explicit through [`GroupStore::load`] and
/// [`GroupStore::save`].
#[derive(Debug, Default)]
pub struct GroupStore {
    groups: Mutex<HashMap<GroupId, Group>>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<GroupId, Group>>, StoreError> {
        self.groups.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Create and register a new empty group.
    pub fn create_group(&self, name: &str, created_by: &str) -> Result<GroupId, StoreError> {
        let group = Group::new(name, created_by)?;
        let id = group.id();
        log::info!("created group '{}' ({})", group.name(), id);
        self.lock()?.insert(id, group);
        Ok(id)
    }

    /// Remove a group, returning it.
    pub fn delete_group(&self, id: GroupId) -> Result<Group, StoreError> {
        let removed = self.lock()?.remove(&id).ok_or(StoreError::GroupNotFound(id))?;
        log::info!("deleted group '{}' ({})", removed.name(), id);
        Ok(removed)
    }

    /// Snapshot of a group.
    pub fn get(&self, id: GroupId) -> Result<Group, StoreError> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or(StoreError::GroupNotFound(id))
    }

    /// Snapshot of all groups, oldest first.
    pub fn list(&self) -> Result<Vec<Group>, StoreError> {
        let mut groups: Vec<Group> = self.lock()?.values().cloned().collect();
        groups.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(groups)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    /// Apply an edit to a group while holding the store lock.
    ///
    /// If the edit fails the group is left as it was.
    pub fn update<T>(
        &self,
        id: GroupId,
        edit: impl FnOnce(&mut Group) -> Result<T, GroupError>,
    ) -> Result<T, StoreError> {
        let mut groups = self.lock()?;
        let group = groups.get_mut(&id).ok_or(StoreError::GroupNotFound(id))?;
        let mut draft = group.clone();
        match edit(&mut draft) {
            Ok(value) => {
                *group = draft;
                Ok(value)
            }
            Err(e) => {
                log::warn!("rejected edit to group {}: {}", id, e);
                Err(e.into())
            }
        }
    }

    /// Simplify a group's debts and store the result in place.
    pub fn simplify(&self, id: GroupId) -> Result<SimplificationResult, StoreError> {
        let result = self.update(id, |group| Ok(group.simplify()))?;
        log::info!(
            "simplified group {}: {} debts -> {} transfers",
            id,
            result.original_count(),
            result.transfer_count()
        );
        Ok(result)
    }

    /// Load a store from a JSON file. A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file: StoreFile = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no store at {}, starting empty", path.display());
                StoreFile::default()
            }
            Err(e) => return Err(e.into()),
        };
        log::debug!("loaded {} groups from {}", file.groups.len(), path.display());
        let groups = file.groups.into_iter().map(|g| (g.id(), g)).collect();
        Ok(Self {
            groups: Mutex::new(groups),
        })
    }

    /// Write every group to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let file = StoreFile {
            groups: self.list()?,
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(path, json)?;
        log::debug!("saved {} groups to {}", file.groups.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::person::PersonId;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    fn store_with_group() -> (GroupStore, GroupId) {
        let store = GroupStore::new();
        let id = store.create_group("Cabin", "alice").unwrap();
        store
            .update(id, |g| {
                g.add_member("A")?;
                g.add_member("B")?;
                g.add_member("C")?;
                Ok(())
            })
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_create_and_get() {
        let (store, id) = store_with_group();
        let group = store.get(id).unwrap();
        assert_eq!(group.name(), "Cabin");
        assert_eq!(group.members().len(), 3);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_missing_group() {
        let store = GroupStore::new();
        let id = GroupId::new();
        assert!(matches!(store.get(id), Err(StoreError::GroupNotFound(g)) if g == id));
        assert!(matches!(store.simplify(id), Err(StoreError::GroupNotFound(_))));
    }

    #[test]
    fn test_failed_update_leaves_group_untouched() {
        let (store, id) = store_with_group();
        let result = store.update(id, |g| {
            g.add_debt(&PersonId::new("A"), &PersonId::new("B"), dec!(5))?;
            g.add_debt(&PersonId::new("A"), &PersonId::new("Z"), dec!(5))?;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(StoreError::Group(GroupError::UnknownMember(_)))
        ));
        assert!(store.get(id).unwrap().debts().is_empty());
    }

    #[test]
    fn test_simplify_in_place() {
        let (store, id) = store_with_group();
        store
            .update(id, |g| {
                g.add_debt(&PersonId::new("A"), &PersonId::new("B"), dec!(10))?;
                g.add_debt(&PersonId::new("B"), &PersonId::new("C"), dec!(10))?;
                Ok(())
            })
            .unwrap();

        let result = store.simplify(id).unwrap();
        assert_eq!(result.transfer_count(), 1);
        let debts = store.get(id).unwrap().debts().to_vec();
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].from(), &PersonId::new("A"));
        assert_eq!(debts[0].to(), &PersonId::new("C"));
    }

    #[test]
    fn test_concurrent_edits_are_not_lost() {
        let (store, id) = store_with_group();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..10 {
                        store
                            .update(id, |g| {
                                g.add_debt(&PersonId::new("A"), &PersonId::new("B"), dec!(1))?;
                                Ok(())
                            })
                            .unwrap();
                        store.simplify(id).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let group = store.get(id).unwrap();
        assert_eq!(group.balances().get(&PersonId::new("B")), dec!(80));
        assert_eq!(group.debts().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (store, id) = store_with_group();
        assert_eq!(store.delete_group(id).unwrap().name(), "Cabin");
        assert!(store.is_empty().unwrap());
        assert!(store.delete_group(id).is_err());
    }
}
