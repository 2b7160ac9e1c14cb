//! In-memory resource repositories.
//!
//! A [`Repository`] owns an insertion-ordered collection and an id index over
//! the same entities. Both live behind one `RwLock`, and every mutation
//! updates both under the same write guard, so readers never observe the two
//! out of step. The index is built when the repository is constructed.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entities::{Agent, AgentDraft, Case, CaseDraft, Entity};
use crate::error::{StorageError, StorageResult};
use crate::identity::{AgentId, EntityIdType};

/// Attempts at drawing an unused id before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// Outcome of an id-addressed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOutcome {
    /// No entity with that id.
    NotFound,
    /// The index knew the id but the collection did not: the two diverged.
    Failed,
    /// The mutation was applied to both collection and index.
    Success,
}

impl RepositoryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RepositoryOutcome::Success)
    }
}

struct Store<T: Entity> {
    items: Vec<T>,
    index: HashMap<T::Id, T>,
}

impl<T: Entity> Store<T> {
    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.entity_id() == *id)
    }
}

/// Collection of one entity type plus its id index.
pub struct Repository<T: Entity> {
    store: RwLock<Store<T>>,
}

/// Repository of agents.
pub type AgentRepository = Repository<Agent>;

/// Repository of cases.
pub type CaseRepository = Repository<Case>;

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::with_entities(Vec::new())
    }

    /// Create a repository holding `entities` in the given order.
    ///
    /// Entities repeating an id already seen are dropped.
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        let mut items = Vec::new();
        let mut index = HashMap::new();
        for entity in entities {
            let id = entity.entity_id();
            if index.contains_key(&id) {
                continue;
            }
            index.insert(id, entity.clone());
            items.push(entity);
        }
        Self {
            store: RwLock::new(Store { items, index }),
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Store<T>>> {
        self.store.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Store<T>>> {
        self.store.write().map_err(|_| StorageError::LockPoisoned)
    }

    /// Every entity in insertion order.
    ///
    /// The returned vector is a snapshot taken under the read lock.
    pub fn find_all(&self) -> StorageResult<Vec<T>> {
        Ok(self.read()?.items.clone())
    }

    /// Look up an entity through the index.
    pub fn find_by_id(&self, id: &T::Id) -> StorageResult<Option<T>> {
        Ok(self.read()?.index.get(id).cloned())
    }

    /// Whether an entity with `id` exists.
    pub fn contains(&self, id: &T::Id) -> StorageResult<bool> {
        Ok(self.read()?.index.contains_key(id))
    }

    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.read()?.items.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.read()?.items.is_empty())
    }

    /// Append a new entity built around a freshly allocated id.
    fn insert_new(&self, build: impl FnOnce(T::Id) -> T) -> StorageResult<T> {
        let mut store = self.write()?;

        let id = (0..MAX_ID_ATTEMPTS)
            .map(|_| T::Id::generate())
            .find(|candidate| !store.index.contains_key(candidate))
            .ok_or(StorageError::IdSpaceExhausted {
                entity_name: T::Id::ENTITY_NAME,
            })?;

        let entity = build(id);
        debug_assert_eq!(entity.entity_id(), id);

        store.index.insert(id, entity.clone());
        store.items.push(entity.clone());
        tracing::debug!(entity = T::Id::ENTITY_NAME, %id, "Entity created");
        Ok(entity)
    }

    /// Remove the entity with `id` from collection and index.
    pub fn delete_by_id(&self, id: &T::Id) -> StorageResult<RepositoryOutcome> {
        let mut store = self.write()?;

        if !store.index.contains_key(id) {
            return Ok(RepositoryOutcome::NotFound);
        }

        let Some(position) = store.position(id) else {
            tracing::warn!(
                entity = T::Id::ENTITY_NAME,
                %id,
                "Entity present in index but missing from collection"
            );
            return Ok(RepositoryOutcome::Failed);
        };

        store.items.remove(position);
        store.index.remove(id);
        tracing::debug!(entity = T::Id::ENTITY_NAME, %id, "Entity deleted");
        Ok(RepositoryOutcome::Success)
    }

    /// Replace the stored entity that has `entity`'s id.
    pub fn update(&self, entity: T) -> StorageResult<RepositoryOutcome> {
        let mut store = self.write()?;
        let id = entity.entity_id();

        let Some(position) = store.position(&id) else {
            return Ok(RepositoryOutcome::NotFound);
        };

        store.index.insert(id, entity.clone());
        store.items[position] = entity;
        tracing::debug!(entity = T::Id::ENTITY_NAME, %id, "Entity updated");
        Ok(RepositoryOutcome::Success)
    }

    /// Drop `id` from the collection only, leaving the index entry behind.
    ///
    /// Lets tests reach the `Failed` delete outcome.
    #[cfg(any(test, feature = "test-support"))]
    pub fn detach_from_collection(&self, id: &T::Id) -> StorageResult<()> {
        let mut store = self.write()?;
        if let Some(position) = store.position(id) {
            store.items.remove(position);
        }
        Ok(())
    }
}

impl Repository<Agent> {
    /// Register a new agent.
    pub fn create(&self, draft: AgentDraft) -> StorageResult<Agent> {
        self.insert_new(|id| draft.into_agent(id))
    }
}

impl Repository<Case> {
    /// Open a new case.
    pub fn create(&self, draft: CaseDraft) -> StorageResult<Case> {
        self.insert_new(|id| draft.into_case(id))
    }

    /// Cases whose responsible agent is `agent_id`, in insertion order.
    pub fn find_by_agent(&self, agent_id: &AgentId) -> StorageResult<Vec<Case>> {
        Ok(self
            .read()?
            .items
            .iter()
            .filter(|case| case.agent_id == *agent_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{AgentRole, CaseStatus};
    use chrono::NaiveDate;

    fn draft(name: &str) -> AgentDraft {
        AgentDraft {
            name: name.to_string(),
            role: AgentRole::Officer,
            incorporation_date: NaiveDate::from_ymd_opt(2020, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_create_appends_and_indexes() {
        let repo = AgentRepository::new();
        let a = repo.create(draft("Alice Smith")).unwrap();
        let b = repo.create(draft("Bob Jones")).unwrap();

        let all = repo.find_all().unwrap();
        assert_eq!(all, vec![a.clone(), b.clone()]);
        assert_eq!(repo.find_by_id(&a.id).unwrap(), Some(a));
        assert_eq!(repo.find_by_id(&b.id).unwrap(), Some(b));
    }

    #[test]
    fn test_find_by_id_unknown() {
        let repo = AgentRepository::new();
        assert_eq!(repo.find_by_id(&AgentId::generate()).unwrap(), None);
    }

    #[test]
    fn test_delete_outcomes() {
        let repo = AgentRepository::new();
        let agent = repo.create(draft("Alice Smith")).unwrap();

        assert_eq!(
            repo.delete_by_id(&AgentId::generate()).unwrap(),
            RepositoryOutcome::NotFound
        );
        assert_eq!(repo.delete_by_id(&agent.id).unwrap(), RepositoryOutcome::Success);
        assert_eq!(repo.find_by_id(&agent.id).unwrap(), None);
        assert!(repo.is_empty().unwrap());
        assert_eq!(
            repo.delete_by_id(&agent.id).unwrap(),
            RepositoryOutcome::NotFound
        );
    }

    #[test]
    fn test_delete_reports_desync_as_failed() {
        let repo = AgentRepository::new();
        let agent = repo.create(draft("Alice Smith")).unwrap();
        repo.detach_from_collection(&agent.id).unwrap();

        assert_eq!(repo.delete_by_id(&agent.id).unwrap(), RepositoryOutcome::Failed);
    }

    #[test]
    fn test_update_replaces_collection_slot_and_index() {
        let repo = AgentRepository::new();
        let first = repo.create(draft("Alice Smith")).unwrap();
        let second = repo.create(draft("Bob Jones")).unwrap();

        let mut renamed = first.clone();
        renamed.name = "Alice Walker".to_string();
        assert_eq!(repo.update(renamed.clone()).unwrap(), RepositoryOutcome::Success);

        assert_eq!(repo.find_all().unwrap(), vec![renamed.clone(), second]);
        assert_eq!(repo.find_by_id(&first.id).unwrap(), Some(renamed));
    }

    #[test]
    fn test_update_unknown_is_not_found() {
        let repo = AgentRepository::new();
        let ghost = draft("Ghost Writer").into_agent(AgentId::generate());
        assert_eq!(repo.update(ghost.clone()).unwrap(), RepositoryOutcome::NotFound);
        assert_eq!(repo.find_by_id(&ghost.id).unwrap(), None);
    }

    #[test]
    fn test_with_entities_drops_repeated_ids() {
        let agent = draft("Alice Smith").into_agent(AgentId::generate());
        let mut twin = agent.clone();
        twin.name = "Imposter".to_string();

        let repo = AgentRepository::with_entities(vec![agent.clone(), twin]);
        assert_eq!(repo.len().unwrap(), 1);
        assert_eq!(repo.find_by_id(&agent.id).unwrap(), Some(agent));
    }

    #[test]
    fn test_find_by_agent() {
        let agents = AgentRepository::new();
        let owner = agents.create(draft("Alice Smith")).unwrap();
        let other = agents.create(draft("Bob Jones")).unwrap();

        let cases = CaseRepository::new();
        let mine = cases
            .create(CaseDraft {
                title: "Theft".to_string(),
                description: "Stolen bike".to_string(),
                status: CaseStatus::Open,
                agent_id: owner.id,
            })
            .unwrap();
        cases
            .create(CaseDraft {
                title: "Fraud".to_string(),
                description: "Forged cheque".to_string(),
                status: CaseStatus::Solved,
                agent_id: other.id,
            })
            .unwrap();

        assert_eq!(cases.find_by_agent(&owner.id).unwrap(), vec![mine]);
    }
}
