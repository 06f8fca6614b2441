use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::entity::{Entity, EventRecord};

use super::error::RepositoryError;
use super::repository::{check_version, Commit, Find, Get};

/// In-memory event store. Clones share the same storage.
#[derive(Clone, Default)]
pub struct HashMapRepository {
    storage: Arc<RwLock<HashMap<String, Vec<EventRecord>>>>,
}

impl HashMapRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams currently stored.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn load(id: &str, events: &[EventRecord]) -> Entity {
    let mut entity = Entity::with_id(id);
    entity.load_from_history(events.to_vec());
    entity
}

impl Get for HashMapRepository {
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("read"))?;

        Ok(storage
            .get(id)
            .filter(|events| !events.is_empty())
            .map(|events| load(id, events)))
    }
}

impl Find for HashMapRepository {
    fn find<F>(&self, predicate: F) -> Result<Vec<Entity>, RepositoryError>
    where
        F: Fn(&Entity) -> bool,
    {
        let storage = self
            .storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned("find"))?;

        let mut ids: Vec<&String> = storage
            .iter()
            .filter(|(_, events)| !events.is_empty())
            .map(|(id, _)| id)
            .collect();
        ids.sort();

        Ok(ids
            .into_iter()
            .map(|id| load(id, &storage[id]))
            .filter(|entity| predicate(entity))
            .collect())
    }
}

impl Commit for HashMapRepository {
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned("write"))?;

        let stream = storage.entry(entity.id().to_string()).or_default();
        check_version(entity, stream.len() as u64)?;
        stream.extend_from_slice(entity.new_events());

        tracing::debug!(
            stream = entity.id(),
            appended = entity.new_events().len(),
            version = entity.version(),
            "committed events"
        );
        entity.mark_committed();
        Ok(())
    }
}
