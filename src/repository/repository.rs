use crate::entity::Entity;

use super::error::RepositoryError;

/// Load one stream by id. `None` when the stream has no events.
pub trait Get {
    fn get(&self, id: &str) -> Result<Option<Entity>, RepositoryError>;
}

/// Load every stream matching a predicate, ordered by stream id.
pub trait Find {
    fn find<F>(&self, predicate: F) -> Result<Vec<Entity>, RepositoryError>
    where
        F: Fn(&Entity) -> bool;
}

/// Append an entity's new events, checking its committed version first.
pub trait Commit {
    fn commit(&self, entity: &mut Entity) -> Result<(), RepositoryError>;
}

/// Full repository trait combining all capabilities.
pub trait Repository: Get + Find + Commit {}

// Blanket implementation: anything implementing all traits is a Repository
impl<T> Repository for T where T: Get + Find + Commit {}

/// Version check shared by the storage backends.
pub(crate) fn check_version(entity: &Entity, stored: u64) -> Result<(), RepositoryError> {
    if stored != entity.committed_version() {
        return Err(RepositoryError::ConcurrentWrite {
            id: entity.id().to_string(),
            expected: entity.committed_version(),
            actual: stored,
        });
    }
    Ok(())
}
