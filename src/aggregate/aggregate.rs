use std::fmt;

use crate::entity::{Entity, EventRecord};
use crate::repository::{Commit, Find, Get, RepositoryError};

/// Trait for domain aggregates that can be event-sourced.
pub trait Aggregate: Sized + Default {
    type ReplayError: fmt::Display;

    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;
    fn replay_event(&mut self, event: &EventRecord) -> Result<(), Self::ReplayError>;
}

/// Hydrate an aggregate from an entity by replaying its events.
pub fn hydrate<A: Aggregate>(entity: Entity) -> Result<A, RepositoryError> {
    let mut agg = A::default();
    let events = entity.events().to_vec();
    *agg.entity_mut() = entity;

    agg.entity_mut().set_replaying(true);
    for event in &events {
        if let Err(err) = agg.replay_event(event) {
            agg.entity_mut().set_replaying(false);
            return Err(RepositoryError::Replay(format!(
                "{} #{}: {}",
                event.event_name, event.sequence, err
            )));
        }
    }
    agg.entity_mut().set_replaying(false);

    Ok(agg)
}

/// Extension trait adding aggregate-aware get.
pub trait GetAggregate: Get {
    fn get_aggregate<A: Aggregate>(&self, id: &str) -> Result<Option<A>, RepositoryError> {
        let Some(entity) = self.get(id)? else {
            return Ok(None);
        };
        Ok(Some(hydrate::<A>(entity)?))
    }
}

impl<R: Get> GetAggregate for R {}

/// Extension trait adding aggregate-aware find.
pub trait FindAggregate: Find {
    fn find_aggregate<A: Aggregate, F>(&self, predicate: F) -> Result<Vec<A>, RepositoryError>
    where
        F: Fn(&A) -> bool,
    {
        let mut results = Vec::new();
        for entity in self.find(|_| true)? {
            let agg = hydrate::<A>(entity)?;
            if predicate(&agg) {
                results.push(agg);
            }
        }
        Ok(results)
    }
}

impl<R: Find> FindAggregate for R {}

/// Extension trait adding aggregate-aware commit.
pub trait CommitAggregate: Commit {
    fn commit_aggregate<A: Aggregate>(&self, aggregate: &mut A) -> Result<(), RepositoryError> {
        self.commit(aggregate.entity_mut())
    }
}

impl<R: Commit> CommitAggregate for R {}
