mod aggregate;

pub use aggregate::{hydrate, Aggregate, CommitAggregate, FindAggregate, GetAggregate};
