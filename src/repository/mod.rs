mod error;
mod hashmap;
mod repository;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use error::RepositoryError;
pub use hashmap::HashMapRepository;
pub use repository::{Commit, Find, Get, Repository};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
