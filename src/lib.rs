//! Unperline: an event-sourced store for what people read.
//!
//! Each user is a [`Reader`](library::Reader) aggregate whose shelves
//! (read, liked, read list) and per-book records (rating, review, custom
//! cover) are rebuilt from an append-only event stream. Commands reach it
//! through a [`Service`](service::Service) of named handlers, exposed over
//! HTTP with the `http` feature.

pub mod aggregate;
pub mod config;
pub mod entity;
pub mod handlers;
pub mod library;
pub mod repository;
pub mod service;
#[cfg(feature = "http")]
pub mod telemetry;

pub use aggregate::{hydrate, Aggregate, CommitAggregate, FindAggregate, GetAggregate};
pub use config::{Backend, Config, ConfigError};
pub use entity::{Entity, EventRecord, PayloadError};
pub use repository::{Commit, Find, Get, HashMapRepository, Repository, RepositoryError};
#[cfg(feature = "sqlite")]
pub use repository::SqliteRepository;
pub use service::{Context, HandlerError, Service, Session, Settings};
