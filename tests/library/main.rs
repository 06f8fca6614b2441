//! Command-level tests: every handler driven through `Service::dispatch`
//! over an in-memory repository.

mod support;

mod actions;
mod profiles;
mod public;
mod registration;
