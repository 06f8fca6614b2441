//! Convention-based command service.
//!
//! Handlers are registered on a [`Service`] by name. Each receives a
//! [`Context`] with the JSON input, the caller's [`Session`], the service
//! [`Settings`] and the repository.
//!
//! ## Handler convention
//!
//! Each handler file exports:
//!
//! ```ignore
//! pub const COMMAND: &str = "book.apply";
//!
//! pub fn guard<R>(ctx: &Context<R>) -> bool {
//!     ctx.has_text("bookId")
//! }
//!
//! pub fn handle<R: Repository>(ctx: &Context<R>) -> Result<Value, HandlerError> {
//!     // load aggregate, apply, commit, project
//! }
//! ```
//!
//! and is registered with [`register_handlers!`](crate::register_handlers).

mod context;
mod error;
#[allow(clippy::module_inception)]
mod service;
mod session;

#[cfg(feature = "http")]
mod http;

pub use context::Context;
pub use error::HandlerError;
pub use service::Service;
pub use session::{Session, USER_ID_HEADER};

#[cfg(feature = "http")]
pub use http::{router, serve};

/// Number of users the friends feed looks at when not configured.
pub const DEFAULT_FEED_LIMIT: usize = 50;

/// Runtime knobs handlers can read through [`Context::settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub feed_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            feed_limit: DEFAULT_FEED_LIMIT,
        }
    }
}

/// Register handler modules with a service.
///
/// Each module must export `COMMAND`, `guard` and `handle`.
///
/// ```ignore
/// let service = unperline::register_handlers!(
///     Service::new(HashMapRepository::new()),
///     handlers::book_apply,
///     handlers::book_state,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
