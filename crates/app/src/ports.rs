//! Port definitions: traits that adapters implement or call.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the bus implementations and
//! the HTTP adapter can depend on them without creating circular dependencies.

pub mod dispatcher;

pub use dispatcher::ActionDispatcher;
