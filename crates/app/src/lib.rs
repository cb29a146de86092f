//! # actweb-app
//!
//! Application layer: the **port** through which HTTP routes reach an
//! action bus, plus an in-process bus implementation.
//!
//! ## Responsibilities
//! - Define the `ActionDispatcher` port (driven/outbound): send a pattern and
//!   a payload, get back one reply or one error
//! - Define `DispatchError`, the failure a dispatcher reports
//! - Provide `LocalActionBus`, an in-process dispatcher used by the daemon
//!   and by tests
//!
//! ## Dependency rule
//! Depends on `actweb-domain` only. Never imports adapter crates or HTTP
//! types. Adapters depend on *this* crate, not the reverse.

pub mod action_bus;
pub mod error;
pub mod ports;
