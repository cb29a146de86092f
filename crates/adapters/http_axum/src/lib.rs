//! # actweb-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Translate **route descriptors** into live axum endpoints, one handler
//!   per (route, method) pair ([`binder::RouteBinder`])
//! - Resolve named middleware against a typed registry at bind time and run
//!   the chain, in declared order, in front of the dispatch handler
//! - Per request: read the body and query string, dispatch a message through
//!   the `ActionDispatcher` port, and write the reply (status, redirect,
//!   JSON body) back onto the response
//! - Map dispatch and body-parsing failures into error responses that an
//!   outer layer can inspect and rewrite
//!
//! ## Dependency rule
//! Depends on `actweb-app` (for the dispatcher port) and `actweb-domain`
//! (for patterns, descriptors and payloads). Never leaks axum types into the
//! domain.

pub mod binder;
pub mod body;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod router;
