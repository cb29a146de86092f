//! # actweb-domain
//!
//! Pure domain model for binding an action bus to HTTP routes.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers and error conventions
//! - Define **Patterns** (action selectors such as `role:test,cmd:ping`)
//! - Define **Route descriptors** (path + pattern + methods + middleware)
//! - Define **Route maps** (the declarative `pin` + `map` configuration block)
//!   and their expansion into route descriptors
//! - Define the **Dispatch payload** handed to the action bus per request
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or HTTP frameworks.
//! Middleware handlers are carried as an opaque type parameter so the
//! adapter decides what a handler is.

pub mod error;
pub mod id;

pub mod method;
pub mod pattern;
pub mod payload;
pub mod route;
pub mod route_map;
