//! Promotion tracker domain crate.
//!
//! Holds the promotion entity, the overlap/identity resolver, the
//! persistence collaborator trait with its in-memory implementation, and the
//! service that runs the create/update/delete flows. Zero internal deps so the
//! `db` and `api` crates can both build on it.

pub mod error;
pub mod promotion;
pub mod service;
pub mod store;
pub mod types;
