//! Shared catalog sessions.
//!
//! A [`SessionManager`] owns one default [`CatalogConfig`](crate::catalog::CatalogConfig)
//! and hands out reference-counted guards over the single open database.

mod manager;

pub use manager::{Session, SessionGuard, SessionManager};
