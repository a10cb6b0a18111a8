//! Asset management backend.
//!
//! CRUD over organizations, branches, departments, users and assets, plus
//! the asset-assignment lifecycle with cascading soft deletes, an
//! append-only asset history, notifications and JWT auth.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod query;
pub mod services;
pub mod startup;
pub mod utils;

pub use startup::{build_router, AppState};
