//! Client-side core of a manual attendance-marking screen: a
//! day-scoped draft store reconciled with a remote attendance API, a
//! bulk apply/submit engine, and a create-vs-update submission
//! reconciler. The HTTP API itself, session storage, and all rendering
//! are external collaborators.

pub mod api;
pub mod auth;
pub mod bulk;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod submit;
pub mod summary;
pub mod utils;
