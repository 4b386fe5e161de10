//! Warden Core — domain model, store error types and repository
//! contracts shared by every Warden crate.

pub mod error;
pub mod models;
pub mod repository;
