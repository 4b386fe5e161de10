//! Domain models for Warden.

pub mod account;
