//! Domain layer for the CrewUp backend.
//!
//! This crate contains:
//! - Domain models (accounts, campaigns, applications, offers, billing)
//! - Role and workflow state machines with their guard predicates
//! - The subscription plan catalog

pub mod models;
