//! Core use-case services.
//!
//! # Responsibility
//! - Express screen-level flows as store actions.
//! - Keep callers decoupled from slice layout and storage details.

pub mod journal_service;
pub mod profile_service;
