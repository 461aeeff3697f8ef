//! doc-service: HTTP gateway over the `DOC` table of document summaries.
//!
//! Access control is not done here; the service assumes an upstream gateway
//! restricts who can reach it.

pub mod config;
pub mod dtos;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
