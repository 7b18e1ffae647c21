//! WonderCare Match - nurse matching service
//!
//! Two stages: the normalizer folds inconsistent upstream vocabulary into a
//! fixed taxonomy of services and expertise at ingestion time, and the
//! matcher ranks canonical providers against a query with a weighted sum of
//! independent signals.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, extract_services, extract_expertise, normalize_token, normalize_row};
pub use models::{Provider, MatchQuery, MatchResult, ScoreBreakdown, ScoringWeights, Service, Expertise, Day};
