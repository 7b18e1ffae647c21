// Model exports
pub mod domain;
pub mod ingest;
pub mod requests;
pub mod responses;
pub mod taxonomy;

pub use domain::{Provider, Availability, ScoreBreakdown, MatchResult, BoundingBox, ScoringWeights, SignalSettings};
pub use ingest::RawProviderRow;
pub use requests::{MatchQuery, MAX_RATING};
pub use responses::{MatchResponse, ErrorResponse};
pub use taxonomy::{Service, Expertise, Day, UnknownTag};
