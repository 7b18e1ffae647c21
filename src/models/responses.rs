use serde::{Deserialize, Serialize};
use crate::models::domain::MatchResult;

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse<'a> {
    pub count: usize,
    pub results: Vec<MatchResult<'a>>,
}

impl<'a> MatchResponse<'a> {
    pub fn new(results: Vec<MatchResult<'a>>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
