use std::cmp::Ordering;

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::core::{
    distance::calculate_bounding_box,
    filters::{ExclusionFilter, RadiusFilter},
    scoring::calculate_match_score,
};
use crate::models::{MatchQuery, MatchResult, Provider, ScoringWeights, SignalSettings};

/// Errors surfaced by the matcher before any scoring happens
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] ValidationErrors),

    #[error("Invalid scoring weights: {0}")]
    InvalidWeights(String),
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Query validation
/// 2. Hard filters (rating floor, radius cutoff)
/// 3. Per-signal scoring and weighting
/// 4. Deterministic ranking
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    settings: SignalSettings,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, settings: SignalSettings) -> Result<Self, MatchError> {
        let all = weights.as_array();
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MatchError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {:?}",
                weights
            )));
        }
        if all.iter().sum::<f64>() <= 0.0 {
            return Err(MatchError::InvalidWeights("at least one weight must be positive".to_string()));
        }
        if !settings.distance_decay_km.is_finite() || settings.distance_decay_km <= 0.0 {
            return Err(MatchError::InvalidWeights(format!(
                "distance decay must be positive, got {}",
                settings.distance_decay_km
            )));
        }

        Ok(Self {
            weights: weights.normalized(),
            settings,
        })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            settings: SignalSettings::default(),
        }
    }

    /// Effective weights, scaled to sum to one
    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank providers against a query, best first
    ///
    /// Fails only on an invalid query; an empty provider list or an empty
    /// query are ordinary inputs.
    ///
    /// # Arguments
    /// * `query` - The client's search query
    /// * `providers` - Canonical providers to rank; never modified
    pub fn rank<'a>(
        &self,
        query: &MatchQuery,
        providers: &'a [Provider],
    ) -> Result<Vec<MatchResult<'a>>, MatchError> {
        query.validate()?;

        let filter = ExclusionFilter {
            min_rating: query.min_rating,
            radius: match (query.origin(), query.radius_km) {
                (Some((lat, lng)), Some(radius_km)) => Some(RadiusFilter {
                    lat,
                    lng,
                    radius_km,
                    bounding_box: calculate_bounding_box(lat, lng, radius_km),
                }),
                _ => None,
            },
        };

        let mut results: Vec<MatchResult<'a>> = providers
            .iter()
            .filter(|provider| filter.admits(provider))
            .map(|provider| {
                let (score, breakdown, distance_km) =
                    calculate_match_score(provider, query, &self.weights, &self.settings);
                MatchResult {
                    provider,
                    score,
                    breakdown,
                    distance_km,
                }
            })
            .collect();

        results.sort_by(rank_order);

        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        tracing::debug!(
            "Ranked {} of {} providers",
            results.len(),
            providers.len()
        );

        Ok(results)
    }
}

/// Score desc, then rating desc, then reviews desc, then id asc
fn rank_order(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.provider.rating.total_cmp(&a.provider.rating))
        .then_with(|| b.provider.reviews_count.cmp(&a.provider.reviews_count))
        .then_with(|| a.provider.id.cmp(&b.provider.id))
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
