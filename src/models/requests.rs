use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::taxonomy::{Day, Expertise, Service};

/// Upper bound of the rating scale
pub const MAX_RATING: f64 = 5.0;

/// Search query for matching providers
///
/// Every field is optional. An absent field means the dimension is neither
/// filtered nor scored; it never means "require empty".
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_query_numbers"))]
pub struct MatchQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub expertise: Vec<Expertise>,
    pub day: Option<Day>,
    pub slot: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

impl MatchQuery {
    /// Query origin when both coordinates are present
    pub fn origin(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Checks the range validators cannot express: NaN slips through plain
/// comparisons, and a partial origin is ambiguous.
fn validate_query_numbers(query: &MatchQuery) -> Result<(), ValidationError> {
    let numbers = [
        ("lat", query.lat),
        ("lng", query.lng),
        ("radiusKm", query.radius_km),
        ("minRating", query.min_rating),
    ];
    for (field, value) in numbers {
        if let Some(v) = value {
            if !v.is_finite() {
                let mut err = ValidationError::new("not_finite");
                err.message = Some(Cow::Owned(format!("{} must be a finite number", field)));
                return Err(err);
            }
        }
    }

    if query.lat.is_some() != query.lng.is_some() {
        let mut err = ValidationError::new("incomplete_origin");
        err.message = Some(Cow::Borrowed("lat and lng must be supplied together"));
        return Err(err);
    }

    Ok(())
}
