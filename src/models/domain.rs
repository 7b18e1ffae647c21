use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::taxonomy::{lenient_tags, Day, Expertise, Service};

/// Canonical caregiver record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "reviewsCount", default)]
    pub reviews_count: u32,
    #[serde(default = "general_services", deserialize_with = "services_or_general")]
    pub services: Vec<Service>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub expertise: Vec<Expertise>,
    #[serde(default, deserialize_with = "lenient_availability")]
    pub availability: Vec<Availability>,
}

fn general_services() -> Vec<Service> {
    vec![Service::General]
}

/// Service list that falls back to `general` once unknown tags are dropped
fn services_or_general<'de, D>(deserializer: D) -> Result<Vec<Service>, D::Error>
where
    D: Deserializer<'de>,
{
    let services: Vec<Service> = lenient_tags(deserializer)?;
    Ok(or_general(services))
}

/// Stored service lists are never empty; an empty one means `general`
pub fn or_general(services: Vec<Service>) -> Vec<Service> {
    if services.is_empty() {
        return general_services();
    }
    services
}

impl Provider {
    /// Both coordinates, if the record carries them
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Availability entry for a given day
    pub fn availability_on(&self, day: Day) -> Option<&Availability> {
        self.availability.iter().find(|entry| entry.day == day)
    }
}

/// Time windows a provider works on one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub day: Day,
    #[serde(default)]
    pub slots: Vec<String>,
}

/// Deserialize availability entries, dropping malformed ones
///
/// An unknown day in one entry loses that entry only, never the record.
pub fn lenient_availability<'de, D>(deserializer: D) -> Result<Vec<Availability>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(parse_availability(raw.unwrap_or_default()))
}

/// Decode availability entries, dropping ones that do not parse
pub fn parse_availability(entries: Vec<Value>) -> Vec<Availability> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Availability>(entry) {
            Ok(a) => Some(a),
            Err(e) => {
                tracing::warn!("Dropping malformed availability entry: {}", e);
                None
            }
        })
        .collect()
}

/// Per-signal scores behind a composite score, each in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub geography: f64,
    pub services: f64,
    pub expertise: f64,
    pub availability: f64,
    pub reputation: f64,
}

/// Scored match result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    #[serde(flatten)]
    pub provider: &'a Provider,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub geography: f64,
    pub services: f64,
    pub expertise: f64,
    pub availability: f64,
    pub reputation: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            geography: 0.30,
            services: 0.30,
            expertise: 0.15,
            availability: 0.15,
            reputation: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Scale the weights so they sum to one
    ///
    /// Callers check for a positive sum first.
    pub fn normalized(&self) -> Self {
        let total: f64 = self.as_array().iter().sum();
        Self {
            geography: self.geography / total,
            services: self.services / total,
            expertise: self.expertise / total,
            availability: self.availability / total,
            reputation: self.reputation / total,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.geography,
            self.services,
            self.expertise,
            self.availability,
            self.reputation,
        ]
    }
}

/// Tunables that shape individual signals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSettings {
    /// Distance decay scale when the query carries no radius
    pub distance_decay_km: f64,
    /// Credit for a provider working the requested day but not the requested slot
    pub slot_mismatch_credit: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            distance_decay_km: 25.0,
            slot_mismatch_credit: 0.25,
        }
    }
}
